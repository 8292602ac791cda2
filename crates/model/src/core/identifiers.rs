use crate::execution::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// A table or column name that is safe to splice into generated SQL.
///
/// Accepts plain identifiers and dot-qualified ones (`dbo.calls`). Each part
/// must start with a letter or underscore and contain only ASCII letters,
/// digits and underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlIdent(Arc<str>);

const MAX_IDENT_LEN: usize = 255;

impl SqlIdent {
    pub fn new(name: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if name.len() > MAX_IDENT_LEN {
            return Err(IdentifierError::TooLong(name.len()));
        }

        for part in name.split('.') {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
                _ => return Err(IdentifierError::Invalid(name.to_string())),
            }
            if chars.any(|c| !c.is_ascii_alphanumeric() && c != '_') {
                return Err(IdentifierError::Invalid(name.to_string()));
            }
        }

        Ok(Self(Arc::from(name)))
    }

    /// Builds an identifier from a compile-time constant known to be valid.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SqlIdent {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SqlIdent {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SqlIdent> for String {
    fn from(ident: SqlIdent) -> Self {
        ident.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_qualified() {
        assert_eq!(SqlIdent::new("cdr_ended_at").unwrap().as_str(), "cdr_ended_at");
        assert_eq!(SqlIdent::new("dbo.calls").unwrap().to_string(), "dbo.calls");
        assert!(SqlIdent::new("_tmp1").is_ok());
    }

    #[test]
    fn test_rejects_injection_and_bad_parts() {
        assert!(matches!(SqlIdent::new(""), Err(IdentifierError::Empty)));
        assert!(SqlIdent::new("calls; DROP TABLE calls").is_err());
        assert!(SqlIdent::new("1calls").is_err());
        assert!(SqlIdent::new("dbo.").is_err());
        assert!(SqlIdent::new("calls--").is_err());
        assert!(matches!(
            SqlIdent::new("a".repeat(300)),
            Err(IdentifierError::TooLong(300))
        ));
    }
}
