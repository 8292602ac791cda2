use model::{core::identifiers::SqlIdent, pagination::watermark::WatermarkColumns};
use std::borrow::Cow;

/// Lower-case; matched against a lower-cased copy of the statement.
const LEGACY_PLACEHOLDER: &str = "@value";

/// Selects the newest row of `table` by end time. Rows sharing the maximum
/// end time are ordered by id so the pick does not depend on storage order.
pub fn latest_watermark_sql(table: &SqlIdent, columns: &WatermarkColumns) -> String {
    let end = &columns.end_time;
    let id = &columns.id;
    format!("SELECT TOP 1 {end}, {id} FROM {table} ORDER BY {end} DESC, {id} DESC")
}

/// Rewrites `@value1..@valueN` placeholders to tiberius' positional
/// `@P1..@PN`. The prefix matches in any letter case, as SQL Server variable
/// names do under the default collation. Indices outside `1..=params` and
/// statements already using `@P` names pass through untouched.
pub fn normalize_placeholders(query: &str, params: usize) -> Cow<'_, str> {
    let lower = query.to_ascii_lowercase();
    if !lower.contains(LEGACY_PLACEHOLDER) {
        return Cow::Borrowed(query);
    }

    let mut sql = String::with_capacity(query.len());
    let mut copied = 0;
    for (start, _) in lower.match_indices(LEGACY_PLACEHOLDER) {
        let digits = start + LEGACY_PLACEHOLDER.len();
        let end = digits
            + lower[digits..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
        match lower[digits..end].parse::<usize>() {
            Ok(index) if (1..=params).contains(&index) => {
                sql.push_str(&query[copied..start]);
                sql.push_str(&format!("@P{index}"));
                copied = end;
            }
            _ => {}
        }
    }
    sql.push_str(&query[copied..]);
    Cow::Owned(sql)
}
