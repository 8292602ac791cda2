use crate::sql::base::source::WatermarkFilter;

/// Appends the watermark predicate and ordering to a configured select.
///
/// The configured query is treated as opaque; it must end where a `WHERE`
/// clause can start. Both sides of the comparison are truncated to whole
/// seconds: the column by `date_trunc`, the bound value by the caller.
pub fn with_watermark_filter(query: &str, filter: &WatermarkFilter) -> String {
    let base = query.trim_end().trim_end_matches(';').trim_end();
    let column = &filter.column;
    format!(
        "{base} WHERE date_trunc('second', {column}) > $1::timestamptz ORDER BY {column} ASC"
    )
}
