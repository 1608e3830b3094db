//! Multi-part identifier rendering

/// Render a fully qualified, delimited SQL identifier.
///
/// `schema_qualifier` is `None`, a single segment (`"schema"`), or a
/// dotted two-segment value (`"catalog.schema"`). Every segment and the
/// table name are double-quoted individually and joined with dots:
///
/// - `None` → `"events"`
/// - `"public"` → `"public"."events"`
/// - `"catalog.schema"` → `"catalog"."schema"."events"`
///
/// Segments are assumed to be pre-validated bare identifiers; inputs
/// with embedded quoting or more than one dot are out of contract.
pub fn qualify(schema_qualifier: Option<&str>, table_name: &str) -> String {
    let mut segments: Vec<&str> = Vec::with_capacity(3);
    if let Some(qualifier) = schema_qualifier.filter(|q| !q.is_empty()) {
        match qualifier.split_once('.') {
            Some((catalog, schema)) => {
                segments.push(catalog);
                segments.push(schema);
            }
            None => segments.push(qualifier),
        }
    }
    segments.push(table_name);
    segments
        .iter()
        .map(|segment| format!("\"{segment}\""))
        .collect::<Vec<_>>()
        .join(".")
}
