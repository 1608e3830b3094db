//! Capability-probing table resolution

use crate::qualify;
use cohortql_backend::{Backend, BackendError, TableHandle};
use thiserror::Error;

/// Terminal failure of a resolution chain.
///
/// Intermediate attempts only establish that an access pattern is
/// unsupported on this backend; their failures are logged at debug
/// level and discarded. Only the final attempt's failure surfaces.
#[derive(Debug, Error)]
#[error("failed to resolve table {table}")]
pub struct ResolveError {
    /// Fully qualified name of the table that could not be resolved
    pub table: String,
    /// Failure of the final attempt
    #[source]
    pub source: BackendError,
}

type LookupStrategy<'a> = (
    &'static str,
    Box<dyn Fn(&dyn Backend) -> Result<TableHandle, BackendError> + 'a>,
);

/// Resolve a logical table reference to a queryable handle.
///
/// Access paths are probed in priority order, each only if the previous
/// failed:
///
/// 1. direct lookup with the whole qualifier as the `database`
///    argument (catalog-scoped backends take the combined
///    `catalog.schema` form there);
/// 2. direct lookup with the qualifier as the `schema` argument;
/// 3. an ad-hoc `SELECT * FROM <qualified name>`.
///
/// Direct lookup is preferred because it yields richer metadata and
/// avoids planning a full-table scan. Lookup steps are skipped when no
/// qualifier is given.
pub fn resolve(
    backend: &dyn Backend,
    schema_qualifier: Option<&str>,
    table_name: &str,
) -> Result<TableHandle, ResolveError> {
    let qualified = qualify(schema_qualifier, table_name);

    let mut lookups: Vec<LookupStrategy<'_>> = Vec::new();
    if let Some(qualifier) = schema_qualifier.filter(|q| !q.is_empty()) {
        lookups.push((
            "database-argument lookup",
            Box::new(move |b| b.table(table_name, Some(qualifier), None)),
        ));
        lookups.push((
            "schema-argument lookup",
            Box::new(move |b| b.table(table_name, None, Some(qualifier))),
        ));
    }

    for (label, lookup) in &lookups {
        match lookup(backend) {
            Ok(handle) => return Ok(handle),
            Err(err) => {
                log::debug!("{label} unavailable for {qualified}: {err}");
            }
        }
    }

    backend
        .sql(&format!("SELECT * FROM {qualified}"))
        .map_err(|source| ResolveError {
            table: qualified,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohortql_backend::{BackendCall, LookupBehavior, ScriptedBackend};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_database_argument_preferred_and_single_call() {
        let backend = ScriptedBackend::with_lookup(LookupBehavior::Database);
        let handle = resolve(&backend, Some("cat.schema"), "concept").unwrap();
        assert_eq!(handle.descriptor(), "db:cat.schema.concept");
        assert_eq!(
            backend.calls(),
            vec![BackendCall::Table {
                name: "concept".into(),
                database: Some("cat.schema".into()),
                schema: None,
            }]
        );
    }

    #[test]
    fn test_schema_argument_tried_second() {
        let backend = ScriptedBackend::with_lookup(LookupBehavior::Schema);
        let handle = resolve(&backend, Some("public"), "concept").unwrap();
        assert_eq!(handle.descriptor(), "schema:public.concept");
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Table {
                    name: "concept".into(),
                    database: Some("public".into()),
                    schema: None,
                },
                BackendCall::Table {
                    name: "concept".into(),
                    database: None,
                    schema: Some("public".into()),
                },
            ]
        );
    }

    #[test]
    fn test_raw_select_fallback_uses_qualified_name() {
        let backend = ScriptedBackend::new();
        let handle = resolve(&backend, Some("cat.db"), "concept").unwrap();
        assert!(handle.descriptor().contains(r#""cat"."db"."concept""#));
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], BackendCall::Table { .. }));
        assert!(matches!(calls[1], BackendCall::Table { .. }));
        assert_eq!(
            calls[2],
            BackendCall::Sql(r#"SELECT * FROM "cat"."db"."concept""#.into())
        );
    }

    #[test]
    fn test_no_qualifier_skips_lookups() {
        let backend = ScriptedBackend::with_lookup(LookupBehavior::Database);
        let handle = resolve(&backend, None, "person").unwrap();
        assert_eq!(handle.descriptor(), r#"SELECT * FROM "person""#);
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn test_terminal_failure_carries_qualified_name() {
        let backend = ScriptedBackend::new().with_failing_sql();
        let err = resolve(&backend, Some("public"), "concept").unwrap_err();
        assert_eq!(err.table, r#""public"."concept""#);
        assert!(matches!(err.source, BackendError::Execution(_)));
    }
}
