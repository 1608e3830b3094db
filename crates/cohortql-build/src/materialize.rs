//! Materialization of derived results into the temp-emulation schema

use crate::{BuildOptions, qualify};
use cohortql_backend::{Backend, BackendError, TableHandle};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// A compiled query whose result can be materialized.
///
/// The query body is rendered by the outer compiler; the materializer
/// only embeds it into a CREATE TABLE statement.
pub trait QueryExpression {
    /// The backend SQL text of the query
    fn to_sql(&self) -> String;
}

/// Errors raised while materializing a query result
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// No temp-emulation schema is configured in the build options
    #[error("no temp emulation schema configured; cannot materialize")]
    NoEmulationSchema,
    /// The CREATE TABLE statement failed; nothing was created
    #[error("failed to create materialized table {table}")]
    Create {
        /// Fully qualified target name
        table: String,
        /// Underlying backend failure
        #[source]
        source: BackendError,
    },
    /// CREATE succeeded but the read-back SELECT failed; the table may
    /// remain as an orphan in the emulation schema
    #[error("failed to select from materialized table {table}; the table may be orphaned")]
    Select {
        /// Fully qualified name of the possibly orphaned table
        table: String,
        /// Underlying backend failure
        #[source]
        source: BackendError,
    },
}

/// Errors raised while releasing a materialized resource
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The resource was already released; release is single-use
    #[error("materialized table {table} was already released")]
    AlreadyReleased {
        /// Fully qualified name of the released table
        table: String,
    },
    /// The DROP statement failed; the table may remain as an orphan
    #[error("failed to drop materialized table {table}")]
    Drop {
        /// Fully qualified name of the table
        table: String,
        /// Underlying backend failure
        #[source]
        source: BackendError,
    },
}

// Process-wide uniqueness for generated names: a seed derived from the
// process id and startup clock, plus a monotonic counter. Two
// concurrent materializations into one shared schema must never target
// the same qualified name.
static NAME_SEED: Lazy<String> = Lazy::new(|| {
    let mut hasher = DefaultHasher::new();
    std::process::id().hash(&mut hasher);
    if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
        now.subsec_nanos().hash(&mut hasher);
        now.as_secs().hash(&mut hasher);
    }
    format!("{:08x}", hasher.finish() as u32)
});
static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_table_name(prefix: &str) -> String {
    let n = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{n}", *NAME_SEED)
}

/// A materialized query result with scoped, explicit release.
///
/// The resource is never dropped implicitly; the owner must call
/// [`cleanup`](Self::cleanup) exactly once on every exit path. A second
/// call fails loudly instead of re-issuing the DROP.
pub struct MaterializedResource {
    backend: Arc<dyn Backend>,
    handle: TableHandle,
    qualified_name: String,
    released: Mutex<bool>,
}

impl std::fmt::Debug for MaterializedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializedResource")
            .field("handle", &self.handle)
            .field("qualified_name", &self.qualified_name)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl MaterializedResource {
    /// Handle to the materialized relation
    pub fn handle(&self) -> &TableHandle {
        &self.handle
    }

    /// Fully qualified name the result was materialized under
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Whether the resource has been released
    pub fn is_released(&self) -> bool {
        *self.released.lock()
    }

    /// Drop the materialized table.
    ///
    /// The DROP is rendered with IF EXISTS so a table already removed
    /// out-of-band does not fail the release. A failed DROP leaves the
    /// resource unreleased and may be retried; a successful release is
    /// final.
    pub fn cleanup(&self) -> Result<(), CleanupError> {
        let mut released = self.released.lock();
        if *released {
            return Err(CleanupError::AlreadyReleased {
                table: self.qualified_name.clone(),
            });
        }
        self.backend
            .raw_sql(&format!("DROP TABLE IF EXISTS {}", self.qualified_name))
            .map_err(|source| CleanupError::Drop {
                table: self.qualified_name.clone(),
                source,
            })?;
        *released = true;
        Ok(())
    }
}

/// Materialize a compiled query into the temp-emulation schema.
///
/// Requires `options.temp_emulation_schema`; this path only runs when
/// native ephemeral temp tables are unavailable or undesired. The
/// result is created under a fresh collision-resistant name, read back
/// with a fully qualified SELECT (the table is too new for catalog
/// lookup paths to be trusted), and returned bundled with its cleanup
/// action.
pub fn materialize(
    backend: Arc<dyn Backend>,
    expression: &dyn QueryExpression,
    options: &BuildOptions,
) -> Result<MaterializedResource, MaterializeError> {
    let schema = options
        .temp_emulation_schema
        .as_deref()
        .ok_or(MaterializeError::NoEmulationSchema)?;
    let prefix = options.target_table_prefix.as_deref().unwrap_or("codeset");

    let table_name = unique_table_name(prefix);
    let qualified = qualify(Some(schema), &table_name);
    let body = expression.to_sql();

    backend
        .raw_sql(&format!("CREATE TABLE {qualified} AS {body}"))
        .map_err(|source| MaterializeError::Create {
            table: qualified.clone(),
            source,
        })?;

    let handle = match backend.sql(&format!("SELECT * FROM {qualified}")) {
        Ok(handle) => handle,
        Err(source) => {
            log::warn!("materialized table {qualified} is unreadable and may be orphaned");
            return Err(MaterializeError::Select {
                table: qualified,
                source,
            });
        }
    };

    Ok(MaterializedResource {
        backend,
        handle,
        qualified_name: qualified,
        released: Mutex::new(false),
    })
}
