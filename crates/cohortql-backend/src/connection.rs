//! The connection trait and its error taxonomy

use thiserror::Error;

/// Opaque reference to a queryable relation returned by a backend.
///
/// The handle carries a backend-chosen descriptor (how the relation was
/// addressed) and nothing else; it has no cleanup of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    descriptor: String,
}

impl TableHandle {
    /// Create a handle from the backend's descriptor for the relation
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
        }
    }

    /// The backend's descriptor for the relation
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Errors a backend call can produce.
///
/// `Unsupported` means the call shape itself is not available on this
/// backend; `Execution` means the backend accepted the call and it
/// failed. Backends that cannot tell the two apart may return either —
/// callers probing for capabilities treat both as "try the next
/// strategy".
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend does not support this access pattern
    #[error("unsupported access pattern: {0}")]
    Unsupported(String),
    /// The backend attempted the call and it failed
    #[error("statement execution failed: {0}")]
    Execution(String),
}

/// A live connection to a relational backend.
///
/// Calls are blocking; one compilation request owns the connection for
/// the duration of each call. Implementations wrap whatever driver the
/// warehouse ships and surface its failures through [`BackendError`].
pub trait Backend: Send + Sync {
    /// Look up a table directly by name.
    ///
    /// `database` and `schema` are alternative spellings of the naming
    /// scope; which one a backend honors (if either) is
    /// implementation-defined. A dotted `catalog.schema` value may be
    /// passed as a single `database` argument on backends that accept
    /// the combined form.
    fn table(
        &self,
        name: &str,
        database: Option<&str>,
        schema: Option<&str>,
    ) -> Result<TableHandle, BackendError>;

    /// Execute an ad-hoc query and return a handle to its result relation
    fn sql(&self, query: &str) -> Result<TableHandle, BackendError>;

    /// Execute a statement for its side effect; no result relation
    fn raw_sql(&self, statement: &str) -> Result<(), BackendError>;
}
