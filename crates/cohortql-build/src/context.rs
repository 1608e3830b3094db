//! Per-request build context

use crate::{
    BuildOptions, MaterializeError, MaterializedResource, QueryExpression, ResolveError,
    materialize, qualify, resolve,
};
use cohortql_backend::{Backend, TableHandle};
use std::sync::Arc;

/// Everything one compilation request needs to reach its backend:
/// the live connection, where the clinical and vocabulary tables live,
/// and the build options.
///
/// The schema qualifiers may be single-segment (`"cdm"`) or dotted
/// (`"catalog.cdm"`). When no vocabulary schema is set, vocabulary
/// tables are looked up in the clinical schema.
pub struct BuildContext {
    backend: Arc<dyn Backend>,
    cdm_schema: Option<String>,
    vocabulary_schema: Option<String>,
    options: BuildOptions,
}

impl BuildContext {
    /// Create a context over a connection with the given options
    pub fn new(backend: Arc<dyn Backend>, options: BuildOptions) -> Self {
        Self {
            backend,
            cdm_schema: None,
            vocabulary_schema: None,
            options,
        }
    }

    /// Set the schema holding the clinical domain tables
    pub fn with_cdm_schema(mut self, schema: impl Into<String>) -> Self {
        self.cdm_schema = Some(schema.into());
        self
    }

    /// Set the schema holding the vocabulary tables
    pub fn with_vocabulary_schema(mut self, schema: impl Into<String>) -> Self {
        self.vocabulary_schema = Some(schema.into());
        self
    }

    /// The connection this context compiles against
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// The build options for this request
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Qualifier for vocabulary tables (falls back to the CDM schema)
    pub fn vocabulary_qualifier(&self) -> Option<&str> {
        self.vocabulary_schema
            .as_deref()
            .or(self.cdm_schema.as_deref())
    }

    /// Fully qualified name of a vocabulary table
    pub fn vocabulary_name(&self, table_name: &str) -> String {
        qualify(self.vocabulary_qualifier(), table_name)
    }

    /// Resolve a clinical domain table to a queryable handle
    pub fn cdm_table(&self, table_name: &str) -> Result<TableHandle, ResolveError> {
        resolve(self.backend.as_ref(), self.cdm_schema.as_deref(), table_name)
    }

    /// Resolve a vocabulary table to a queryable handle
    pub fn vocabulary_table(&self, table_name: &str) -> Result<TableHandle, ResolveError> {
        resolve(
            self.backend.as_ref(),
            self.vocabulary_qualifier(),
            table_name,
        )
    }

    /// Materialize a compiled query into the temp-emulation schema
    pub fn materialize(
        &self,
        expression: &dyn QueryExpression,
    ) -> Result<MaterializedResource, MaterializeError> {
        materialize(self.backend.clone(), expression, &self.options)
    }
}
