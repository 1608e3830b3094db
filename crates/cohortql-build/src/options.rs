//! Build options read by resolution and materialization

/// Immutable configuration for one compilation request.
///
/// Constructed once, read-only thereafter; the resolver and
/// materializer never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Persistent schema standing in for native ephemeral temp tables.
    /// When set, derived results (codesets) are materialized into it
    /// instead of a native temp table. May be a dotted
    /// `catalog.schema` value.
    pub temp_emulation_schema: Option<String>,
    /// Prefix for generated table names; defaults to `codeset`
    pub target_table_prefix: Option<String>,
}

impl BuildOptions {
    /// Options with no emulation schema and default naming
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temp-emulation schema
    pub fn with_temp_emulation_schema(mut self, schema: impl Into<String>) -> Self {
        self.temp_emulation_schema = Some(schema.into());
        self
    }

    /// Override the generated-table name prefix
    pub fn with_target_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_table_prefix = Some(prefix.into());
        self
    }
}
