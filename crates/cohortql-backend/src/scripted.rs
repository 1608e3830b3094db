//! Scripted in-memory backend
//!
//! A recording double for exercising resolution and materialization
//! logic without a live warehouse. Its lookup behavior is scripted to
//! imitate the capability differences found across real backends.

use crate::{Backend, BackendError, TableHandle};
use parking_lot::Mutex;

/// Which `table` call shape the scripted backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupBehavior {
    /// Succeed when a `database` argument is supplied
    Database,
    /// Succeed when a `schema` argument is supplied
    Schema,
    /// Reject every direct lookup
    #[default]
    Reject,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// A `table` lookup with its arguments
    Table {
        /// Table name argument
        name: String,
        /// `database` argument, when supplied
        database: Option<String>,
        /// `schema` argument, when supplied
        schema: Option<String>,
    },
    /// An ad-hoc `sql` query
    Sql(String),
    /// A `raw_sql` statement
    RawSql(String),
}

/// In-memory [`Backend`] that records every call it receives
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    lookup_behavior: LookupBehavior,
    fail_sql: bool,
    fail_raw_sql: bool,
    calls: Mutex<Vec<BackendCall>>,
}

impl ScriptedBackend {
    /// A backend rejecting every direct lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose lookups follow the given behavior
    pub fn with_lookup(lookup_behavior: LookupBehavior) -> Self {
        Self {
            lookup_behavior,
            ..Self::default()
        }
    }

    /// Make every `sql` call fail
    pub fn with_failing_sql(mut self) -> Self {
        self.fail_sql = true;
        self
    }

    /// Make every `raw_sql` call fail
    pub fn with_failing_raw_sql(mut self) -> Self {
        self.fail_raw_sql = true;
        self
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    /// Recorded `sql` query texts, in order
    pub fn sql_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Sql(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded `raw_sql` statement texts, in order
    pub fn raw_sql_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                BackendCall::RawSql(statement) => Some(statement.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Backend for ScriptedBackend {
    fn table(
        &self,
        name: &str,
        database: Option<&str>,
        schema: Option<&str>,
    ) -> Result<TableHandle, BackendError> {
        self.calls.lock().push(BackendCall::Table {
            name: name.to_string(),
            database: database.map(str::to_string),
            schema: schema.map(str::to_string),
        });
        match self.lookup_behavior {
            LookupBehavior::Database => {
                if let Some(database) = database {
                    return Ok(TableHandle::new(format!("db:{database}.{name}")));
                }
            }
            LookupBehavior::Schema => {
                if let Some(schema) = schema {
                    return Ok(TableHandle::new(format!("schema:{schema}.{name}")));
                }
            }
            LookupBehavior::Reject => {}
        }
        Err(BackendError::Unsupported(format!(
            "table lookup for {name}"
        )))
    }

    fn sql(&self, query: &str) -> Result<TableHandle, BackendError> {
        self.calls.lock().push(BackendCall::Sql(query.to_string()));
        if self.fail_sql {
            return Err(BackendError::Execution(format!("scripted failure: {query}")));
        }
        Ok(TableHandle::new(query))
    }

    fn raw_sql(&self, statement: &str) -> Result<(), BackendError> {
        self.calls
            .lock()
            .push(BackendCall::RawSql(statement.to_string()));
        if self.fail_raw_sql {
            return Err(BackendError::Execution(format!(
                "scripted failure: {statement}"
            )));
        }
        Ok(())
    }
}
