//! Destination database provisioning.

use crate::config::ToolConfig;
use crate::error::TimothyError;
use crate::models::{CommandLine, Endpoint};
use crate::services::classifier::ExistsClassifier;

/// Creates the destination database before anything is streamed into it.
pub struct Provisioner;

impl Provisioner {
    /// Create `endpoint`'s database from `template0`.
    ///
    /// Connects to the maintenance database on the same cluster with the same
    /// credentials. An existing database surfaces as
    /// [`TimothyError::AlreadyExists`]; whether that is fatal is the caller's call.
    pub async fn ensure(endpoint: &Endpoint, tools: &ToolConfig) -> Result<(), TimothyError> {
        endpoint.validate()?;

        let command = Self::create_database_command(endpoint, tools);
        ExistsClassifier::run_classified(&command).await?;

        tracing::info!(endpoint = %endpoint, "Database created");
        Ok(())
    }

    /// Command line issuing the create directive for `endpoint`.
    pub fn create_database_command(endpoint: &Endpoint, tools: &ToolConfig) -> CommandLine {
        let directive = Self::create_database_sql(endpoint.database());
        let argv = vec![
            tools.admin_program.clone(),
            endpoint.admin_conninfo(&tools.admin_database),
            "-c".to_string(),
            directive.clone(),
        ];
        let masked = vec![
            tools.admin_program.clone(),
            endpoint.masked_admin_conninfo(&tools.admin_database),
            "-c".to_string(),
            directive,
        ];
        CommandLine::with_masked(argv, masked)
    }

    /// `CREATE DATABASE` from the empty template.
    pub fn create_database_sql(database: &str) -> String {
        format!("CREATE DATABASE {} TEMPLATE template0;", quote_identifier(database))
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
