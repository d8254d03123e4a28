//! External command descriptions.

use crate::models::Endpoint;

use std::fmt;

/// One invocation of an external libpq tool against an endpoint.
///
/// Renders as `[program, fixed flags.., args.., connection string]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    fixed_flags: Vec<String>,
    args: Vec<String>,
    endpoint: Endpoint,
}

impl CommandSpec {
    /// Create a command with its fixed flags and no variable arguments.
    pub fn new<I, S>(program: impl Into<String>, fixed_flags: I, endpoint: Endpoint) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            fixed_flags: fixed_flags.into_iter().map(Into::into).collect(),
            args: Vec::new(),
            endpoint,
        }
    }

    /// Append variable arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Argument vector handed to the OS, password included.
    pub fn argv(&self) -> Vec<String> {
        self.render(self.endpoint.connection_string())
    }

    /// Argument vector safe for logs and errors.
    pub fn masked_argv(&self) -> Vec<String> {
        self.render(self.endpoint.masked_connection_string())
    }

    fn render(&self, connection_string: String) -> Vec<String> {
        let mut argv = Vec::with_capacity(2 + self.fixed_flags.len() + self.args.len());
        argv.push(self.program.clone());
        argv.extend(self.fixed_flags.iter().cloned());
        argv.extend(self.args.iter().cloned());
        argv.push(connection_string);
        argv
    }

    /// Build a `tokio::process::Command` for this invocation.
    pub(crate) fn to_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.argv()[1..]);
        command
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked_argv().join(" "))
    }
}

/// Argument vector for an arbitrary control command, with a masked twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
    masked: Vec<String>,
}

impl CommandLine {
    /// A command line with nothing to mask.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        Self { masked: argv.clone(), argv }
    }

    /// A command line whose logged form differs from the executed one.
    pub fn with_masked(argv: Vec<String>, masked: Vec<String>) -> Self {
        debug_assert_eq!(argv.len(), masked.len());
        Self { argv, masked }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn masked_argv(&self) -> &[String] {
        &self.masked
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

impl From<&CommandSpec> for CommandLine {
    fn from(spec: &CommandSpec) -> Self {
        Self::with_masked(spec.argv(), spec.masked_argv())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked.join(" "))
    }
}
