//! Adapter status query
//!
//! The query is an external command whose text output lists the host's
//! network adapters. Its format is platform specific; the parser treats it
//! as opaque text.

use std::process::{Command, Stdio};

use crate::error::ProbeError;
use crate::Result;

/// Source of adapter status text
pub trait AdapterQuery: Send + Sync {
    fn query(&self) -> Result<String>;
}

/// Runs a host command and captures its stdout
#[derive(Debug, Clone)]
pub struct CommandQuery {
    program: String,
    args: Vec<String>,
}

impl CommandQuery {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list, as stored in configuration
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProbeError::CommandFailed("Empty adapter command".to_string()))?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandQuery {
    fn default() -> Self {
        Self::new("ipconfig", Vec::new())
    }
}

impl AdapterQuery for CommandQuery {
    fn query(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Fixed status text, for saved command output
#[derive(Debug, Clone)]
pub struct StaticQuery(String);

impl StaticQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl AdapterQuery for StaticQuery {
    fn query(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
