/*
    Run an external program (matUtils, usher_to_taxonium)
        Block until it exits
        Capture stdout and stderr
        Non-zero exit or signal is an error carrying the captured stderr
*/

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};
use log::{debug, trace};
use crate::error::{MetaError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: String,
    // arguments placed before the per-call arguments
    leading_args: Vec<String>,
}

impl ExternalTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run to completion and return its standard output.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = self.leading_args.iter().map(OsString::from)
            .chain(args.into_iter().map(|a| a.as_ref().to_os_string()))
            .collect();
        let printable = args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Running: {} {}", self.program, printable);
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| MetaError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.lines() {
            trace!("{}: {}", self.program, line);
        }
        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => String::from("terminated by signal"),
            };
            return Err(MetaError::ExternalCommand {
                program: self.program.clone(),
                args: printable,
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }
}
