//! Thin wrappers around the external programs the pipelines depend on. Each
//! call runs the program to completion; a failing program aborts the run with
//! its captured output.

pub mod blast;
pub mod phylonium;

use crate::utils::Result;
use itertools::Itertools;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

#[derive(Debug, Clone)]
pub struct Tool {
    program: PathBuf,
}

impl Tool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Tool {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the program and returns its standard output.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        log::debug!("Running {} {}", self.program.display(), display_args(&args));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| format!("Failed to execute {}: {}", self.program.display(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(format!(
                "{} failed ({}):\n{}{}",
                self.program.display(),
                output.status,
                stdout,
                stderr
            ));
        }
        if !stderr.trim().is_empty() {
            log::warn!("{}: {}", self.program.display(), stderr.trim_end());
        }
        String::from_utf8(output.stdout).map_err(|_| {
            format!(
                "{} produced output that is not valid UTF-8",
                self.program.display()
            )
        })
    }
}

fn display_args(args: &[OsString]) -> String {
    args.iter().map(|a| a.to_string_lossy()).join(" ")
}
