//! Helper process execution.

use anyhow::{Context, Result, bail};
use std::process::Command;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn command_output_impl(&self, program: &str, args: &[String]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("{} wrote non-UTF-8 output", program))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_command_output_success() {
        let runtime = RealRuntime;
        let out = runtime
            .command_output("sh", &["-c".to_string(), "echo hello".to_string()])
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_command_output_failure() {
        let runtime = RealRuntime;
        let result = runtime.command_output("sh", &["-c".to_string(), "exit 3".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_output_missing_program() {
        let runtime = RealRuntime;
        assert!(runtime.command_output("poet-no-such-program", &[]).is_err());
    }
}
