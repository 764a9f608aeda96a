use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::error::AcquisitionError;

/// Default location of the NVIDIA System Management Interface
pub const DEFAULT_SMI_PATH: &str = "/usr/bin/nvidia-smi";

/// Where a scrape gets its raw diagnostic bytes from.
#[async_trait]
pub trait DiagnosticSource: Send + Sync {
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError>;

    /// Human-readable description for startup logging
    fn describe(&self) -> String;
}

/// Live acquisition: runs `nvidia-smi -q -x` and captures stdout.
pub struct SmiCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl SmiCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["-q".to_string(), "-x".to_string()],
        }
    }

    /// Replace the default `-q -x` arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for SmiCommand {
    fn default() -> Self {
        Self::new(DEFAULT_SMI_PATH)
    }
}

#[async_trait]
impl DiagnosticSource for SmiCommand {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError> {
        debug!("Fetching GPU diagnostics");

        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                debug!(bytes = out.stdout.len(), "Diagnostics captured");
                Ok(out.stdout)
            }
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                error!("{} exited with {}", self.program.display(), out.status);
                Err(AcquisitionError::NonZeroExit {
                    program: self.program.clone(),
                    status: out.status.to_string(),
                    stderr,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("{} not found", self.program.display());
                Err(AcquisitionError::NotFound {
                    program: self.program.clone(),
                })
            }
            Err(e) => {
                error!("{} execution failed: {}", self.program.display(), e);
                Err(AcquisitionError::Spawn {
                    program: self.program.clone(),
                    source: e,
                })
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} {}", self.program.display(), self.args.join(" "))
    }
}

/// Test-mode acquisition: reads a previously captured document from disk.
pub struct FixtureFile {
    path: PathBuf,
}

impl FixtureFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DiagnosticSource for FixtureFile {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            error!("Failed to read fixture: {}", e);
            AcquisitionError::Fixture {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    fn describe(&self) -> String {
        format!("fixture {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program() {
        let source = SmiCommand::new("/nonexistent/nvidia-smi");
        let err = source.acquire().await.unwrap_err();

        assert!(matches!(err, AcquisitionError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let source = SmiCommand::new("/bin/sh").with_args(["-c", "echo boom >&2; exit 3"]);
        let err = source.acquire().await.unwrap_err();

        match err {
            AcquisitionError::NonZeroExit { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let source = SmiCommand::new("/bin/sh").with_args(["-c", "printf '<nvidia_smi_log/>'"]);
        let raw = source.acquire().await.unwrap();

        assert_eq!(raw, b"<nvidia_smi_log/>");
    }

    #[tokio::test]
    async fn test_missing_fixture() {
        let source = FixtureFile::new("/nonexistent/test.xml");
        let err = source.acquire().await.unwrap_err();

        assert!(matches!(err, AcquisitionError::Fixture { .. }));
    }

    #[test]
    fn test_describe() {
        assert_eq!(SmiCommand::default().describe(), "/usr/bin/nvidia-smi -q -x");
        assert_eq!(FixtureFile::new("test.xml").describe(), "fixture test.xml");
    }
}
