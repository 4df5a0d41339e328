//! SMS send capability
//!
//! Transmission is delegated to an external program on the host. The
//! capability is fire-and-forget: a successful invocation means the
//! message was handed off to the device tooling, not that the carrier
//! delivered it. No delivery receipt exists anywhere in this path.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Command;
use tracing::{debug, info};

/// Service trait for the device SMS send capability
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Hands one message to the send capability
    ///
    /// # Arguments
    /// * `phone` - Destination phone number
    /// * `message` - Message body
    async fn send(&self, phone: &str, message: &str) -> Result<()>;
}

/// SmsSender that invokes an external command
///
/// The program is invoked as `<program> <phone> <message>`. A successful
/// exit means the tool accepted the message for transmission.
pub struct CommandSmsSender {
    program: String,
}

impl CommandSmsSender {
    /// Creates a new command-backed sender
    ///
    /// # Arguments
    /// * `program` - Executable accepting the phone number and message body as arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Checks that the configured send program is invocable
    pub fn check_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute '{} --version'. Is it installed?",
                    self.program
                )
            })?;

        if !output.status.success() {
            anyhow::bail!("Send command '{}' is not working correctly", self.program);
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!("Send command is available: {}", version.trim());

        Ok(())
    }
}

#[async_trait]
impl SmsSender for CommandSmsSender {
    async fn send(&self, phone: &str, message: &str) -> Result<()> {
        debug!("Invoking {} for {}", self.program, phone);

        let output = Command::new(&self.program)
            .arg(phone)
            .arg(message)
            .output()
            .with_context(|| format!("Failed to execute send command '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Send command exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_reports_error() {
        let sender = CommandSmsSender::new("smsgate-no-such-binary");
        let err = sender.send("+923001234567", "Fee due").await.unwrap_err();
        assert!(err.to_string().contains("smsgate-no-such-binary"));
    }

    #[test]
    fn test_check_available_missing_program() {
        let sender = CommandSmsSender::new("smsgate-no-such-binary");
        assert!(sender.check_available().is_err());
    }
}
