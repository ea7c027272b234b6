use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed and resolved something
/// - `Failure` (1): Command completed but nothing resolved at the position
/// - `Error` (2): Command failed due to internal error (bad arguments, config error, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed and resolved something.
    Success,
    /// Command completed but nothing resolved.
    Failure,
    /// Command failed due to internal error (unreadable file, config error, etc.).
    Error,
}

impl ExitStatus {
    /// `Success` when the command resolved something, `Failure` otherwise.
    pub fn from_found(found: bool) -> Self {
        if found { Self::Success } else { Self::Failure }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
