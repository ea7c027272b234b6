use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while loading a translation document.
///
/// None of these are fatal: the store substitutes an empty tree and keeps
/// serving every other label.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read translation file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse translation file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no translation file is tracked for label '{label}'")]
    NotTracked { label: String },
}
