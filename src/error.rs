use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the game: config files, the leaderboard file, and CLI flags.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
