use std::path::PathBuf;

use thiserror::Error;

use crate::types::Square;

pub type Result<T> = std::result::Result<T, ChessError>;

#[derive(Debug, Error)]
pub enum ChessError {
    /// Malformed movetext or PGN record
    #[error("parse error at {token:?}: {message}")]
    Parse { token: String, message: String },

    /// 1-based coordinates outside the board
    #[error("square (file {file}, rank {rank}) is off the board")]
    OutOfRange { file: i32, rank: i32 },

    /// The resolver picked a destination that is still occupied. Always a bug upstream.
    #[error("square {0} is already occupied")]
    OccupiedSquare(Square),

    #[error("illegal move {ply:?}: {reason}")]
    IllegalMove { ply: String, reason: String },

    #[error("ambiguous move {ply:?}: {candidates} pieces qualify")]
    AmbiguousMove { ply: String, candidates: usize },

    #[error("no piece can play {ply:?}")]
    NoCandidate { ply: String },

    #[error("{}: game {game}, line {line}", path.display())]
    InGame {
        path: PathBuf,
        game: usize,
        /// Where the movetext starts, or where reading stopped
        line: usize,
        #[source]
        source: Box<ChessError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChessError {
    pub(crate) fn illegal(ply: &str, reason: impl Into<String>) -> Self {
        ChessError::IllegalMove {
            ply: ply.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(token: &str, message: impl Into<String>) -> Self {
        ChessError::Parse {
            token: token.to_string(),
            message: message.into(),
        }
    }

    /// The innermost error, with any file/game context peeled off.
    pub fn root(&self) -> &ChessError {
        match self {
            ChessError::InGame { source, .. } => source.root(),
            other => other,
        }
    }
}
