pub mod board;
pub mod constants;
pub mod corpus;
pub mod error;
pub mod movetext;
pub mod pgn;
pub mod piece;
pub mod replay;
pub mod resolver;
pub mod san;
pub mod square;
pub mod stats;
pub mod types;
