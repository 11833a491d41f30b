/// NOTE: 1 ply = one move by a single player

use crate::types::Piece;

pub const NUM_SQUARES: usize = 64;
pub const NUM_RANKS: usize = 8;
pub const NUM_FILES: usize = 8;

/// Pieces per side in the standard starting position.
pub const NUM_PIECES_PER_SIDE: usize = 16;

/// Piece-placement field of the standard starting FEN.
pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// White's first rank, a-file to h-file. Black mirrors it on the eighth rank.
pub const BACK_RANK: [Piece; NUM_FILES] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// (file, rank) deltas of a knight jump.
#[rustfmt::skip]
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    ( 1,  2), ( 2,  1), ( 2, -1), ( 1, -2),
    (-1, -2), (-2, -1), (-2,  1), (-1,  2),
];

// Castling squares, 0-indexed files
pub const KING_HOME_FILE: u8 = 4;
pub const KING_SIDE_ROOK_FILE: u8 = 7;
pub const QUEEN_SIDE_ROOK_FILE: u8 = 0;
pub const KING_SIDE_KING_FILE: u8 = 6;
pub const KING_SIDE_ROOK_TARGET_FILE: u8 = 5;
pub const QUEEN_SIDE_KING_FILE: u8 = 2;
pub const QUEEN_SIDE_ROOK_TARGET_FILE: u8 = 3;

/// Game termination markers. They carry no move.
pub const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

pub const PGN_EXTENSION: &str = "pgn";
