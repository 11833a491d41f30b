use crate::types::{Piece, Side, Square};

impl Piece {
    pub fn iter() -> impl Iterator<Item = Piece> {
        [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ]
        .into_iter()
    }

    /// Piece named by an uppercase SAN letter. Pawns have no letter.
    pub fn from_san_letter(letter: char) -> Option<Piece> {
        match letter {
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }

    /// Piece from a FEN placement letter; the case gives the side.
    pub fn from_fen_char(c: char) -> Option<(Side, Piece)> {
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };

        Some((side, piece))
    }

    pub const fn fen_char(self, side: Side) -> char {
        let c = match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        };

        match side {
            Side::White => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    pub const fn slides_diagonally(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Queen)
    }

    pub const fn slides_orthogonally(self) -> bool {
        matches!(self, Piece::Rook | Piece::Queen)
    }
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank delta of a pawn push
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// 0-indexed rank a pawn lands on after a double step
    pub const fn double_step_rank(self) -> u8 {
        match self {
            Side::White => 3,
            Side::Black => 4,
        }
    }

    /// 0-indexed rank on which this side's pawns promote
    pub const fn back_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// 0-indexed rank this side's pieces start on
    pub const fn home_rank(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    /// 0-indexed rank this side's pawns land on when capturing en passant
    pub const fn en_passant_rank(self) -> u8 {
        match self {
            Side::White => 5,
            Side::Black => 2,
        }
    }
}

/// A physical piece followed through a game.
///
/// The identity is fixed when the board is built; `reset` restores the
/// starting state between games so counters can be folded per piece across a
/// whole corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chessman {
    pub side: Side,
    pub initial_piece: Piece,
    pub piece: Piece,
    pub initial_square: Square,
    /// `None` once captured
    pub square: Option<Square>,
    pub moves: u32,
    pub captures: u32,
    /// 0 or 1: a capture ends the piece's game
    pub times_captured: u32,
    pub promotions: u32,
}

impl Chessman {
    pub fn new(side: Side, piece: Piece, square: Square) -> Self {
        Self {
            side,
            initial_piece: piece,
            piece,
            initial_square: square,
            square: Some(square),
            moves: 0,
            captures: 0,
            times_captured: 0,
            promotions: 0,
        }
    }

    pub fn reset(&mut self) {
        self.piece = self.initial_piece;
        self.square = Some(self.initial_square);
        self.moves = 0;
        self.captures = 0;
        self.times_captured = 0;
        self.promotions = 0;
    }

    pub fn is_captured(&self) -> bool {
        self.square.is_none()
    }

    pub fn was_pawn(&self) -> bool {
        self.initial_piece == Piece::Pawn
    }
}
