use std::fmt;

use crate::{
    constants::{BACK_RANK, KNIGHT_OFFSETS, NUM_FILES, NUM_RANKS, NUM_SQUARES},
    error::{ChessError, Result},
    piece::Chessman,
    types::{Direction, Piece, PieceId, Side, Square},
};

/// The 64 squares plus the roster of pieces that can stand on them.
///
/// Squares hold roster indices, never pieces, so a piece is only ever reached
/// through `PieceId`. Occupancy and each piece's `square` are updated together
/// by the methods below and nowhere else.
#[derive(Clone, Debug)]
pub struct Board {
    squares: [Option<PieceId>; NUM_SQUARES],
    roster: Vec<Chessman>,
    /// Pawn that made a double step on the previous ply
    en_passant: Option<PieceId>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position with its 32 pieces.
    pub fn new() -> Self {
        let mut layout = [None; NUM_SQUARES];

        for (file, &piece) in BACK_RANK.iter().enumerate() {
            layout[file] = Some((Side::White, piece));
            layout[NUM_FILES + file] = Some((Side::White, Piece::Pawn));
            layout[6 * NUM_FILES + file] = Some((Side::Black, Piece::Pawn));
            layout[7 * NUM_FILES + file] = Some((Side::Black, piece));
        }

        Self::from_layout(layout)
    }

    pub fn empty() -> Self {
        Self {
            squares: [None; NUM_SQUARES],
            roster: Vec::new(),
            en_passant: None,
        }
    }

    /// Builds a board from the piece-placement field of a FEN string
    /// (e.g. `"4k3/8/8/8/8/8/4P3/4K3"`). Those squares become the pieces'
    /// initial squares, so `set_up` returns to this position.
    pub fn from_placement(placement: &str) -> Result<Self> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != NUM_RANKS {
            return Err(ChessError::parse(
                placement,
                format!("expected {} ranks, found {}", NUM_RANKS, rows.len()),
            ));
        }

        let mut layout = [None; NUM_SQUARES];

        // FEN lists rank 8 first
        for (row_index, row) in rows.iter().enumerate() {
            let rank = NUM_RANKS - 1 - row_index;
            let mut file = 0;

            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }

                let (side, piece) = Piece::from_fen_char(c)
                    .ok_or_else(|| ChessError::parse(row, format!("unknown piece letter {c:?}")))?;

                if file >= NUM_FILES {
                    return Err(ChessError::parse(row, "rank describes more than 8 files"));
                }

                layout[rank * NUM_FILES + file] = Some((side, piece));
                file += 1;
            }

            if file != NUM_FILES {
                return Err(ChessError::parse(
                    row,
                    format!("rank describes {file} files instead of {NUM_FILES}"),
                ));
            }
        }

        Ok(Self::from_layout(layout))
    }

    fn from_layout(layout: [Option<(Side, Piece)>; NUM_SQUARES]) -> Self {
        let mut board = Self::empty();

        for square in Square::iter() {
            if let Some((side, piece)) = layout[square as usize] {
                let id = PieceId(board.roster.len());
                board.roster.push(Chessman::new(side, piece, square));
                board.squares[square as usize] = Some(id);
            }
        }

        board
    }

    /// Clears every square, resets each piece to its initial type, square and
    /// counters, and places it back. Piece identities are kept.
    pub fn set_up(&mut self) {
        self.squares = [None; NUM_SQUARES];
        self.en_passant = None;

        for (index, chessman) in self.roster.iter_mut().enumerate() {
            chessman.reset();
            self.squares[chessman.initial_square as usize] = Some(PieceId(index));
        }
    }

    /// Square at 1-based `file` and `rank`.
    pub fn get_square(&self, file: i32, rank: i32) -> Result<Square> {
        Square::from_coords(file, rank)
    }

    pub fn piece_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square as usize]
    }

    pub fn occupant(&self, square: Square) -> Option<&Chessman> {
        self.piece_at(square).map(|id| self.piece(id))
    }

    pub fn piece(&self, id: PieceId) -> &Chessman {
        &self.roster[id.0]
    }

    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Chessman)> {
        self.roster
            .iter()
            .enumerate()
            .map(|(index, chessman)| (PieceId(index), chessman))
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// The side's king, if it is on the board.
    pub fn king(&self, side: Side) -> Option<PieceId> {
        self.pieces()
            .find(|(_, c)| c.side == side && c.piece == Piece::King && !c.is_captured())
            .map(|(id, _)| id)
    }

    pub fn en_passant_pawn(&self) -> Option<PieceId> {
        self.en_passant
    }

    pub(crate) fn set_en_passant_pawn(&mut self, pawn: Option<PieceId>) {
        self.en_passant = pawn;
    }

    /// Relocates `id` to `destination`. The destination must already be empty;
    /// captures are applied beforehand with [`Board::capture`]. Trial moves pass
    /// `count_move = false` so the piece's move counter is left alone.
    pub fn move_piece_on_square(
        &mut self,
        id: PieceId,
        destination: Square,
        count_move: bool,
    ) -> Result<()> {
        if self.squares[destination as usize].is_some() {
            return Err(ChessError::OccupiedSquare(destination));
        }

        if let Some(from) = self.roster[id.0].square {
            self.squares[from as usize] = None;
        }

        self.squares[destination as usize] = Some(id);

        let chessman = &mut self.roster[id.0];
        chessman.square = Some(destination);
        if count_move {
            chessman.moves += 1;
        }

        Ok(())
    }

    /// Takes `victim` off the board and credits `captor`.
    pub fn capture(&mut self, victim: PieceId, captor: PieceId) {
        self.remove_piece(victim);
        self.roster[victim.0].times_captured += 1;
        self.roster[captor.0].captures += 1;
    }

    /// Lifts a piece off the board without touching any counter.
    pub(crate) fn remove_piece(&mut self, id: PieceId) {
        if let Some(square) = self.roster[id.0].square.take() {
            self.squares[square as usize] = None;
        }
    }

    pub fn promote(&mut self, id: PieceId, piece: Piece) {
        let chessman = &mut self.roster[id.0];
        chessman.piece = piece;
        chessman.promotions += 1;
    }

    /// Whether any piece of `by` attacks `target`.
    pub fn is_attacked(&self, target: Square, by: Side) -> bool {
        // Sliders: the first piece met along each ray decides
        for direction in Direction::ALL {
            if let Some(id) = target.ray(direction).find_map(|sq| self.piece_at(sq)) {
                let chessman = self.piece(id);
                if chessman.side == by
                    && ((direction.is_diagonal() && chessman.piece.slides_diagonally())
                        || (!direction.is_diagonal() && chessman.piece.slides_orthogonally()))
                {
                    return true;
                }
            }
        }

        let is_attacker = |square: Option<Square>, piece: Piece| {
            square
                .and_then(|sq| self.occupant(sq))
                .is_some_and(|c| c.side == by && c.piece == piece)
        };

        for (file_delta, rank_delta) in KNIGHT_OFFSETS {
            if is_attacker(target.offset(file_delta, rank_delta), Piece::Knight) {
                return true;
            }
        }

        // A pawn of `by` attacks from one rank behind, seen from its own direction
        let pawn_rank_delta = -by.pawn_direction();
        for file_delta in [-1, 1] {
            if is_attacker(target.offset(file_delta, pawn_rank_delta), Piece::Pawn) {
                return true;
            }
        }

        Direction::ALL
            .into_iter()
            .any(|direction| is_attacker(target.step(direction), Piece::King))
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.king(side)
            .and_then(|id| self.piece(id).square)
            .is_some_and(|square| self.is_attacked(square, side.opponent()))
    }

    /// Occupancy agrees with every piece's recorded square.
    pub fn is_consistent(&self) -> bool {
        let squares_agree = Square::iter().all(|square| match self.piece_at(square) {
            Some(id) => id.0 < self.roster.len() && self.piece(id).square == Some(square),
            None => true,
        });

        let pieces_agree = self.pieces().all(|(id, chessman)| match chessman.square {
            Some(square) => self.piece_at(square) == Some(id),
            None => !self.squares.contains(&Some(id)),
        });

        squares_agree && pieces_agree
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..NUM_RANKS).rev() {
            write!(f, "{} ", rank + 1)?;

            for file in 0..NUM_FILES {
                let c = Square::try_from((rank * NUM_FILES + file) as u8)
                    .ok()
                    .and_then(|square| self.occupant(square))
                    .map(|c| c.piece.fen_char(c.side))
                    .unwrap_or('.');

                write!(f, " {c}")?;
            }

            writeln!(f)?;
        }

        write!(f, "\n   a b c d e f g h")
    }
}
