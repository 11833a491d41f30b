use tracing::{debug, trace};

use crate::{
    board::Board,
    constants::{
        KING_HOME_FILE, KING_SIDE_KING_FILE, KING_SIDE_ROOK_FILE, KING_SIDE_ROOK_TARGET_FILE,
        QUEEN_SIDE_KING_FILE, QUEEN_SIDE_ROOK_FILE, QUEEN_SIDE_ROOK_TARGET_FILE,
    },
    error::{ChessError, Result},
    movetext::{Move, move_list},
    resolver::{own_piece_at, resolve},
    san::{SanMove, parse_ply},
    stats::Statistics,
    types::{Piece, PieceId, Side, Square, Wing},
};

/// What one ply did to the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedPly {
    pub side: Side,
    pub mover: PieceId,
    /// Type of the mover before the ply (a promoting pawn is still a pawn here)
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceId>,
    pub en_passant: bool,
    pub promotion: Option<Piece>,
    /// The rook that moved along with the king
    pub castled_rook: Option<PieceId>,
}

impl AppliedPly {
    pub fn is_pawn_ply(&self) -> bool {
        self.piece == Piece::Pawn
    }
}

/// Resolves `ply` for `side` and applies it. Nothing is mutated unless the
/// ply resolves.
pub fn apply_ply(board: &mut Board, side: Side, ply: &str) -> Result<AppliedPly> {
    let mv = match parse_ply(ply)? {
        SanMove::Castle(wing) => return castle(board, side, ply, wing),
        SanMove::Normal(mv) => mv,
    };

    let resolution = resolve(board, side, ply, &mv)?;
    let mover = resolution.mover;
    let piece = board.piece(mover).piece;
    let from = board.piece(mover).square.ok_or_else(|| ChessError::NoCandidate {
        ply: ply.to_string(),
    })?;

    if let Some(victim) = resolution.captured {
        board.capture(victim, mover);
    }
    board.move_piece_on_square(mover, mv.to, true)?;

    if let Some(promotion) = mv.promotion {
        board.promote(mover, promotion);
    }

    let double_step = piece == Piece::Pawn && from.rank().abs_diff(mv.to.rank()) == 2;
    board.set_en_passant_pawn(double_step.then_some(mover));

    trace!(?side, ply, %from, to = %mv.to, captured = resolution.captured.is_some(), "applied");

    Ok(AppliedPly {
        side,
        mover,
        piece,
        from,
        to: mv.to,
        captured: resolution.captured,
        en_passant: resolution.en_passant,
        promotion: mv.promotion,
        castled_rook: None,
    })
}

/// Castling moves king and rook together without going through the resolver.
fn castle(board: &mut Board, side: Side, ply: &str, wing: Wing) -> Result<AppliedPly> {
    let (rook_file, king_target_file, rook_target_file) = match wing {
        Wing::King => (
            KING_SIDE_ROOK_FILE,
            KING_SIDE_KING_FILE,
            KING_SIDE_ROOK_TARGET_FILE,
        ),
        Wing::Queen => (
            QUEEN_SIDE_ROOK_FILE,
            QUEEN_SIDE_KING_FILE,
            QUEEN_SIDE_ROOK_TARGET_FILE,
        ),
    };

    let home_rank = side.home_rank() as i32 + 1;
    let square = |file: u8| Square::from_coords(file as i32 + 1, home_rank);

    let king_from = square(KING_HOME_FILE)?;
    let rook_from = square(rook_file)?;
    let king_to = square(king_target_file)?;
    let rook_to = square(rook_target_file)?;

    let king = own_piece_at(board, side, Piece::King, king_from)
        .ok_or_else(|| ChessError::illegal(ply, "king is not on its home square"))?;
    let rook = own_piece_at(board, side, Piece::Rook, rook_from)
        .ok_or_else(|| ChessError::illegal(ply, "rook is not on its corner"))?;

    let (low, high) = if rook_file < KING_HOME_FILE {
        (rook_file, KING_HOME_FILE)
    } else {
        (KING_HOME_FILE, rook_file)
    };
    for file in low + 1..high {
        if board.piece_at(square(file)?).is_some() {
            return Err(ChessError::illegal(ply, "pieces stand between king and rook"));
        }
    }

    board.move_piece_on_square(king, king_to, true)?;
    board.move_piece_on_square(rook, rook_to, true)?;
    board.set_en_passant_pawn(None);

    trace!(?side, ply, "castled");

    Ok(AppliedPly {
        side,
        mover: king,
        piece: Piece::King,
        from: king_from,
        to: king_to,
        captured: None,
        en_passant: false,
        promotion: None,
        castled_rook: Some(rook),
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplayState {
    /// Board reset, no ply applied yet
    Setup,
    Replaying,
    /// Game replayed and folded into the statistics
    Done,
}

/// Plies applied during one game, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub plies: Vec<AppliedPly>,
}

impl GameSummary {
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    pub fn pawn_ply_count(&self) -> usize {
        self.plies.iter().filter(|ply| ply.is_pawn_ply()).count()
    }

    /// Index of the first ply each piece made, by roster index.
    pub fn first_move_index(&self, roster_len: usize) -> Vec<Option<usize>> {
        let mut first = vec![None; roster_len];

        for (index, ply) in self.plies.iter().enumerate() {
            for id in std::iter::once(ply.mover).chain(ply.castled_rook) {
                if let Some(slot) = first.get_mut(id.0) {
                    slot.get_or_insert(index);
                }
            }
        }

        first
    }
}

/// Owns the board and the running statistics; replays one game at a time.
pub struct GameDriver {
    board: Board,
    state: ReplayState,
    statistics: Statistics,
}

impl Default for GameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GameDriver {
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    /// Driver over a custom starting position.
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            state: ReplayState::Setup,
            statistics: Statistics::default(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn into_statistics(self) -> Statistics {
        self.statistics
    }

    pub fn set_up(&mut self) {
        self.board.set_up();
        self.state = ReplayState::Setup;
    }

    /// Applies a single ply to the current game.
    pub fn play(&mut self, side: Side, ply: &str) -> Result<AppliedPly> {
        let applied = apply_ply(&mut self.board, side, ply)?;
        self.state = ReplayState::Replaying;
        Ok(applied)
    }

    /// Setup, every ply in order, then the game is folded into the statistics.
    /// The first failing ply aborts the game.
    pub fn replay(&mut self, moves: &[Move]) -> Result<GameSummary> {
        self.set_up();

        let mut summary = GameSummary::default();
        for m in moves {
            for (side, ply) in m.plies() {
                let applied = self.play(side, ply).inspect_err(|e| {
                    debug!(number = m.number, ?side, ply, error = %e, "ply failed");
                })?;
                summary.plies.push(applied);
            }
        }

        self.statistics.record_game(&self.board, &summary);
        self.state = ReplayState::Done;

        trace!("final position\n{}", self.board);

        debug!(
            moves = moves.len(),
            plies = summary.ply_count(),
            pawn_plies = summary.pawn_ply_count(),
            "game replayed"
        );

        Ok(summary)
    }

    /// Parses `text` first; a parse failure leaves the board as it was.
    pub fn replay_movetext(&mut self, text: &str) -> Result<GameSummary> {
        let moves = move_list(text)?;
        self.replay(&moves)
    }
}
