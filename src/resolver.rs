use tracing::trace;

use crate::{
    board::Board,
    constants::KNIGHT_OFFSETS,
    error::{ChessError, Result},
    san::NormalMove,
    types::{Direction, Piece, PieceId, Side, Square},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub mover: PieceId,
    pub captured: Option<PieceId>,
    pub en_passant: bool,
}

/// Works out which piece on the board played `ply`.
///
/// Candidates are found by walking the mover's movement pattern backwards from
/// the destination. Several candidates are narrowed down by the ply's
/// file/rank hint or, when it has none, by discarding those whose move would
/// leave their own king in check.
pub fn resolve(board: &Board, side: Side, ply: &str, mv: &NormalMove) -> Result<Resolution> {
    if mv.piece == Piece::Pawn {
        return resolve_pawn(board, side, ply, mv);
    }

    let captured = destination_victim(board, side, ply, mv)?;
    let found = candidates(board, side, mv.piece, mv.to);
    let mover = disambiguate(board, ply, mv, found)?;

    Ok(Resolution {
        mover,
        captured,
        en_passant: false,
    })
}

/// The enemy piece standing on the destination, checked against the ply's capture mark.
fn destination_victim(
    board: &Board,
    side: Side,
    ply: &str,
    mv: &NormalMove,
) -> Result<Option<PieceId>> {
    let Some(id) = board.piece_at(mv.to) else {
        if mv.capture {
            return Err(ChessError::illegal(ply, "capture on an empty square"));
        }
        return Ok(None);
    };

    let occupant = board.piece(id);
    if occupant.side == side {
        return Err(ChessError::illegal(ply, "destination holds a piece of the mover's side"));
    }
    if occupant.piece == Piece::King {
        return Err(ChessError::illegal(ply, "kings are never captured"));
    }
    if !mv.capture {
        return Err(ChessError::illegal(ply, "destination is occupied but the ply is no capture"));
    }

    Ok(Some(id))
}

pub(crate) fn own_piece_at(
    board: &Board,
    side: Side,
    piece: Piece,
    square: Square,
) -> Option<PieceId> {
    board.piece_at(square).filter(|&id| {
        let chessman = board.piece(id);
        chessman.side == side && chessman.piece == piece
    })
}

/// Every piece of `side` and type `piece` that could move to `to` on this board,
/// ignoring pins.
pub fn candidates(board: &Board, side: Side, piece: Piece, to: Square) -> Vec<PieceId> {
    let from_offsets = |offsets: &[(i8, i8)]| -> Vec<PieceId> {
        offsets
            .iter()
            .filter_map(|&(file_delta, rank_delta)| to.offset(file_delta, rank_delta))
            .filter_map(|square| own_piece_at(board, side, piece, square))
            .collect()
    };

    let along_rays = |directions: &[Direction]| -> Vec<PieceId> {
        directions
            .iter()
            .filter_map(|&direction| to.ray(direction).find_map(|square| board.piece_at(square)))
            .filter(|&id| {
                let chessman = board.piece(id);
                chessman.side == side && chessman.piece == piece
            })
            .collect()
    };

    match piece {
        Piece::Knight => from_offsets(&KNIGHT_OFFSETS),
        Piece::King => from_offsets(&Direction::ALL.map(Direction::delta)),
        Piece::Bishop => along_rays(&Direction::DIAGONAL),
        Piece::Rook => along_rays(&Direction::ORTHOGONAL),
        Piece::Queen => along_rays(&Direction::ALL),
        // Pawns are found by `resolve_pawn`
        Piece::Pawn => Vec::new(),
    }
}

fn disambiguate(board: &Board, ply: &str, mv: &NormalMove, found: Vec<PieceId>) -> Result<PieceId> {
    let square_of = |id: PieceId| board.piece(id).square;

    match found.as_slice() {
        [] => Err(ChessError::NoCandidate {
            ply: ply.to_string(),
        }),
        // SAN only disambiguates when it has to
        [_] if mv.has_hint() => Err(ChessError::illegal(
            ply,
            "names a source square although only one piece qualifies",
        )),
        [only] => Ok(*only),
        _ if mv.has_hint() => {
            let matching: Vec<PieceId> = found
                .iter()
                .copied()
                .filter(|&id| square_of(id).is_some_and(|square| mv.matches_hint(square)))
                .collect();

            match matching.as_slice() {
                [one] => Ok(*one),
                _ => Err(ChessError::AmbiguousMove {
                    ply: ply.to_string(),
                    candidates: matching.len(),
                }),
            }
        }
        _ => {
            let mut legal = Vec::with_capacity(found.len());
            for &id in &found {
                if !would_leave_king_in_check(board, id, mv.to)? {
                    legal.push(id);
                }
            }

            trace!(ply, candidates = found.len(), legal = legal.len(), "legality check");

            match legal.as_slice() {
                [one] => Ok(*one),
                [] => Err(ChessError::NoCandidate {
                    ply: ply.to_string(),
                }),
                _ => Err(ChessError::AmbiguousMove {
                    ply: ply.to_string(),
                    candidates: legal.len(),
                }),
            }
        }
    }
}

/// Whether moving `id` to `destination` (capturing whatever stands there)
/// exposes its own king. Works on a scratch copy; `board` is never touched.
pub fn would_leave_king_in_check(board: &Board, id: PieceId, destination: Square) -> Result<bool> {
    let side = board.piece(id).side;
    let mut trial = board.clone();

    if let Some(victim) = trial.piece_at(destination) {
        trial.remove_piece(victim);
    }
    trial.move_piece_on_square(id, destination, false)?;

    Ok(trial.is_in_check(side))
}

fn resolve_pawn(board: &Board, side: Side, ply: &str, mv: &NormalMove) -> Result<Resolution> {
    let direction = side.pawn_direction();
    let reaches_back_rank = mv.to.rank() == side.back_rank();

    match (reaches_back_rank, mv.promotion) {
        (true, None) => {
            return Err(ChessError::illegal(ply, "pawn reaches the back rank without promoting"));
        }
        (false, Some(_)) => {
            return Err(ChessError::illegal(ply, "promotion away from the back rank"));
        }
        _ => {}
    }

    let no_candidate = || ChessError::NoCandidate {
        ply: ply.to_string(),
    };

    if !mv.capture {
        if mv.from_file.is_some() {
            return Err(ChessError::illegal(ply, "pawn push names a source file"));
        }
        if board.piece_at(mv.to).is_some() {
            return Err(ChessError::illegal(ply, "pawn pushes onto an occupied square"));
        }

        let one_back = mv.to.offset(0, -direction).ok_or_else(no_candidate)?;
        if let Some(mover) = own_piece_at(board, side, Piece::Pawn, one_back) {
            return Ok(Resolution {
                mover,
                captured: None,
                en_passant: false,
            });
        }

        if board.piece_at(one_back).is_none() && mv.to.rank() == side.double_step_rank() {
            let two_back = one_back.offset(0, -direction).ok_or_else(no_candidate)?;
            if let Some(mover) = own_piece_at(board, side, Piece::Pawn, two_back) {
                return Ok(Resolution {
                    mover,
                    captured: None,
                    en_passant: false,
                });
            }
        }

        return Err(no_candidate());
    }

    let from_file = mv
        .from_file
        .ok_or_else(|| ChessError::illegal(ply, "pawn capture without a source file"))?;
    let file_delta = from_file as i8 - mv.to.file() as i8;
    if file_delta.abs() != 1 {
        return Err(ChessError::illegal(ply, "pawns capture on an adjacent file only"));
    }

    let source = mv.to.offset(file_delta, -direction).ok_or_else(no_candidate)?;
    let mover = own_piece_at(board, side, Piece::Pawn, source).ok_or_else(no_candidate)?;

    if board.piece_at(mv.to).is_some() {
        let captured = destination_victim(board, side, ply, mv)?;
        return Ok(Resolution {
            mover,
            captured,
            en_passant: false,
        });
    }

    // Empty destination: only en passant explains a pawn capture
    let victim = (mv.to.rank() == side.en_passant_rank())
        .then(|| mv.to.offset(0, -direction))
        .flatten()
        .and_then(|square| own_piece_at(board, side.opponent(), Piece::Pawn, square))
        .filter(|&id| board.en_passant_pawn() == Some(id))
        .ok_or_else(|| {
            ChessError::illegal(ply, "capture on an empty square that is not en passant")
        })?;

    Ok(Resolution {
        mover,
        captured: Some(victim),
        en_passant: true,
    })
}
