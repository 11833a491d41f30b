use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{ChessError, Result},
    types::{Piece, Square, Wing},
};

static CASTLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[O0]-[O0](-[O0])?$").expect("castling pattern is valid"));

static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([NBRQK])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=([NBRQ]))?$")
        .expect("SAN pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SanMove {
    Castle(Wing),
    Normal(NormalMove),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalMove {
    pub piece: Piece,
    /// 0-indexed source file hint
    pub from_file: Option<u8>,
    /// 0-indexed source rank hint
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl NormalMove {
    pub fn has_hint(&self) -> bool {
        self.from_file.is_some() || self.from_rank.is_some()
    }

    pub fn matches_hint(&self, square: Square) -> bool {
        self.from_file.is_none_or(|file| square.file() == file)
            && self.from_rank.is_none_or(|rank| square.rank() == rank)
    }
}

/// Check, mate and annotation marks carry nothing the replay needs.
pub fn strip_suffixes(ply: &str) -> &str {
    ply.trim_end_matches(['+', '#', '!', '?'])
}

pub fn parse_ply(ply: &str) -> Result<SanMove> {
    let text = strip_suffixes(ply);

    if CASTLE_RE.is_match(text) {
        let wing = if text.len() > 3 { Wing::Queen } else { Wing::King };
        return Ok(SanMove::Castle(wing));
    }

    let caps = SAN_RE
        .captures(text)
        .ok_or_else(|| ChessError::illegal(ply, "not a recognised algebraic move"))?;

    let piece = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Piece::from_san_letter)
        .unwrap_or(Piece::Pawn);
    let from_file = caps.get(2).map(|m| m.as_str().as_bytes()[0] - b'a');
    let from_rank = caps.get(3).map(|m| m.as_str().as_bytes()[0] - b'1');
    let capture = caps.get(4).is_some();
    let to: Square = caps[5].parse()?;
    let promotion = caps
        .get(6)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Piece::from_san_letter);

    if piece != Piece::Pawn && promotion.is_some() {
        return Err(ChessError::illegal(ply, "only pawns promote"));
    }

    if piece == Piece::Pawn && from_rank.is_some() {
        return Err(ChessError::illegal(ply, "pawn moves never name a source rank"));
    }

    Ok(SanMove::Normal(NormalMove {
        piece,
        from_file,
        from_rank,
        capture,
        to,
        promotion,
    }))
}
