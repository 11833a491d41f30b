use std::sync::LazyLock;

use regex::Regex;

use crate::{
    constants::RESULT_MARKERS,
    error::{ChessError, Result},
    types::Side,
};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("comment pattern is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("tag pattern is valid"));
static NAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+").expect("NAG pattern is valid"));
static DOT_SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+").expect("dot pattern is valid"));
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\.+)(.*)$").expect("move number pattern is valid"));

/// One full move: white's ply and, unless the game ended first, black's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub number: u32,
    pub white: String,
    pub black: Option<String>,
}

impl Move {
    fn new(number: u32, white: &str) -> Self {
        Self {
            number,
            white: white.to_string(),
            black: None,
        }
    }

    pub fn plies(&self) -> impl Iterator<Item = (Side, &str)> {
        std::iter::once((Side::White, self.white.as_str()))
            .chain(self.black.as_deref().map(|ply| (Side::Black, ply)))
    }
}

/// Drops `(...)` variations, including nested ones.
fn strip_variations(text: &str) -> String {
    let mut depth = 0usize;
    let mut stripped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    stripped
}

/// Comments, variations, tags and annotation glyphs removed; one line.
pub fn clean_movetext(text: &str) -> String {
    let text = COMMENT_RE.replace_all(text, " ");
    let text = strip_variations(&text);
    let text = TAG_RE.replace_all(&text, " ");
    let text = NAG_RE.replace_all(&text, " ");
    let text = text.replace(['\r', '\n'], " ");

    DOT_SPACES_RE.replace_all(&text, ".").into_owned()
}

fn is_result_marker(token: &str) -> bool {
    RESULT_MARKERS.contains(&token)
}

/// Parses one game's movetext into its moves.
///
/// A token starting with a move number opens a new move; a bare token fills
/// black's slot of the current one. `N...` tokens resume black's ply of move N
/// after a comment. Result markers are discarded.
pub fn move_list(text: &str) -> Result<Vec<Move>> {
    let cleaned = clean_movetext(text);
    let mut moves: Vec<Move> = Vec::new();
    let mut last_number = None;

    for token in cleaned.split_whitespace() {
        if is_result_marker(token) {
            continue;
        }

        if let Some(caps) = NUMBERED_RE.captures(token) {
            let number: u32 = caps[1]
                .parse()
                .map_err(|_| ChessError::parse(token, "move number does not fit"))?;
            let ply = &caps[3];
            let ply = if is_result_marker(ply) { "" } else { ply };
            last_number = Some(number);

            if caps[2].len() >= 3 {
                let current = moves
                    .last_mut()
                    .filter(|m| m.number == number && m.black.is_none())
                    .ok_or_else(|| {
                        ChessError::parse(token, "black continuation does not follow its move")
                    })?;

                if !ply.is_empty() {
                    current.black = Some(ply.to_string());
                }
                continue;
            }

            moves.push(Move::new(number, ply));
            continue;
        }

        let current = moves
            .last_mut()
            .ok_or_else(|| ChessError::parse(token, "ply before the first move number"))?;

        if current.black.is_some() {
            return Err(ChessError::parse(
                token,
                format!("move {} already has both plies", current.number),
            ));
        }

        current.black = Some(token.to_string());
    }

    validate_moves(&moves, last_number)?;

    Ok(moves)
}

fn validate_moves(moves: &[Move], last_number: Option<u32>) -> Result<()> {
    let Some(last_number) = last_number else {
        return Ok(());
    };

    if moves.len() != last_number as usize {
        return Err(ChessError::parse(
            &format!("{last_number}."),
            format!(
                "number of moves ({}) does not match the last move number ({})",
                moves.len(),
                last_number
            ),
        ));
    }

    for (index, m) in moves.iter().enumerate() {
        let is_last = index + 1 == moves.len();

        if m.white.is_empty() {
            return Err(ChessError::parse(
                &format!("{}.", m.number),
                format!("move {} has no white ply", m.number),
            ));
        }

        if !is_last && m.black.as_deref().is_none_or(str::is_empty) {
            return Err(ChessError::parse(
                &format!("{}.{}", m.number, m.white),
                format!("move {} is not the last but has no black ply", m.number),
            ));
        }
    }

    Ok(())
}
