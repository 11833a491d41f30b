use std::{io::BufRead, sync::LazyLock};

use regex::Regex;

use crate::{
    error::{ChessError, Result},
    movetext::{Move, move_list},
};

static TAG_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\[(\w+)\s+"(.*)"\]$"#).expect("tag pair pattern is valid"));

/// Tag pairs in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(Vec<(String, String)>);

impl Tags {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn parse_tag_pair(line: &str) -> Result<(String, String)> {
    let caps = TAG_PAIR_RE
        .captures(line.trim())
        .ok_or_else(|| ChessError::parse(line, "malformed tag pair"))?;

    Ok((caps[1].to_string(), caps[2].replace("\\\"", "\"")))
}

/// One game as it appears in the file, movetext not yet parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub tags: Tags,
    pub movetext: String,
    /// 1-based line where the movetext starts
    pub line: usize,
}

impl GameRecord {
    pub fn moves(&self) -> Result<Vec<Move>> {
        move_list(&self.movetext)
    }
}

/// Iterator over the game records of a PGN source. A record is a tag block
/// followed by movetext, separated by blank lines.
pub struct PgnReader<R> {
    reader: R,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            finished: false,
        }
    }

    /// Lines consumed so far; the current line while a record is being read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn next_record(&mut self) -> Result<Option<GameRecord>> {
        let mut record = GameRecord::default();
        let mut tags = Vec::new();
        let mut in_movetext = false;
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                self.finished = true;
                break;
            }
            self.line_number += 1;

            // Byte-order mark written by some Windows exporters
            let text = if self.line_number == 1 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let trimmed = text.trim();

            if trimmed.starts_with('%') {
                continue;
            }

            if trimmed.is_empty() {
                if in_movetext {
                    break;
                }
                continue;
            }

            if !in_movetext && trimmed.starts_with('[') {
                tags.push(parse_tag_pair(trimmed).map_err(|_| {
                    ChessError::parse(
                        trimmed,
                        format!("malformed tag pair on line {}", self.line_number),
                    )
                })?);
                continue;
            }

            if !in_movetext {
                in_movetext = true;
                record.line = self.line_number;
            }
            record.movetext.push_str(trimmed);
            record.movetext.push('\n');
        }

        record.tags = Tags(tags);

        if !in_movetext {
            // Trailing tags with no movetext are not a game
            return Ok(None);
        }

        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for PgnReader<R> {
    type Item = Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_pair() {
        let (key, value) = parse_tag_pair(r#"[White "Kasparov, Garry"]"#).unwrap();
        assert_eq!(key, "White");
        assert_eq!(value, "Kasparov, Garry");

        let (_, value) = parse_tag_pair(r#"[Event "The \"Immortal\" Game"]"#).unwrap();
        assert_eq!(value, r#"The "Immortal" Game"#);

        assert!(parse_tag_pair("[White Kasparov]").is_err());
    }

    #[test]
    fn test_tags_lookup() {
        let tags = Tags(vec![("Result".to_string(), "1-0".to_string())]);
        assert_eq!(tags.get("Result"), Some("1-0"));
        assert_eq!(tags.get("ECO"), None);
        assert_eq!(tags.len(), 1);
    }
}
