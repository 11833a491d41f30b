use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    constants::PGN_EXTENSION,
    error::{ChessError, Result},
    pgn::PgnReader,
    replay::GameDriver,
    stats::Statistics,
};

fn has_pgn_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PGN_EXTENSION))
}

/// `path` itself when it is a file; otherwise the `.pgn` files directly
/// inside the directory, sorted by name.
pub fn pgn_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !fs::metadata(path)?.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();

        if entry_path.is_file() && has_pgn_extension(&entry_path) {
            files.push(entry_path);
        } else {
            warn!(path = %entry_path.display(), "skipping non-PGN entry");
        }
    }
    files.sort();

    Ok(files)
}

/// Replays every game of one PGN file. Errors carry the file, game ordinal
/// and line.
pub fn analyse_file(driver: &mut GameDriver, path: &Path) -> Result<usize> {
    info!(path = %path.display(), "reading games");

    let mut reader = PgnReader::new(BufReader::new(File::open(path)?));
    let mut games = 0;

    while let Some(record) = reader.next() {
        let game = games + 1;
        let in_game = |line: usize, source: ChessError| ChessError::InGame {
            path: path.to_path_buf(),
            game,
            line,
            source: Box::new(source),
        };

        let record = record.map_err(|e| in_game(reader.line_number(), e))?;
        let moves = record.moves().map_err(|e| in_game(record.line, e))?;

        debug!(
            game,
            white = record.tags.get("White").unwrap_or("?"),
            black = record.tags.get("Black").unwrap_or("?"),
            moves = moves.len(),
            "replaying"
        );

        driver
            .replay(&moves)
            .map_err(|e| in_game(record.line, e))?;
        games += 1;
    }

    Ok(games)
}

/// Replays every game under `path` and returns the folded statistics.
/// The first failure aborts the whole run.
pub fn analyse_path(path: &Path) -> Result<Statistics> {
    let mut driver = GameDriver::new();

    for file in pgn_files(path)? {
        let games = analyse_file(&mut driver, &file)?;
        info!(path = %file.display(), games, "file done");
    }

    let statistics = driver.into_statistics();
    info!(
        games = statistics.games,
        plies = statistics.all_plies,
        "analysis complete"
    );

    Ok(statistics)
}
