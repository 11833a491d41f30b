use std::{collections::BTreeMap, fmt};

#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

use crate::{
    board::Board,
    replay::GameSummary,
    types::{Side, Square},
};

/// `fraction` as a percentage of `total`; 0 when there is nothing to divide by.
pub fn percent(fraction: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (fraction * 100.0) / total
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurvivalTally {
    pub survived: u64,
    pub total: u64,
}

impl SurvivalTally {
    pub fn record(&mut self, survived: bool) {
        self.total += 1;
        if survived {
            self.survived += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        percent(self.survived as f64, self.total as f64)
    }
}

/// Running sums for a Pearson correlation coefficient.
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Correlation {
    n: u64,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
}

impl Correlation {
    pub fn add(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
    }

    pub fn samples(&self) -> u64 {
        self.n
    }

    /// `None` with fewer than two samples or when either variable is constant.
    pub fn coefficient(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }

        let n = self.n as f64;
        let covariance = n * self.sum_xy - self.sum_x * self.sum_y;
        let variance_x = n * self.sum_xx - self.sum_x * self.sum_x;
        let variance_y = n * self.sum_yy - self.sum_y * self.sum_y;
        let denominator = (variance_x * variance_y).sqrt();

        if denominator <= f64::EPSILON {
            return None;
        }

        Some(covariance / denominator)
    }
}

/// Career of the pawns starting on one square, summed over games.
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PawnRecord {
    pub games: u64,
    pub survived: u64,
    pub promoted: u64,
    pub moves: u64,
    pub kills: u64,
    pub deaths: u64,
}

impl PawnRecord {
    pub fn merge(&mut self, other: &PawnRecord) {
        self.games += other.games;
        self.survived += other.survived;
        self.promoted += other.promoted;
        self.moves += other.moves;
        self.kills += other.kills;
        self.deaths += other.deaths;
    }

    pub fn survival_rate(&self) -> f64 {
        percent(self.survived as f64, self.games as f64)
    }

    pub fn promotion_rate(&self) -> f64 {
        percent(self.promoted as f64, self.games as f64)
    }

    /// Kills minus deaths
    pub fn balance(&self) -> i64 {
        self.kills as i64 - self.deaths as i64
    }

    pub fn moves_per_game(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.moves as f64 / self.games as f64
    }

    pub fn moves_per_death(&self) -> Option<f64> {
        (self.deaths > 0).then(|| self.moves as f64 / self.deaths as f64)
    }
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    pub games: u64,
    pub all_plies: u64,
    pub pawn_plies: u64,
    /// Keyed by the pawn's starting square
    pub pawns: BTreeMap<Square, PawnRecord>,
    /// Each side's first pawn to move
    pub first_movers: SurvivalTally,
    /// Pawns that never moved, plus each side's pawn that moved for the first time last
    pub late_movers: SurvivalTally,
    /// Game length in plies against the pawn-ply fraction of the game
    pub length_vs_pawn_fraction: Correlation,
}

impl Statistics {
    /// Folds one finished game into the totals. `board` must still hold the
    /// game's final state.
    pub fn record_game(&mut self, board: &Board, summary: &GameSummary) {
        let plies = summary.ply_count() as u64;
        let pawn_plies = summary.pawn_ply_count() as u64;

        self.games += 1;
        self.all_plies += plies;
        self.pawn_plies += pawn_plies;

        if plies > 0 {
            self.length_vs_pawn_fraction
                .add(plies as f64, pawn_plies as f64 / plies as f64);
        }

        for (_, pawn) in board.pieces().filter(|(_, c)| c.was_pawn()) {
            let record = self.pawns.entry(pawn.initial_square).or_default();
            record.games += 1;
            record.survived += u64::from(!pawn.is_captured());
            record.promoted += u64::from(pawn.promotions > 0);
            record.moves += u64::from(pawn.moves);
            record.kills += u64::from(pawn.captures);
            record.deaths += u64::from(pawn.times_captured);
        }

        let first_move = summary.first_move_index(board.roster_len());

        for side in [Side::White, Side::Black] {
            let pawns: Vec<(bool, Option<usize>)> = board
                .pieces()
                .filter(|(_, c)| c.side == side && c.was_pawn())
                .map(|(id, c)| (!c.is_captured(), first_move[id.0]))
                .collect();

            let moved = pawns.iter().filter_map(|&(survived, at)| at.map(|at| (at, survived)));

            if let Some((_, survived)) = moved.clone().min_by_key(|&(at, _)| at) {
                self.first_movers.record(survived);
            }
            if let Some((_, survived)) = moved.max_by_key(|&(at, _)| at) {
                self.late_movers.record(survived);
            }
            for &(survived, _) in pawns.iter().filter(|(_, at)| at.is_none()) {
                self.late_movers.record(survived);
            }
        }
    }

    /// All origin squares summed together
    pub fn all_pawns(&self) -> PawnRecord {
        self.pawns.values().fold(PawnRecord::default(), |mut total, record| {
            total.merge(record);
            total
        })
    }

    pub fn pawn_ply_rate(&self) -> f64 {
        percent(self.pawn_plies as f64, self.all_plies as f64)
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "All plies: {}", self.all_plies)?;
        writeln!(
            f,
            "Pawn plies: {} ({:.1} %)",
            self.pawn_plies,
            self.pawn_ply_rate()
        )?;
        writeln!(
            f,
            "Correlation of pawn-ply fraction with game length: {}",
            format_optional(self.length_vs_pawn_fraction.coefficient(), 3)
        )?;
        writeln!(f)?;

        let all = self.all_pawns();
        writeln!(
            f,
            "All pawns: survived {:.1} %, promoted {:.1} %, kills {}, deaths {}, balance {:+}",
            all.survival_rate(),
            all.promotion_rate(),
            all.kills,
            all.deaths,
            all.balance()
        )?;
        writeln!(
            f,
            "  moves per pawn per game {:.2}, moves per death {}",
            all.moves_per_game(),
            format_optional(all.moves_per_death(), 2)
        )?;
        writeln!(
            f,
            "First pawn to move survived: {:.1} % ({} of {})",
            self.first_movers.rate(),
            self.first_movers.survived,
            self.first_movers.total
        )?;
        writeln!(
            f,
            "Last pawn to move or unmoved pawns survived: {:.1} % ({} of {})",
            self.late_movers.rate(),
            self.late_movers.survived,
            self.late_movers.total
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<6} {:>9} {:>9} {:>10} {:>6} {:>6} {:>7} {:>11}",
            "pawn",
            "survived",
            "promoted",
            "moves/game",
            "kills",
            "deaths",
            "balance",
            "moves/death"
        )?;
        for (square, record) in &self.pawns {
            writeln!(
                f,
                "{:<6} {:>7.1} % {:>7.1} % {:>10.2} {:>6} {:>6} {:>+7} {:>11}",
                square.to_string(),
                record.survival_rate(),
                record.promotion_rate(),
                record.moves_per_game(),
                record.kills,
                record.deaths,
                record.balance(),
                format_optional(record.moves_per_death(), 2)
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_nothing_is_zero() {
        assert_eq!(percent(3.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }

    #[test]
    fn test_correlation_perfect_and_undefined() {
        let mut c = Correlation::default();
        c.add(1.0, 2.0);
        assert_eq!(c.coefficient(), None);

        c.add(2.0, 4.0);
        c.add(3.0, 6.0);
        let r = c.coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-9, "expected 1.0, got {r}");

        let mut negative = Correlation::default();
        for (x, y) in [(10.0, 0.5), (20.0, 0.4), (30.0, 0.3)] {
            negative.add(x, y);
        }
        assert!((negative.coefficient().unwrap() + 1.0).abs() < 1e-9);

        let mut flat = Correlation::default();
        flat.add(1.0, 0.5);
        flat.add(2.0, 0.5);
        assert_eq!(flat.coefficient(), None);
    }

    #[test]
    fn test_pawn_record_ratios() {
        let record = PawnRecord {
            games: 4,
            survived: 1,
            promoted: 1,
            moves: 10,
            kills: 1,
            deaths: 3,
        };
        assert_eq!(record.survival_rate(), 25.0);
        assert_eq!(record.balance(), -2);
        assert_eq!(record.moves_per_game(), 2.5);
        assert!((record.moves_per_death().unwrap() - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(PawnRecord::default().moves_per_death(), None);
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_statistics_serialize_to_json() {
        let mut stats = Statistics::default();
        stats.games = 1;
        stats.pawns.insert(
            Square::E2,
            PawnRecord {
                games: 1,
                survived: 1,
                ..PawnRecord::default()
            },
        );

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"E2\""));

        let back: Statistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
