
use pawns_history::{replay::GameDriver, stats::PawnRecord, types::Square};
use test_utils::*;

#[test]
fn test_opening_statistics() {
    let mut driver = GameDriver::new();
    driver.replay_movetext(OPENING).unwrap();

    let stats = driver.statistics();
    assert_eq!(stats.games, 1);
    assert_eq!(stats.all_plies, 4);
    assert_eq!(stats.pawn_plies, 2);
    assert_eq!(stats.pawn_ply_rate(), 50.0);
    assert_eq!(stats.pawns.len(), 16);
    assert_eq!(stats.length_vs_pawn_fraction.samples(), 1);

    assert_eq!((stats.first_movers.survived, stats.first_movers.total), (2, 2));
    // Each side: seven pawns that never moved plus the e-pawn
    assert_eq!((stats.late_movers.survived, stats.late_movers.total), (16, 16));

    assert_eq!(
        stats.pawns[&Square::E2],
        PawnRecord {
            games: 1,
            survived: 1,
            moves: 1,
            ..PawnRecord::default()
        }
    );
    assert_eq!(stats.pawns[&Square::D2].moves, 0);
}

#[test]
fn test_pawn_trade() {
    let mut driver = GameDriver::new();
    driver.replay_movetext("1.e4 d5 2.exd5 Qxd5").unwrap();

    let stats = driver.statistics();
    assert_eq!(stats.all_plies, 4);
    assert_eq!(stats.pawn_plies, 3);

    let e_pawn = stats.pawns[&Square::E2];
    assert_eq!((e_pawn.kills, e_pawn.deaths, e_pawn.moves), (1, 1, 2));
    assert_eq!(e_pawn.survived, 0);
    assert_eq!(e_pawn.balance(), 0);
    assert_eq!(e_pawn.moves_per_death(), Some(2.0));

    let d_pawn = stats.pawns[&Square::D7];
    assert_eq!((d_pawn.kills, d_pawn.deaths), (0, 1));
    assert_eq!(d_pawn.balance(), -1);

    assert_eq!((stats.first_movers.survived, stats.first_movers.total), (0, 2));
    assert_eq!((stats.late_movers.survived, stats.late_movers.total), (14, 16));

    let all = stats.all_pawns();
    assert_eq!(all.games, 16);
    assert_eq!((all.kills, all.deaths), (1, 2));
}

#[test]
fn test_statistics_accumulate_over_games() {
    let mut driver = GameDriver::new();
    driver.replay_movetext(OPENING).unwrap();
    driver.replay_movetext("1.e4 d5 2.exd5 Qxd5").unwrap();
    driver.replay_movetext("1.d4 d5 2.c4 e6 3.Nc3").unwrap();

    let stats = driver.statistics();
    assert_eq!(stats.games, 3);
    assert_eq!(stats.all_plies, 4 + 4 + 5);
    assert_eq!(stats.pawn_plies, 2 + 3 + 4);
    assert_eq!(stats.pawns[&Square::E2].games, 3);
    assert_eq!(stats.pawns[&Square::E2].moves, 1 + 2);
    assert_eq!(stats.length_vs_pawn_fraction.samples(), 3);
    assert!(stats.length_vs_pawn_fraction.coefficient().is_some());
}

#[test]
fn test_empty_game_counts_unmoved_pawns() {
    let mut driver = GameDriver::new();
    driver.replay_movetext("*").unwrap();

    let stats = driver.statistics();
    assert_eq!(stats.games, 1);
    assert_eq!(stats.all_plies, 0);
    assert_eq!(stats.length_vs_pawn_fraction.samples(), 0);
    assert_eq!(stats.first_movers.total, 0);
    assert_eq!((stats.late_movers.survived, stats.late_movers.total), (16, 16));
}

#[test]
fn test_promotion_is_recorded_against_the_origin_square() {
    let mut driver = driver_from("4k3/P7/8/8/8/8/8/4K3");
    driver.replay_movetext("1.a8=Q Kf7").unwrap();

    let record = driver.statistics().pawns[&Square::A7];
    assert_eq!(record.promoted, 1);
    assert_eq!(record.survived, 1);
    assert_eq!(record.promotion_rate(), 100.0);
}

#[test]
fn test_report_lists_every_origin_square() {
    let mut driver = GameDriver::new();
    driver.replay_movetext(OPENING).unwrap();

    let report = driver.statistics().to_string();

    assert!(report.contains("Games: 1"));
    assert!(report.contains("All plies: 4"));
    assert!(report.contains("Pawn plies: 2 (50.0 %)"));
    for square in ["a2", "h2", "a7", "h7"] {
        assert!(
            report.lines().any(|line| line.starts_with(square)),
            "no row for {square} in:\n{report}"
        );
    }
}
