
use pawns_history::{
    board::Board,
    error::ChessError,
    replay::GameDriver,
    resolver::{candidates, would_leave_king_in_check},
    types::{Piece, Side, Square},
};
use test_utils::*;

#[test]
fn test_pinned_knight_is_passed_over() {
    // b4 bishop pins d2 against e1
    let mut driver = driver_from("4k3/8/8/8/1b6/8/3N4/4K1N1");
    let g_knight = id_at(driver.board(), Square::G1);
    let d_knight = id_at(driver.board(), Square::D2);

    let applied = driver.play(Side::White, "Nf3").unwrap();

    assert_eq!(applied.mover, g_knight, "only the g1 knight may go to f3");
    assert_eq!(
        driver.board().piece_at(Square::D2),
        Some(d_knight),
        "pinned knight should stay on d2"
    );
}

#[test]
fn test_pin_along_the_rank() {
    let mut driver = driver_from("4k3/8/8/8/8/8/3N4/4K1Nr");
    let d_knight = id_at(driver.board(), Square::D2);

    let applied = driver.play(Side::White, "Nf3").unwrap();

    assert_eq!(applied.mover, d_knight, "g1 is pinned by the h1 rook");
    assert_eq!(
        kind_at(driver.board(), Square::G1),
        Some((Side::White, Piece::Knight)),
        "pinned knight should stay on g1"
    );
}

#[test]
fn test_every_candidate_pinned() {
    let mut driver = driver_from("4k3/8/8/8/1b6/8/3N4/4K1Nr");

    match driver.play(Side::White, "Nf3") {
        Err(ChessError::NoCandidate { ply }) => assert_eq!(ply, "Nf3", "error should name the ply"),
        other => panic!("expected NoCandidate, got {other:?}"),
    }
}

#[test]
fn test_file_hint_picks_the_named_knight() {
    let board = board_from("4k3/8/8/8/8/5N2/8/1N2K3");
    let b_knight = id_at(&board, Square::B1);
    let f_knight = id_at(&board, Square::F3);

    let mut driver = GameDriver::with_board(board.clone());
    assert_eq!(
        driver.play(Side::White, "Nbd2").unwrap().mover,
        b_knight,
        "Nbd2 should move the b1 knight"
    );

    let mut driver = GameDriver::with_board(board);
    assert_eq!(
        driver.play(Side::White, "Nfd2").unwrap().mover,
        f_knight,
        "Nfd2 should move the f3 knight"
    );
}

#[test]
fn test_hint_matching_no_candidate_is_ambiguous() {
    let mut driver = driver_from("4k3/8/8/8/8/5N2/8/1N2K3");

    match driver.play(Side::White, "Ncd2") {
        Err(ChessError::AmbiguousMove { candidates, .. }) => {
            assert_eq!(candidates, 0, "no knight stands on the c-file")
        }
        other => panic!("expected AmbiguousMove, got {other:?}"),
    }
}

#[test]
fn test_two_legal_candidates_without_hint() {
    let mut driver = driver_from("4k3/8/8/8/8/5N2/8/1N2K3");

    match driver.play(Side::White, "Nd2") {
        Err(ChessError::AmbiguousMove { ply, candidates }) => {
            assert_eq!(ply, "Nd2", "error should name the ply");
            assert_eq!(candidates, 2, "both knights can legally reach d2");
        }
        other => panic!("expected AmbiguousMove, got {other:?}"),
    }
}

#[test]
fn test_rank_hint_on_the_same_file() {
    let board = board_from("4k3/8/8/8/8/1N6/8/1N2K3");
    let lower = id_at(&board, Square::B1);
    let upper = id_at(&board, Square::B3);

    let mut driver = GameDriver::with_board(board.clone());
    assert_eq!(
        driver.play(Side::White, "N1d2").unwrap().mover,
        lower,
        "N1d2 should move the b1 knight"
    );

    let mut driver = GameDriver::with_board(board.clone());
    assert_eq!(
        driver.play(Side::White, "N3d2").unwrap().mover,
        upper,
        "N3d2 should move the b3 knight"
    );

    // Both stand on the b-file
    let mut driver = GameDriver::with_board(board);
    assert!(
        matches!(
            driver.play(Side::White, "Nbd2"),
            Err(ChessError::AmbiguousMove { candidates: 2, .. })
        ),
        "a file hint shared by both knights should be ambiguous"
    );
}

#[test]
fn test_needless_hint_is_illegal() {
    let mut driver = GameDriver::new();

    assert!(
        matches!(driver.play(Side::White, "Ngf3"), Err(ChessError::IllegalMove { .. })),
        "only g1 reaches f3, so the hint is unexpected"
    );
    assert!(driver.board().piece_at(Square::F3).is_none(), "rejected ply must not move anything");
}

#[test]
fn test_rays_stop_at_the_first_piece() {
    let board = board_from("4k3/8/8/8/8/8/8/R2NK2R");
    let a_rook = id_at(&board, Square::A1);

    assert_eq!(
        candidates(&board, Side::White, Piece::Rook, Square::C1),
        vec![a_rook],
        "the d1 knight blocks the h1 rook"
    );
    assert!(
        candidates(&board, Side::White, Piece::Bishop, Square::C1).is_empty(),
        "there are no bishops"
    );
}

#[test]
fn test_candidates_from_the_start_position() {
    let board = Board::new();

    assert_eq!(
        candidates(&board, Side::White, Piece::Knight, Square::F3),
        vec![id_at(&board, Square::G1)],
        "only g1 reaches f3"
    );
    assert_eq!(
        candidates(&board, Side::Black, Piece::Knight, Square::C6).len(),
        1,
        "only b8 reaches c6"
    );
    assert!(
        candidates(&board, Side::White, Piece::Queen, Square::D4).is_empty(),
        "queen is boxed in by pawns"
    );
    assert!(
        candidates(&board, Side::Black, Piece::Bishop, Square::B4).is_empty(),
        "bishops are boxed in by pawns"
    );
}

#[test]
fn test_legality_check_leaves_board_untouched() {
    let board = board_from("4k3/8/8/8/1b6/8/3N4/4K1N1");
    let before = board.to_string();
    let d_knight = id_at(&board, Square::D2);
    let g_knight = id_at(&board, Square::G1);

    assert!(
        would_leave_king_in_check(&board, d_knight, Square::F3).unwrap(),
        "moving the pinned knight exposes e1"
    );
    assert!(
        !would_leave_king_in_check(&board, g_knight, Square::F3).unwrap(),
        "moving g1 keeps the king safe"
    );

    assert_eq!(board.to_string(), before, "board changed during the check test");
    assert_eq!(board.piece(d_knight).square, Some(Square::D2), "knight left d2");
    assert_eq!(board.piece(d_knight).moves, 0, "trial move was counted");
    assert!(board.is_consistent(), "board inconsistent after the check test");
}

#[test]
fn test_pinned_piece_may_move_along_the_pin() {
    let board = board_from("4k3/8/8/8/1b6/8/3B4/4K3");
    let bishop = id_at(&board, Square::D2);

    assert!(
        would_leave_king_in_check(&board, bishop, Square::E3).unwrap(),
        "leaving the diagonal exposes e1"
    );
    assert!(
        !would_leave_king_in_check(&board, bishop, Square::C3).unwrap(),
        "staying on the diagonal keeps the pin blocked"
    );
    assert!(
        !would_leave_king_in_check(&board, bishop, Square::B4).unwrap(),
        "taking the pinning bishop is safe"
    );
    assert_eq!(
        board.piece_at(Square::B4).map(|id| board.piece(id).side),
        Some(Side::Black),
        "trial capture must not remove the real bishop"
    );
}

#[test]
fn test_destination_checks() {
    let mut driver = GameDriver::new();

    assert!(
        matches!(driver.play(Side::White, "Nd2"), Err(ChessError::IllegalMove { .. })),
        "d2 holds a white pawn"
    );
    assert!(
        matches!(driver.play(Side::White, "Nxf3"), Err(ChessError::IllegalMove { .. })),
        "nothing to take on f3"
    );

    let mut driver = driver_from("4k2R/8/8/8/8/8/8/4K3");
    assert!(
        matches!(driver.play(Side::White, "Rxe8"), Err(ChessError::IllegalMove { .. })),
        "kings are never captured"
    );

    let mut driver = driver_from("4k2n/8/8/8/8/8/8/4K2R");
    assert!(
        matches!(driver.play(Side::White, "Rh8"), Err(ChessError::IllegalMove { .. })),
        "moving onto a piece needs the capture mark"
    );
    let applied = driver.play(Side::White, "Rxh8").unwrap();
    assert!(applied.captured.is_some(), "Rxh8 should take the knight");
}

#[test]
fn test_unrecognised_ply_is_illegal() {
    let mut driver = GameDriver::new();

    for ply in ["Ze4", "e9", "Nf3=Q", "e2e4"] {
        assert!(
            matches!(driver.play(Side::White, ply), Err(ChessError::IllegalMove { .. })),
            "{ply} should be rejected"
        );
    }
}

#[test]
fn test_get_square_bounds() {
    let board = Board::new();

    assert_eq!(board.get_square(1, 1).unwrap(), Square::A1, "(1, 1) is a1");
    assert_eq!(board.get_square(8, 8).unwrap(), Square::H8, "(8, 8) is h8");
    assert_eq!(board.get_square(5, 2).unwrap(), Square::E2, "(5, 2) is e2");

    for (file, rank) in [(0, 1), (9, 1), (1, 0), (1, 9)] {
        match board.get_square(file, rank) {
            Err(ChessError::OutOfRange { file: f, rank: r }) => {
                assert_eq!((f, r), (file, rank), "error should carry the coordinates")
            }
            other => panic!("expected OutOfRange for ({file}, {rank}), got {other:?}"),
        }
    }
}
