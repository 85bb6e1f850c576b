//! Board tests

use web_tetris::core::Board;
use web_tetris::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.is_empty());

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.accepts(x, y), "Cell ({}, {}) should accept a mino", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));

    assert!(board.set(0, 0, Some(PieceKind::C)));
    assert_eq!(board.get(0, 0), Some(Some(PieceKind::C)));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();

    assert!(!board.set(-1, 0, Some(PieceKind::T)));
    assert!(!board.set(0, -1, Some(PieceKind::T)));
    assert!(!board.set(BOARD_WIDTH as i8, 0, Some(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, Some(PieceKind::T)));
    assert!(board.is_empty());
}

#[test]
fn test_board_accepts() {
    let mut board = Board::new();

    board.set(5, 10, Some(PieceKind::T));
    assert!(!board.accepts(5, 10));
    assert!(board.is_occupied(5, 10));

    // Walls and floor
    assert!(!board.accepts(-1, 0));
    assert!(!board.accepts(BOARD_WIDTH as i8, 0));
    assert!(!board.accepts(0, BOARD_HEIGHT as i8));

    // Above the top edge is open space
    assert!(board.accepts(0, -1));
    assert!(board.accepts(9, -4));
    assert!(!board.accepts(-1, -1));
}

#[test]
fn test_board_stamp_skips_cells_above_top() {
    let mut board = Board::new();
    let minos = [(0, 0), (0, 1), (0, 2)];

    let written = board.stamp(&minos, 4, -1, PieceKind::J);
    assert_eq!(written, 2);
    assert_eq!(board.get(4, 0), Some(Some(PieceKind::J)));
    assert_eq!(board.get(4, 1), Some(Some(PieceKind::J)));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_board_is_row_full() {
    let mut board = Board::new();

    assert!(!board.is_row_full(5));

    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 5, Some(PieceKind::T));
    }
    assert!(board.is_row_full(5));

    for x in 0..BOARD_WIDTH - 1 {
        board.set(x as i8, 6, Some(PieceKind::I));
    }
    assert!(!board.is_row_full(6));
    assert!(!board.is_row_full(BOARD_HEIGHT as usize));
}

#[test]
fn test_board_clear_full_rows() {
    let mut board = Board::new();

    // Fill rows 18 and 19 (bottom two)
    for x in 0..BOARD_WIDTH {
        board.set(x as i8, 18, Some(PieceKind::I));
        board.set(x as i8, 19, Some(PieceKind::O));
    }

    // Put something at row 17
    board.set(0, 17, Some(PieceKind::T));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[18, 19]);

    // Row 17 content should now be at row 19
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.get(0, 17), Some(None));
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_board_clear_non_adjacent_rows() {
    let mut board = Board::from_ascii(&[
        "a.........",
        "##########",
        "b.........",
        "##########",
    ]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[17, 19]);

    assert_eq!(board.get(0, 19), Some(Some(PieceKind::B)));
    assert_eq!(board.get(0, 18), Some(Some(PieceKind::A)));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_board_clearing_keeps_dimensions() {
    let mut board = Board::from_ascii(&["##########"; 20]);
    assert_eq!(board.clear_full_rows().len(), 20);
    assert!(board.is_empty());
    assert_eq!(board.cells().len(), BOARD_WIDTH as usize * BOARD_HEIGHT as usize);
    assert_eq!(board.rows().count(), BOARD_HEIGHT as usize);
}

#[test]
fn test_board_from_ascii_is_bottom_aligned() {
    let board = Board::from_ascii(&["t.........", "..#......."]);
    assert_eq!(board.get(0, 18), Some(Some(PieceKind::T)));
    assert_eq!(board.get(2, 19), Some(Some(PieceKind::I)));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_board_clear() {
    let mut board = Board::from_ascii(&["##.##.##.#"]);
    assert!(!board.is_empty());
    board.clear();
    assert!(board.is_empty());
}
