//! Board tests - grid access, collision predicate and row clearing

use tetris_sim::core::Board;
use tetris_sim::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL, VISIBLE_HEIGHT};

fn fill_row(board: &mut Board, y: i32, cell: u8) {
    for x in 0..BOARD_WIDTH as i32 {
        board.set(x, y, cell);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert_eq!(board.cells().len(), BOARD_WIDTH * BOARD_HEIGHT);
    assert_eq!(board.visible_cells().len(), BOARD_WIDTH * VISIBLE_HEIGHT);
    assert!(board.cells().iter().all(|&c| c == EMPTY_CELL));
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    // Negative coordinates
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);

    // Beyond bounds
    assert_eq!(board.get(BOARD_WIDTH as i32, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i32), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();

    assert!(board.set(5, 10, PieceKind::T.cell_value()));
    assert_eq!(board.get(5, 10), Some(6));
    assert!(board.is_occupied(5, 10));

    // Flat layout is bottom row first.
    assert_eq!(board.cells()[5 + 10 * BOARD_WIDTH], 6);

    assert!(!board.set(-1, 0, 1));
    assert!(!board.set(0, 40, 1));
}

#[test]
fn test_collision_against_walls_floor_and_blocks() {
    let mut board = Board::new();

    // T at north: bar on box row 2 (columns 1-3), nub on row 3.
    assert!(!board.is_blocked(PieceKind::T, Rotation::North, -1, -2));
    assert!(board.is_blocked(PieceKind::T, Rotation::North, -2, -2));
    assert!(board.is_blocked(PieceKind::T, Rotation::North, 0, -3));
    assert!(board.is_blocked(PieceKind::T, Rotation::North, 7, 0));

    board.set(3, 0, 1);
    assert!(board.is_blocked(PieceKind::T, Rotation::North, 0, -2));
    assert!(!board.is_blocked(PieceKind::T, Rotation::North, 0, -1));
}

#[test]
fn test_lock_and_clear_single_row() {
    let mut board = Board::new();
    for x in 0..9 {
        board.set(x, 0, 1);
    }
    assert!(!board.is_row_full(0));

    // Vertical line (box column 1) into the last gap.
    assert_eq!(board.lock_piece(PieceKind::I, Rotation::East, 8, 0), 4);
    assert!(board.is_row_full(0));

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[0]);
    assert_eq!(board.column_height(9), 3);
    assert_eq!(board.max_height(), 3);
    assert_eq!(board.get(0, 0), Some(EMPTY_CELL));
}

#[test]
fn test_clear_four_rows_keeps_stack_above() {
    let mut board = Board::new();
    for y in 0..4 {
        fill_row(&mut board, y, 2);
    }
    board.set(4, 4, 5);
    board.set(4, 6, 5);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 4);
    assert_eq!(board.get(4, 0), Some(5));
    assert_eq!(board.get(4, 2), Some(5));
    assert_eq!(board.get(4, 1), Some(EMPTY_CELL));
    assert_eq!(board.hole_count(), 1);
}

#[test]
fn test_clear_more_rows_than_one_piece_spans() {
    let mut rows = vec![[3; BOARD_WIDTH]; 6];
    rows.push([0, 0, 0, 0, 0, 0, 0, 0, 0, 4]);
    let mut board = Board::from_rows(&rows);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.len(), 6);
    assert_eq!(board.get(9, 0), Some(4));
    assert!((1..BOARD_HEIGHT).all(|y| board.row(y).unwrap().iter().all(|&c| c == EMPTY_CELL)));
}

#[test]
fn test_clear_nothing_is_a_no_op() {
    let mut board = Board::new();
    board.set(1, 1, 3);
    let before = board.clone();
    assert!(board.clear_full_rows().is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_from_rows_and_clear() {
    let mut board = Board::from_rows(&[[1; BOARD_WIDTH], [0, 2, 0, 0, 0, 0, 0, 0, 0, 0]]);
    assert!(board.is_row_full(0));
    assert_eq!(board.row(1).unwrap()[1], 2);

    board.clear();
    assert!(board.cells().iter().all(|&c| c == EMPTY_CELL));
}
