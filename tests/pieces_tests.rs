//! Piece catalog and SRS rotation tests

use tetris_sim::core::kicks::{kick_offsets, try_rotate};
use tetris_sim::core::pieces::{cells, mask, spawn_position, Pose};
use tetris_sim::core::Board;
use tetris_sim::types::{PieceKind, Rotation, SPAWN_Y};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(cells(PieceKind::I, Rotation::North), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(cells(PieceKind::I, Rotation::East), [(1, 0), (1, 1), (1, 2), (1, 3)]);
    assert_eq!(cells(PieceKind::I, Rotation::South), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(cells(PieceKind::I, Rotation::West), [(2, 0), (2, 1), (2, 2), (2, 3)]);
}

#[test]
fn test_o_piece_shapes() {
    // O piece is the same for all rotations
    let north = mask(PieceKind::O, Rotation::North);
    for rotation in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(mask(PieceKind::O, rotation), north);
    }
    assert_eq!(north, 0x6600);
}

#[test]
fn test_masks_are_distinct_per_rotation() {
    for kind in [PieceKind::I, PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
        let masks = [Rotation::North, Rotation::East, Rotation::South, Rotation::West].map(|r| mask(kind, r));
        for i in 0..4 {
            for j in i + 1..4 {
                assert_ne!(masks[i], masks[j], "{:?} rotations {} and {}", kind, i, j);
            }
        }
    }
}

#[test]
fn test_spawn_positions() {
    for kind in PieceKind::ALL {
        let pose = Pose::spawn(kind);
        assert_eq!((pose.x, pose.y), spawn_position(kind));
        assert_eq!(pose.y, SPAWN_Y);
        assert_eq!(pose.rotation, Rotation::North);
        // Every spawn pose fits an empty board.
        assert!(!Board::new().is_blocked(kind, pose.rotation, pose.x, pose.y));
    }
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_in_open_space_needs_no_kick() {
    let board = Board::new();
    for kind in [PieceKind::I, PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
        let pose = Pose::spawn(kind);
        for requested in [Rotation::East, Rotation::West, Rotation::South] {
            let result = try_rotate(&board, pose, requested).unwrap();
            assert_eq!(result.offset, (0, 0));
            assert_eq!(result.rotation, requested);
        }
    }
}

#[test]
fn test_i_kick_fixture() {
    // First three candidates for 0 -> 1 blocked, fourth (-2, -1) open.
    let mut board = Board::new();
    let start = Pose {
        kind: PieceKind::I,
        rotation: Rotation::North,
        x: 4,
        y: 6,
    };
    board.set(5, 6, 1); // (0, 0): column 5
    board.set(3, 9, 1); // (-2, 0): column 3, top cell only
    board.set(6, 6, 1); // (1, 0): column 6

    let result = try_rotate(&board, start, Rotation::East).unwrap();
    assert_eq!(result.offset, (-2, -1));
    assert_eq!((result.x, result.y), (2, 5));
}

#[test]
fn test_wall_kick_off_the_left_wall() {
    let board = Board::new();
    // Upright line in column 0: lying flat in place would poke through the wall.
    let start = Pose {
        kind: PieceKind::I,
        rotation: Rotation::East,
        x: -1,
        y: 10,
    };
    assert!(!board.is_blocked(start.kind, start.rotation, start.x, start.y));
    assert!(board.is_blocked(start.kind, Rotation::North, start.x, start.y));

    // East -> North tries two columns right second.
    let result = try_rotate(&board, start, Rotation::North).unwrap();
    assert_eq!(result.offset, (2, 0));
    assert_eq!((result.x, result.y), (1, 10));
}

#[test]
fn test_kick_order_for_reverse_step_mirrors_forward() {
    for kind in [PieceKind::I, PieceKind::T] {
        for from in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
            let forward = kick_offsets(kind, from, from.cw()).unwrap();
            let back = kick_offsets(kind, from.cw(), from).unwrap();
            for (f, b) in forward.iter().zip(back.iter()) {
                assert_eq!((f.0, f.1), (-b.0, -b.1));
            }
        }
    }
}

#[test]
fn test_o_never_rotates() {
    let board = Board::new();
    assert!(try_rotate(&board, Pose::spawn(PieceKind::O), Rotation::East).is_none());
}
