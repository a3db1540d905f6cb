use checkerboard_calibration::board::{Board, BoardConfig, create_default_board};

#[test]
fn test_board_raster_order() {
    let config = BoardConfig {
        cols: 4,
        rows: 3,
        square_size: 0.025,
    };
    let board = Board::from_config(&config);
    assert_eq!(board.corner_count(), 12);
    assert_eq!(board.object_points.len(), 12);

    // Raster order: row by row, x fastest.
    let s = 0.025f32;
    let p0 = board.object_points[0];
    let p1 = board.object_points[1];
    let p4 = board.object_points[4];
    assert!((p0.x - 0.0).abs() < 1e-6 && (p0.y - 0.0).abs() < 1e-6);
    assert!((p1.x - s).abs() < 1e-6 && (p1.y - 0.0).abs() < 1e-6);
    assert!((p4.x - 0.0).abs() < 1e-6 && (p4.y - s).abs() < 1e-6);

    // Planar target: z = 0 everywhere.
    assert!(board.object_points.iter().all(|p| p.z == 0.0));

    let last = board.object_points[11];
    assert!((last.x - 3.0 * s).abs() < 1e-6);
    assert!((last.y - 2.0 * s).abs() < 1e-6);
}

#[test]
fn test_default_board() {
    let board = create_default_board();
    assert_eq!(board.config.cols, 15);
    assert_eq!(board.config.rows, 10);
    assert_eq!(board.corner_count(), 150);
    assert!((board.config.square_size - 1.0).abs() < 1e-12);
}
