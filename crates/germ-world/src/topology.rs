//! Grid topology construction.
//!
//! Cells are laid out row-major over `rows * cols` indices
//! (row = i / cols, col = i % cols). The edge set is 4-connected plus both
//! diagonals, with no wraparound at the grid border.

use crate::cell::Cell;
use std::sync::Arc;

/// Link the ordered cell sequence into the grid's neighbor graph.
///
/// Deterministic, no randomness. Each unordered pair is processed exactly
/// once: every index links only its up, up-left, up-right and left
/// neighbors, and `Cell::link` registers both directions.
///
/// ```text
/// o - o - o
/// | X | X |
/// o - o - o
/// | X | X |
/// o - o - o
/// ```
pub fn link_grid(cells: &[Arc<Cell>], rows: usize, cols: usize) {
    assert_eq!(
        cells.len(),
        rows * cols,
        "cell count must match grid dimensions"
    );

    for i in 0..rows * cols {
        // Link up, except the first row.
        if i >= cols {
            cells[i].link(&cells[i - cols]);
            // Link up-left, except the first column.
            if i % cols != 0 {
                cells[i].link(&cells[i - cols - 1]);
            }
            // Link up-right, except the last column.
            if (i + 1) % cols != 0 {
                cells[i].link(&cells[i - cols + 1]);
            }
        }
        // Link left, except the first column.
        if i % cols != 0 {
            cells[i].link(&cells[i - 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use germ_core::CellId;
    use proptest::prelude::*;
    use std::time::Duration;

    fn make_cells(count: usize) -> Vec<Arc<Cell>> {
        (0..count)
            .map(|i| {
                Arc::new(Cell::new(
                    CellId(i as u32),
                    300,
                    1,
                    Duration::from_millis(10),
                    10,
                ))
            })
            .collect()
    }

    /// In-grid neighbor count computed independently of `link_grid`.
    fn expected_degree(rows: usize, cols: usize, row: usize, col: usize) -> usize {
        let mut degree = 0;
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = row as i64 + dr;
                let c = col as i64 + dc;
                if r >= 0 && r < rows as i64 && c >= 0 && c < cols as i64 {
                    degree += 1;
                }
            }
        }
        degree
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        let cells = make_cells(1);
        link_grid(&cells, 1, 1);
        assert_eq!(cells[0].output_count(), 0);
    }

    #[test]
    fn test_2x2_is_fully_connected() {
        let cells = make_cells(4);
        link_grid(&cells, 2, 2);
        for cell in &cells {
            assert_eq!(cell.output_count(), 3);
        }
    }

    #[test]
    fn test_3x3_degrees() {
        let cells = make_cells(9);
        link_grid(&cells, 3, 3);

        // Corners, edges, center.
        assert_eq!(cells[0].output_count(), 3);
        assert_eq!(cells[1].output_count(), 5);
        assert_eq!(cells[4].output_count(), 8);
        assert_eq!(cells[8].output_count(), 3);
    }

    #[test]
    fn test_single_row_is_a_path() {
        let cells = make_cells(5);
        link_grid(&cells, 1, 5);
        assert_eq!(cells[0].output_count(), 1);
        assert_eq!(cells[2].output_count(), 2);
        assert_eq!(cells[4].output_count(), 1);
    }

    #[tokio::test]
    async fn test_edges_are_bidirectional() {
        let cells = make_cells(2);
        link_grid(&cells, 1, 2);

        assert!(cells[0].emit().await);
        assert_eq!(cells[1].queued_deposits(), 1);
        assert!(cells[1].emit().await);
        assert_eq!(cells[0].queued_deposits(), 1);
    }

    #[test]
    #[should_panic(expected = "must match grid dimensions")]
    fn test_mismatched_cell_count_panics() {
        let cells = make_cells(3);
        link_grid(&cells, 2, 2);
    }

    proptest! {
        /// Exact per-cell degree implies both full coverage and the absence
        /// of double links for every grid shape.
        #[test]
        fn prop_degrees_match_grid_geometry(rows in 2usize..=6, cols in 2usize..=6) {
            let cells = make_cells(rows * cols);
            link_grid(&cells, rows, cols);

            for i in 0..rows * cols {
                let expected = expected_degree(rows, cols, i / cols, i % cols);
                prop_assert_eq!(cells[i].output_count(), expected);
            }
        }

        /// The handshake count: total degree is twice the edge count of the
        /// king-graph over the grid.
        #[test]
        fn prop_total_degree_is_twice_edge_count(rows in 2usize..=6, cols in 2usize..=6) {
            let cells = make_cells(rows * cols);
            link_grid(&cells, rows, cols);

            let horizontal = rows * (cols - 1);
            let vertical = (rows - 1) * cols;
            let diagonal = 2 * (rows - 1) * (cols - 1);
            let edges = horizontal + vertical + diagonal;

            let total_degree: usize = cells.iter().map(|c| c.output_count()).sum();
            prop_assert_eq!(total_degree, 2 * edges);
        }
    }
}
