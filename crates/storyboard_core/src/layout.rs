//! Panel grid geometry for a storyboard page.
//!
//! Panels read strictly left-to-right, then top-to-bottom. Panel `i`
//! (1-based) sits in row `ceil(i / columns)` and column
//! `((i - 1) mod columns) + 1`.

use serde::{Deserialize, Serialize};

/// A 1-based cell on the page grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    /// Row, counted from the top
    pub row: u32,
    /// Column, counted from the left
    pub column: u32,
}

/// Grid dimensions for a page holding a fixed number of panels.
///
/// # Examples
///
/// ```
/// use storyboard_core::{GridCell, PanelGrid};
///
/// let grid = PanelGrid::for_panels(6);
/// assert_eq!(grid.columns(), 3);
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.position(4), Some(GridCell { row: 2, column: 1 }));
/// assert_eq!(grid.position(7), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelGrid {
    panels: u32,
    columns: u32,
}

impl PanelGrid {
    /// Picks the column count for `panels` panels: the smallest square that
    /// fits them, so rows never outnumber columns.
    pub fn for_panels(panels: u32) -> Self {
        let mut columns = 1;
        while columns * columns < panels {
            columns += 1;
        }
        Self { panels, columns }
    }

    /// Uses an explicit column count. A zero column count is raised to one.
    pub fn with_columns(panels: u32, columns: u32) -> Self {
        Self {
            panels,
            columns: columns.max(1),
        }
    }

    /// Number of panels on the page.
    pub fn panels(&self) -> u32 {
        self.panels
    }

    /// Number of columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows needed to hold every panel.
    pub fn rows(&self) -> u32 {
        self.panels.div_ceil(self.columns)
    }

    /// Grid cell of panel `index` (1-based), or `None` when out of range.
    pub fn position(&self, index: u32) -> Option<GridCell> {
        if index == 0 || index > self.panels {
            return None;
        }
        Some(GridCell {
            row: index.div_ceil(self.columns),
            column: (index - 1) % self.columns + 1,
        })
    }

    /// Every panel's cell, in reading order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (1..=self.panels).filter_map(move |index| self.position(index))
    }

    /// Human-readable layout summary used in prompts.
    pub fn describe(&self) -> String {
        format!(
            "{} panels in a grid of {} columns by {} rows, read left-to-right then top-to-bottom",
            self.panels,
            self.columns,
            self.rows()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn column_choice_for_supported_panel_counts() {
        let expected = [(4, 2), (5, 3), (6, 3), (7, 3), (8, 3), (9, 3), (10, 4)];
        for (panels, columns) in expected {
            assert_eq!(PanelGrid::for_panels(panels).columns(), columns, "{panels} panels");
        }
    }

    #[test]
    fn mapping_matches_reading_order_formula() {
        for panels in 1..=10 {
            for columns in 1..=5 {
                let grid = PanelGrid::with_columns(panels, columns);
                for i in 1..=panels {
                    let cell = grid.position(i).unwrap();
                    assert_eq!(cell.row, i.div_ceil(columns));
                    assert_eq!(cell.column, ((i - 1) % columns) + 1);
                }
            }
        }
    }

    #[test]
    fn no_two_panels_share_a_cell() {
        for panels in 1..=10 {
            let grid = PanelGrid::for_panels(panels);
            let cells: HashSet<_> = grid.cells().collect();
            assert_eq!(cells.len(), panels as usize);
            assert!(cells.iter().all(|c| c.row <= grid.rows() && c.column <= grid.columns()));
        }
    }

    #[test]
    fn out_of_range_indices() {
        let grid = PanelGrid::for_panels(4);
        assert_eq!(grid.position(0), None);
        assert_eq!(grid.position(5), None);
    }

    #[test]
    fn zero_columns_is_clamped() {
        assert_eq!(PanelGrid::with_columns(4, 0).columns(), 1);
    }
}
