//! RTF table support.
//!
//! RTF has no table object, only rows: `\trowd ... \cellx ...` defines the
//! cell boundaries of a row, `\cell` closes a cell and `\row` closes the row.
//! Consecutive rows form a table, which is finished when a paragraph outside
//! `\intbl` follows or the enclosing text ends. Finishing reconciles the rows:
//! every row is padded to the common left and right extents, and each cell is
//! assigned a column index and span over the sorted union of all boundaries.

use super::border::Borders;
use super::state::{TableCellDef, TableRowFormat};
use super::text::Paragraph;
use super::types::{Alignment, ColorRef};

/// A table in an RTF document.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table number, starting at 1
    pub number: usize,
    /// Table rows
    pub rows: Vec<TableRow>,
    /// Sorted column boundaries in twips
    pub columns: Vec<i32>,
}

impl Table {
    /// Frame name of the table, e.g. `Table 1`.
    pub fn name(&self) -> String {
        format!("Table {}", self.number)
    }

    /// Get the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns of the reconciled grid.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Row height in twips, negative for exact height
    pub height: i32,
    /// Left edge in twips
    pub left: i32,
    pub alignment: Alignment,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Build a row from the collected row format and cell contents.
    ///
    /// The cell definitions are trimmed or padded (repeating the last) to the
    /// number of cells, every cell is made at least one twip wide and a
    /// negative left edge shifts the row to 0.
    pub fn build(format: &TableRowFormat, contents: Vec<Vec<Paragraph>>) -> Self {
        let mut defs: Vec<TableCellDef> = format.cells.iter().copied().collect();
        defs.truncate(contents.len());
        let filler = defs.last().copied().unwrap_or_default();
        defs.resize(contents.len(), filler);

        // Boundaries are raw `\trleft`/`\cellx` values, so the geometry is
        // computed in i64 and clamped back at the end
        let mut left = i64::from(format.left);
        let mut edge = left;
        let mut rights: Vec<i64> = defs
            .iter()
            .map(|def| {
                let x = i64::from(def.x);
                edge = if x - edge < 1 { edge + 1 } else { x };
                edge
            })
            .collect();
        let mut shift = left.min(0);
        let last = rights.last().copied().unwrap_or(left) - shift;
        if last > i64::from(i32::MAX) {
            // Pull an overlong row back towards 0 while the left edge allows
            shift += (last - i64::from(i32::MAX)).min(left.max(0));
        }
        left -= shift;
        for right in &mut rights {
            *right -= shift;
        }

        let cells = defs
            .into_iter()
            .zip(rights)
            .zip(contents)
            .map(|((def, right), paragraphs)| {
                TableCell::new(
                    TableCellDef {
                        x: clamp_twips(right),
                        ..def
                    },
                    paragraphs,
                )
            })
            .collect();

        Self {
            height: if format.height == 0 { 1 } else { format.height },
            left: clamp_twips(left),
            alignment: format.alignment,
            cells,
        }
    }

    /// Right edge of the row.
    #[inline]
    pub fn right(&self) -> i32 {
        self.cells.last().map_or(self.left, |cell| cell.right)
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Right boundary in twips
    pub right: i32,
    /// Background color reference
    pub background: ColorRef,
    pub borders: Borders,
    pub paragraphs: Vec<Paragraph>,
    /// First grid column covered by the cell
    pub column: usize,
    /// Number of grid columns covered by the cell
    pub span: usize,
}

impl TableCell {
    fn new(def: TableCellDef, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            right: def.x,
            background: def.background,
            borders: def.borders,
            paragraphs,
            column: 0,
            span: 1,
        }
    }

    /// Empty cell inserted to square up a row.
    fn filler(right: i32) -> Self {
        Self::new(
            TableCellDef {
                x: right,
                ..TableCellDef::default()
            },
            Vec::new(),
        )
    }

    /// Get the text content of the cell.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reconcile the rows of a table into a rectangular grid.
pub fn finish_table(number: usize, mut rows: Vec<TableRow>) -> Table {
    let left = rows.iter().map(|row| row.left).min().unwrap_or(0);
    let right = rows.iter().map(TableRow::right).max().unwrap_or(0);

    let mut columns = Vec::new();
    for row in &mut rows {
        if row.left > left {
            row.cells.insert(0, TableCell::filler(row.left));
            row.left = left;
        }
        if row.right() < right {
            row.cells.push(TableCell::filler(right));
        }
        columns.push(row.left);
        columns.extend(row.cells.iter().map(|cell| cell.right));
    }
    columns.sort_unstable();
    columns.dedup();

    for row in &mut rows {
        let mut start = row.left;
        for cell in &mut row.cells {
            let first = column_index(&columns, start);
            let last = column_index(&columns, cell.right);
            cell.column = first;
            cell.span = last.saturating_sub(first);
            start = cell.right;
        }
    }

    Table {
        number,
        rows,
        columns,
    }
}

#[inline]
fn clamp_twips(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[inline]
fn column_index(columns: &[i32], x: i32) -> usize {
    columns.binary_search(&x).unwrap_or_else(|i| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn row_format(left: i32, bounds: &[i32]) -> TableRowFormat {
        TableRowFormat {
            left,
            cells: bounds
                .iter()
                .map(|&x| TableCellDef {
                    x,
                    ..TableCellDef::default()
                })
                .collect(),
            ..TableRowFormat::default()
        }
    }

    fn empty_cells(n: usize) -> Vec<Vec<Paragraph>> {
        vec![Vec::new(); n]
    }

    #[test]
    fn test_rows_share_column_boundaries() {
        let first = TableRow::build(&row_format(0, &[100, 250]), empty_cells(2));
        let second = TableRow::build(&row_format(0, &[150, 250]), empty_cells(2));
        let table = finish_table(1, vec![first, second]);

        assert_eq!(table.columns, vec![0, 100, 150, 250]);
        assert_eq!(table.column_count(), 3);

        let spans: Vec<Vec<(usize, usize)>> = table
            .rows
            .iter()
            .map(|row| row.cells.iter().map(|c| (c.column, c.span)).collect())
            .collect();
        assert_eq!(spans, vec![vec![(0, 1), (1, 2)], vec![(0, 2), (2, 1)]]);
    }

    #[test]
    fn test_filler_cells_square_up_rows() {
        let wide = TableRow::build(&row_format(0, &[100, 300]), empty_cells(2));
        let narrow = TableRow::build(&row_format(50, &[200]), empty_cells(1));
        let table = finish_table(1, vec![wide, narrow]);

        let narrow = &table.rows[1];
        assert_eq!(narrow.left, 0);
        assert_eq!(narrow.cells.len(), 3);
        assert_eq!(narrow.cells.iter().map(|c| c.right).collect::<Vec<_>>(), vec![50, 200, 300]);
        assert_eq!(table.columns, vec![0, 50, 100, 200, 300]);
        let covered: usize = narrow.cells.iter().map(|c| c.span).sum();
        assert_eq!(covered, table.column_count());
    }

    #[test]
    fn test_definitions_match_cell_count() {
        let row = TableRow::build(&row_format(0, &[100]), empty_cells(3));
        assert_eq!(row.cells.iter().map(|c| c.right).collect::<Vec<_>>(), vec![100, 101, 102]);

        let row = TableRow::build(&row_format(0, &[100, 200, 300]), empty_cells(1));
        assert_eq!(row.cells.len(), 1);
    }

    #[test]
    fn test_minimum_sizes() {
        let row = TableRow::build(&row_format(0, &[0, 0]), empty_cells(2));
        assert_eq!(row.height, 1);
        assert_eq!(row.cells[0].right, 1);
        assert_eq!(row.cells[1].right, 2);
    }

    #[test]
    fn test_extreme_boundaries_are_clamped() {
        let row = TableRow::build(&row_format(i32::MIN, &[i32::MAX]), empty_cells(1));
        assert_eq!(row.left, 0);
        assert_eq!(row.cells[0].right, i32::MAX);

        let row = TableRow::build(&row_format(i32::MAX, &[i32::MIN, i32::MIN]), empty_cells(2));
        assert_eq!(row.left, i32::MAX - 2);
        assert_eq!(
            row.cells.iter().map(|c| c.right).collect::<Vec<_>>(),
            vec![i32::MAX - 1, i32::MAX]
        );

        let table = finish_table(1, vec![row]);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_negative_left_is_shifted() {
        let format = TableRowFormat {
            left: -100,
            height: -400,
            cells: smallvec![TableCellDef {
                x: 500,
                ..TableCellDef::default()
            }],
            ..TableRowFormat::default()
        };
        let row = TableRow::build(&format, empty_cells(1));
        assert_eq!(row.left, 0);
        assert_eq!(row.cells[0].right, 600);
        assert_eq!(row.height, -400);
    }
}
