use crate::model::TableBlock;
use crate::node::TableNode;

/// Turn a table node into a fixed-width grid.
///
/// The first row decides the column count. Shorter rows are padded with
/// empty cells, longer rows lose their extra cells. Tables without rows
/// produce nothing.
pub fn extract(table: &TableNode) -> Option<TableBlock> {
    let first = table.rows.first()?;
    let col_count = first.cells.len();

    let mut cells = Vec::with_capacity(table.rows.len());
    let mut header_rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let grid_row: Vec<String> = (0..col_count)
            .map(|j| row.cells.get(j).map(|c| c.trim().to_string()).unwrap_or_default())
            .collect();
        cells.push(grid_row);
        header_rows.push(row.is_header_row);
    }

    Some(TableBlock {
        row_count: table.rows.len(),
        col_count,
        cells,
        header_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TableRowNode;

    #[test]
    fn empty_table_is_skipped() {
        assert!(extract(&TableNode { rows: vec![] }).is_none());
    }

    #[test]
    fn header_plus_two_rows() {
        let t = TableNode {
            rows: vec![
                TableRowNode::header(["Id", "Name", "Owner"]),
                TableRowNode::data(["1", "Login", "QA"]),
                TableRowNode::data(["2", "Logout", "Dev"]),
            ],
        };
        let block = extract(&t).unwrap();
        assert_eq!(block.row_count, 3);
        assert_eq!(block.col_count, 3);
        assert_eq!(block.header_rows, vec![true, false, false]);
        assert!(block.has_header_row());
        assert_eq!(block.cell(2, 1), Some("Logout"));
    }

    #[test]
    fn ragged_rows_are_padded_and_clipped() {
        let t = TableNode {
            rows: vec![
                TableRowNode::data(["a", "b", "c"]),
                TableRowNode::data(["d", "e"]),
                TableRowNode::data(["f", "g", "h", "i"]),
            ],
        };
        let block = extract(&t).unwrap();
        assert_eq!(block.col_count, 3);
        assert_eq!(block.cells[1], vec!["d", "e", ""]);
        assert_eq!(block.cells[2], vec!["f", "g", "h"]);
        assert!(block.cells.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn cells_are_trimmed() {
        let t = TableNode {
            rows: vec![TableRowNode::data(["  padded \n", "\tx"])],
        };
        let block = extract(&t).unwrap();
        assert_eq!(block.cells[0], vec!["padded", "x"]);
    }

    #[test]
    fn zero_width_first_row_gives_empty_grid() {
        let t = TableNode {
            rows: vec![TableRowNode::data(Vec::<String>::new()), TableRowNode::data(["x"])],
        };
        let block = extract(&t).unwrap();
        assert_eq!(block.row_count, 2);
        assert_eq!(block.col_count, 0);
        assert!(block.cells.iter().all(Vec::is_empty));
    }
}
