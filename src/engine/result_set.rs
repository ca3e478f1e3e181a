use super::ResultSet;

/// A fully materialized query result.
///
/// Rows are copied out of the engine when the query runs; `close` drops them.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    position: i64,
    closed: bool,
}

impl BufferedResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self {
            columns,
            rows,
            position: -1,
            closed: false,
        }
    }

    fn current_row(&self) -> Option<&[Option<String>]> {
        if self.position < 0 {
            return None;
        }
        self.rows.get(self.position as usize).map(Vec::as_slice)
    }
}

impl ResultSet for BufferedResultSet {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn move_to_position(&mut self, position: i64) -> bool {
        if self.closed {
            return false;
        }
        let count = self.rows.len() as i64;
        if position >= count {
            self.position = count;
            return false;
        }
        if position < 0 {
            self.position = -1;
            return false;
        }
        self.position = position;
        true
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn text(&self, column: usize) -> Option<&str> {
        self.current_row()?.get(column)?.as_deref()
    }

    fn close(&mut self) {
        self.closed = true;
        self.rows = Vec::new();
        self.position = -1;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_rows() -> BufferedResultSet {
        BufferedResultSet::new(
            vec!["_id".to_string(), "name".to_string()],
            vec![
                vec![Some("1".to_string()), Some("ada".to_string())],
                vec![Some("2".to_string()), None],
                vec![Some("3".to_string()), Some("grace".to_string())],
            ],
        )
    }

    #[test]
    fn starts_before_first() {
        let rs = three_rows();

        assert_eq!(rs.position(), -1);
        assert!(rs.is_before_first());
        assert!(!rs.is_first());
        assert_eq!(rs.text(0), None);
    }

    #[test]
    fn walking_past_the_end_clamps_to_count() {
        let mut rs = three_rows();

        assert!(rs.move_to_last());
        assert!(rs.is_last());
        assert!(!rs.move_to_next());
        assert_eq!(rs.position(), 3);
        assert!(rs.is_after_last());
        assert!(rs.move_to_previous());
        assert_eq!(rs.text(1), Some("grace"));
    }

    #[test]
    fn walking_before_the_start_clamps_to_minus_one() {
        let mut rs = three_rows();

        assert!(rs.move_to_first());
        assert!(!rs.move_to_previous());
        assert_eq!(rs.position(), -1);
        assert!(rs.is_before_first());
    }

    #[test]
    fn null_cells_read_as_none() {
        let mut rs = three_rows();

        assert!(rs.move_to_position(1));
        assert_eq!(rs.text(0), Some("2"));
        assert_eq!(rs.text(1), None);
        assert_eq!(rs.column_index("name"), Some(1));
    }

    #[test]
    fn empty_set_is_both_before_first_and_after_last() {
        let mut rs = BufferedResultSet::new(vec!["_id".to_string()], Vec::new());

        assert!(rs.is_before_first());
        assert!(rs.is_after_last());
        assert!(!rs.move_to_first());
        assert!(!rs.move_to_last());
        assert!(!rs.is_first());
        assert!(!rs.is_last());
    }

    #[test]
    fn close_releases_rows_and_blocks_movement() {
        let mut rs = three_rows();

        rs.close();

        assert!(rs.is_closed());
        assert_eq!(rs.count(), 0);
        assert!(!rs.move_to_first());
    }
}
