use crate::types::Row;

/// Forward-only access to the rows produced by a command.
pub trait DbReader: Send {
    /// Column names in order.
    fn columns(&self) -> &[String];

    /// The next row, or `None` once the result is exhausted.
    fn next_row(&mut self) -> Option<Row>;
}
