mod generic_type;
mod row;
mod sql_value;

pub use generic_type::{CommandKind, Direction, GenericType};
pub use row::{RawQueryResult, Row, RowReader};
pub use sql_value::{OpaqueValue, SqlValue};
