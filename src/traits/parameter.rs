use std::fmt::Debug;

use crate::types::{Direction, GenericType, SqlValue};

/// A single bound parameter of a vendor command.
///
/// Drivers supply their own parameter type; the engine only reads and
/// writes it through this trait.
pub trait DbParameter: Debug + Clone + Send + Sync {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);

    fn value(&self) -> &SqlValue;
    fn set_value(&mut self, value: SqlValue);

    fn generic_type(&self) -> GenericType;
    fn set_generic_type(&mut self, generic_type: GenericType);

    /// Maximum size of the value, where the driver cares about one.
    fn size(&self) -> Option<usize>;
    fn set_size(&mut self, size: Option<usize>);

    fn direction(&self) -> Direction;
    fn set_direction(&mut self, direction: Direction);
}
