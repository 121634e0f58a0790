use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;
use crate::traits::{DbCommand, DbConnection, DbParameter, DbReader};
use crate::types::{GenericType, SqlValue};

/// A database driver adapter.
///
/// Ties together the four roles a backend provides (command, parameter,
/// connection, reader) and exposes the driver's own type-mapping logic.
/// The engine is written once against this trait and instantiated per
/// driver.
pub trait Driver {
    type Command: DbCommand<Parameter = Self::Parameter, Connection = Self::Connection>;
    type Parameter: DbParameter;
    type Connection: DbConnection<Command = Self::Command, Reader = Self::Reader> + Clone;
    type Reader: DbReader;
    /// The driver's native type codes.
    type VendorType: Debug + Clone + Eq + Hash;

    /// Create an empty command with no connection.
    fn create_command(&self) -> Self::Command;

    /// Create a blank parameter. May fail if the driver cannot build one.
    fn create_parameter(&self) -> Result<Self::Parameter>;

    /// Resolve a vendor type code through the driver's own conversion path.
    fn probe_vendor_type(&self, vendor_type: &Self::VendorType) -> Result<GenericType>;

    /// Ask the driver which generic type it would bind `value` as.
    fn probe_value_type(&self, value: &SqlValue) -> Result<GenericType>;
}
