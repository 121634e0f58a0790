mod command;
mod connection;
mod driver;
mod parameter;
mod reader;

pub use command::DbCommand;
pub use connection::DbConnection;
pub use driver::Driver;
pub use parameter::DbParameter;
pub use reader::DbReader;
