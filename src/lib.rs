//! antisqli - driver-agnostic, injection-safe query parameterization
//!
//! Query text is written as a positional template (`{0}`, `{1}`, ...) and
//! every value is bound as a typed parameter named `@AntiSQLiParam<i>`.
//! Values never reach the query text.
//!
//! # Example
//! ```
//! use antisqli::{params, InMemoryCommandWrapper};
//! use antisqli::traits::{DbCommand, DbParameter};
//!
//! let mut query = InMemoryCommandWrapper::default();
//! let name = "alice'; DROP TABLE users; --";
//!
//! assert!(query.load_query_text(
//!     "SELECT * FROM users WHERE id={0} AND name={1}",
//!     &params![7, name],
//! ));
//!
//! let command = query.command();
//! assert_eq!(
//!     command.text(),
//!     "SELECT * FROM users WHERE id=@AntiSQLiParam0 AND name=@AntiSQLiParam1"
//! );
//! assert_eq!(command.parameters()[1].name(), "@AntiSQLiParam1");
//! ```
//!
//! Running the command is left to a [`traits::DbConnection`]:
//! ```ignore
//! let connection = PgConnection::connect("postgres://localhost/mydb").await?;
//! let mut query = PgCommandWrapper::default();
//! query.set_connection(Some(connection));
//! query.try_load_query_text("SELECT name FROM users WHERE id = {0}", &params![42])?;
//! let row = query.execute_reader().await?.single_row()?;
//! ```

pub mod builders;
pub mod config;
pub mod drivers;
pub mod error;
pub mod template;
pub mod traits;
pub mod types;

mod parameterize;
mod type_mapper;
mod wrapper;

// Re-export main types for convenient access
pub use config::{ParameterizeConfig, PARAMETER_NAME_PREFIX};
pub use drivers::{InMemoryDriver, TokioPostgresDriver};
pub use error::{AntiSqliError, ErrorClass, Result};
pub use parameterize::parameterize_and_load;
pub use template::TemplateError;
pub use traits::{DbCommand, DbConnection, DbParameter, DbReader, Driver};
pub use type_mapper::TypeMapper;
pub use types::{CommandKind, Direction, GenericType, OpaqueValue, Row, RowReader, SqlValue};
pub use wrapper::{DbCommandWrapper, InMemoryCommandWrapper, PgCommandWrapper};
