use crate::config::ParameterizeConfig;
use crate::drivers::{InMemoryDriver, TokioPostgresDriver};
use crate::error::{AntiSqliError, Result};
use crate::parameterize::parameterize_and_load;
use crate::traits::{DbCommand, DbConnection, DbParameter, Driver};
use crate::type_mapper::TypeMapper;
use crate::types::{CommandKind, Direction, SqlValue};

/// Owns one driver command and exposes safe ways to load it.
///
/// The usual entry point is [`load_query_text`](Self::load_query_text),
/// which parameterizes a `{0}`-style template. Lower-level callers can
/// manage parameters directly or set up a stored procedure call.
///
/// Not safe to share between threads while loading; each caller should use
/// its own wrapper.
///
/// # Example
/// ```
/// use antisqli::{params, InMemoryCommandWrapper};
/// use antisqli::traits::DbCommand;
///
/// let mut query = InMemoryCommandWrapper::default();
/// assert!(query.load_query_text("SELECT * FROM users WHERE name = {0}", &params!["bob"]));
/// assert_eq!(
///     query.command().text(),
///     "SELECT * FROM users WHERE name = @AntiSQLiParam0"
/// );
/// ```
pub struct DbCommandWrapper<D: Driver> {
    mapper: TypeMapper<D>,
    config: ParameterizeConfig,
    command: D::Command,
}

/// Wrapper over the in-memory test driver.
pub type InMemoryCommandWrapper = DbCommandWrapper<InMemoryDriver>;

/// Wrapper over the tokio-postgres driver.
pub type PgCommandWrapper = DbCommandWrapper<TokioPostgresDriver>;

impl<D: Driver> DbCommandWrapper<D> {
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, ParameterizeConfig::default())
    }

    pub fn with_config(driver: D, config: ParameterizeConfig) -> Self {
        let command = driver.create_command();
        Self {
            mapper: TypeMapper::with_memoization(driver, config.memoizes_vendor_types()),
            config,
            command,
        }
    }

    pub fn config(&self) -> &ParameterizeConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        self.mapper.driver()
    }

    /// The wrapped command.
    pub fn command(&self) -> &D::Command {
        &self.command
    }

    pub fn into_command(self) -> D::Command {
        self.command
    }

    pub fn connection(&self) -> Option<&D::Connection> {
        self.command.connection()
    }

    /// Attach (or with `None`, detach) the connection commands run on.
    pub fn set_connection(&mut self, connection: Option<D::Connection>) {
        self.command.set_connection(connection);
    }

    /// Add an explicitly typed parameter.
    ///
    /// The value is only stored for input and input-output parameters.
    /// Returns `None`, and adds nothing, if the vendor type has no generic
    /// mapping or the driver cannot build the parameter.
    pub fn add_parameter(
        &mut self,
        name: &str,
        vendor_type: &D::VendorType,
        size: usize,
        value: impl Into<SqlValue>,
        direction: Direction,
    ) -> Option<&D::Parameter> {
        self.try_add_parameter(name, vendor_type, size, value, direction)
            .ok()
    }

    /// Like [`add_parameter`](Self::add_parameter), reporting why the
    /// parameter could not be added.
    pub fn try_add_parameter(
        &mut self,
        name: &str,
        vendor_type: &D::VendorType,
        size: usize,
        value: impl Into<SqlValue>,
        direction: Direction,
    ) -> Result<&D::Parameter> {
        let generic_type = self.mapper.try_map_vendor_type(vendor_type)?;

        let mut parameter = self.mapper.driver().create_parameter()?;
        parameter.set_name(name.to_string());
        parameter.set_generic_type(generic_type);
        parameter.set_size(Some(size));
        parameter.set_direction(direction);
        if direction.carries_value() {
            parameter.set_value(value.into());
        }

        self.command.push_parameter(parameter);
        self.command
            .parameters()
            .last()
            .ok_or_else(|| AntiSqliError::ParameterConstruction(name.to_string()))
    }

    /// Remove the named parameter and return it, if it exists.
    pub fn remove_parameter(&mut self, name: &str) -> Option<D::Parameter> {
        if !self.contains_parameter(name) {
            return None;
        }
        let index = self.command.index_of(name)?;
        self.command.remove_parameter_at(index)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&D::Parameter> {
        if !self.contains_parameter(name) {
            return None;
        }
        let index = self.command.index_of(name)?;
        self.command.parameters().get(index)
    }

    pub fn get_parameter_at(&self, index: usize) -> Option<&D::Parameter> {
        self.command.parameters().get(index)
    }

    /// Whether a parameter with this name exists. Always false for an
    /// empty name.
    pub fn contains_parameter(&self, name: &str) -> bool {
        !name.is_empty() && self.command.index_of(name).is_some()
    }

    /// Parameterize `query_text` with `values` and load it into the
    /// command. Returns `false` and leaves the command untouched on any
    /// failure; use [`try_load_query_text`](Self::try_load_query_text) for
    /// the reason.
    pub fn load_query_text(&mut self, query_text: &str, values: &[SqlValue]) -> bool {
        self.try_load_query_text(query_text, values).is_ok()
    }

    pub fn try_load_query_text(&mut self, query_text: &str, values: &[SqlValue]) -> Result<()> {
        parameterize_and_load(
            &self.mapper,
            query_text,
            &mut self.command,
            values,
            &self.config,
        )
    }

    /// Load static query text that takes no parameters at all.
    ///
    /// Nothing is substituted and existing parameters are kept. Use this
    /// only for fixed text; anything built from input belongs in
    /// [`load_query_text`](Self::load_query_text).
    pub fn load_query_text_no_parameters(&mut self, query_text: &str) -> bool {
        if query_text.is_empty() {
            return false;
        }
        self.command.set_text(query_text.to_string());
        self.command.set_kind(CommandKind::Text);
        true
    }

    /// Make the command call the named stored procedure. Empty names are
    /// ignored and return `false`.
    pub fn set_stored_procedure(&mut self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.command.set_text(name.to_string());
        self.command.set_kind(CommandKind::StoredProcedure);
        true
    }

    /// The stored procedure the command calls, if it is set up as one.
    pub fn stored_procedure(&self) -> Option<&str> {
        match self.command.kind() {
            CommandKind::StoredProcedure => Some(self.command.text()),
            CommandKind::Text => None,
        }
    }

    /// Run the command on its connection.
    pub async fn execute_reader(&self) -> Result<D::Reader> {
        let connection: &D::Connection = self
            .command
            .connection()
            .ok_or(AntiSqliError::NoConnection)?;
        connection.execute_reader(&self.command).await
    }
}

impl<D: Driver + Default> Default for DbCommandWrapper<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}
