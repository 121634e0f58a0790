use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AntiSqliError, Result};
use crate::traits::{DbCommand, DbConnection, DbParameter, Driver};
use crate::types::{CommandKind, Direction, GenericType, RawQueryResult, RowReader, SqlValue};

/// Vendor type codes understood by the in-memory driver.
/// Modelled on a SQL Server style taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestDbType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallInt,
    Text,
    Time,
    TinyInt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Variant,
    Xml,
    /// Table-valued parameters; no generic equivalent.
    Structured,
    /// User-defined types; no generic equivalent.
    Udt,
}

/// An in-memory database driver for testing.
///
/// Type mapping follows [`TestDbType`]. Probing and construction can be
/// made to fail, and probe counts are observable, so the engine's fallback
/// and abort paths can be exercised without a database.
///
/// Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDriver {
    refuse_null: bool,
    construct_limit: Option<usize>,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    constructed: AtomicUsize,
    vendor_probes: AtomicUsize,
}

impl InMemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make value probing refuse `Null`, as some drivers do.
    pub fn refuse_null_probes(mut self, refuse: bool) -> Self {
        self.refuse_null = refuse;
        self
    }

    /// Let the first `n` parameter constructions succeed and fail every
    /// one after that.
    pub fn fail_construction_after(mut self, n: usize) -> Self {
        self.construct_limit = Some(n);
        self
    }

    /// Number of times a vendor type code was probed.
    pub fn vendor_probe_count(&self) -> usize {
        self.counters.vendor_probes.load(Ordering::SeqCst)
    }

    /// Number of parameter constructions attempted.
    pub fn construction_count(&self) -> usize {
        self.counters.constructed.load(Ordering::SeqCst)
    }
}

impl Driver for InMemoryDriver {
    type Command = InMemoryCommand;
    type Parameter = InMemoryParameter;
    type Connection = InMemoryConnection;
    type Reader = RowReader;
    type VendorType = TestDbType;

    fn create_command(&self) -> InMemoryCommand {
        InMemoryCommand::default()
    }

    fn create_parameter(&self) -> Result<InMemoryParameter> {
        let attempt = self.counters.constructed.fetch_add(1, Ordering::SeqCst);
        match self.construct_limit {
            Some(limit) if attempt >= limit => Err(AntiSqliError::ParameterConstruction(
                format!("parameter limit of {limit} reached"),
            )),
            _ => Ok(InMemoryParameter::default()),
        }
    }

    fn probe_vendor_type(&self, vendor_type: &TestDbType) -> Result<GenericType> {
        self.counters.vendor_probes.fetch_add(1, Ordering::SeqCst);
        let generic_type = match vendor_type {
            TestDbType::BigInt => GenericType::Int64,
            TestDbType::Binary | TestDbType::Image | TestDbType::VarBinary => GenericType::Binary,
            TestDbType::Bit => GenericType::Boolean,
            TestDbType::Char | TestDbType::Text | TestDbType::VarChar => GenericType::AnsiString,
            TestDbType::Date => GenericType::Date,
            TestDbType::DateTime | TestDbType::DateTime2 => GenericType::DateTime,
            TestDbType::Decimal | TestDbType::Money => GenericType::Decimal,
            TestDbType::Float => GenericType::Double,
            TestDbType::Int => GenericType::Int32,
            TestDbType::NChar | TestDbType::NText | TestDbType::NVarChar | TestDbType::Xml => {
                GenericType::String
            }
            TestDbType::Real => GenericType::Single,
            TestDbType::SmallInt => GenericType::Int16,
            TestDbType::Time => GenericType::Time,
            TestDbType::TinyInt => GenericType::Byte,
            TestDbType::UniqueIdentifier => GenericType::Guid,
            TestDbType::Variant => GenericType::Object,
            TestDbType::Structured | TestDbType::Udt => {
                return Err(AntiSqliError::UnmappedVendorType(format!("{vendor_type:?}")))
            }
        };
        Ok(generic_type)
    }

    fn probe_value_type(&self, value: &SqlValue) -> Result<GenericType> {
        match value {
            SqlValue::Null if self.refuse_null => {
                Err(AntiSqliError::UnmappedValue(value.type_name().to_string()))
            }
            SqlValue::Null | SqlValue::Text(_) => Ok(GenericType::String),
            SqlValue::Int16(_) => Ok(GenericType::Int16),
            SqlValue::Int32(_) => Ok(GenericType::Int32),
            SqlValue::Int64(_) => Ok(GenericType::Int64),
            SqlValue::Float32(_) => Ok(GenericType::Single),
            SqlValue::Float64(_) => Ok(GenericType::Double),
            SqlValue::Bool(_) => Ok(GenericType::Boolean),
            SqlValue::Bytes(_) => Ok(GenericType::Binary),
            SqlValue::Other(_) => Err(AntiSqliError::UnmappedValue(value.type_name().to_string())),
        }
    }
}

/// Parameter of the in-memory driver.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryParameter {
    name: String,
    value: SqlValue,
    generic_type: GenericType,
    size: Option<usize>,
    direction: Direction,
}

impl Default for InMemoryParameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: SqlValue::Null,
            generic_type: GenericType::String,
            size: None,
            direction: Direction::Input,
        }
    }
}

impl DbParameter for InMemoryParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn value(&self) -> &SqlValue {
        &self.value
    }

    fn set_value(&mut self, value: SqlValue) {
        self.value = value;
    }

    fn generic_type(&self) -> GenericType {
        self.generic_type
    }

    fn set_generic_type(&mut self, generic_type: GenericType) {
        self.generic_type = generic_type;
    }

    fn size(&self) -> Option<usize> {
        self.size
    }

    fn set_size(&mut self, size: Option<usize>) {
        self.size = size;
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

/// Command of the in-memory driver.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommand {
    text: String,
    kind: CommandKind,
    connection: Option<InMemoryConnection>,
    parameters: Vec<InMemoryParameter>,
}

impl DbCommand for InMemoryCommand {
    type Parameter = InMemoryParameter;
    type Connection = InMemoryConnection;

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn kind(&self) -> CommandKind {
        self.kind
    }

    fn set_kind(&mut self, kind: CommandKind) {
        self.kind = kind;
    }

    fn connection(&self) -> Option<&InMemoryConnection> {
        self.connection.as_ref()
    }

    fn set_connection(&mut self, connection: Option<InMemoryConnection>) {
        self.connection = connection;
    }

    fn parameters(&self) -> &[InMemoryParameter] {
        &self.parameters
    }

    fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    fn push_parameter(&mut self, parameter: InMemoryParameter) {
        self.parameters.push(parameter);
    }

    fn remove_parameter_at(&mut self, index: usize) -> Option<InMemoryParameter> {
        (index < self.parameters.len()).then(|| self.parameters.remove(index))
    }
}

/// A recorded command execution for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub text: String,
    pub kind: CommandKind,
    pub parameters: Vec<InMemoryParameter>,
}

impl RecordedCommand {
    /// Values of the recorded parameters, in order.
    pub fn values(&self) -> Vec<SqlValue> {
        self.parameters.iter().map(|p| p.value.clone()).collect()
    }
}

/// An in-memory connection for testing.
///
/// Records every command it executes and answers with configured
/// responses. Clones share the same recordings and queue.
///
/// # Example
/// ```
/// use antisqli::drivers::{InMemoryConnection, InMemoryTestResponseBuilder};
///
/// let connection = InMemoryConnection::new().with_response(
///     InMemoryTestResponseBuilder::new()
///         .columns(&["id", "name"])
///         .row(&["1", "Alice"])
///         .build(),
/// );
/// connection.assert_command_count(0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnection {
    state: Arc<ConnectionState>,
}

#[derive(Debug, Default)]
struct ConnectionState {
    responses: Mutex<VecDeque<RawQueryResult>>,
    recorded_commands: Mutex<Vec<RecordedCommand>>,
    default_response: Mutex<RawQueryResult>,
}

impl InMemoryConnection {
    /// Create a new in-memory connection with no pre-configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response to be returned by the next execution.
    /// Responses are returned in FIFO order.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        self.state.responses.lock().unwrap().push_back(response);
        self
    }

    /// Add multiple responses to be returned by subsequent executions.
    pub fn with_responses(self, responses: impl IntoIterator<Item = RawQueryResult>) -> Self {
        let mut queue = self.state.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
        drop(queue);
        self
    }

    /// Set a default response to use when no queued responses remain.
    pub fn with_default_response(self, response: RawQueryResult) -> Self {
        *self.state.default_response.lock().unwrap() = response;
        self
    }

    /// Get all recorded commands that have been executed.
    pub fn recorded_commands(&self) -> Vec<RecordedCommand> {
        self.state.recorded_commands.lock().unwrap().clone()
    }

    /// Get the last recorded command, if any.
    pub fn last_command(&self) -> Option<RecordedCommand> {
        self.state.recorded_commands.lock().unwrap().last().cloned()
    }

    /// Clear all recorded commands.
    pub fn clear_recorded_commands(&self) {
        self.state.recorded_commands.lock().unwrap().clear();
    }

    /// Assert that the last command matches the expected text and values.
    pub fn assert_last_command(&self, expected_text: &str, expected_values: &[SqlValue]) {
        let last = self.last_command().expect("No commands were recorded");
        assert_eq!(
            last.text, expected_text,
            "Command text mismatch.\nExpected: {}\nActual: {}",
            expected_text, last.text
        );
        assert_eq!(
            last.values(),
            expected_values,
            "Parameter values mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_values,
            last.values()
        );
    }

    /// Assert that exactly n commands were executed.
    pub fn assert_command_count(&self, expected: usize) {
        let actual = self.state.recorded_commands.lock().unwrap().len();
        assert_eq!(
            actual, expected,
            "Command count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

#[async_trait]
impl DbConnection for InMemoryConnection {
    type Command = InMemoryCommand;
    type Reader = RowReader;

    async fn execute_reader(&self, command: &InMemoryCommand) -> Result<RowReader> {
        // Record the command
        self.state
            .recorded_commands
            .lock()
            .unwrap()
            .push(RecordedCommand {
                text: command.text.clone(),
                kind: command.kind,
                parameters: command.parameters.clone(),
            });

        // Return next queued response or default
        let queued = self.state.responses.lock().unwrap().pop_front();
        let response =
            queued.unwrap_or_else(|| self.state.default_response.lock().unwrap().clone());

        Ok(RowReader::from_raw(response))
    }
}

/// Builder for creating test responses easily.
#[derive(Debug, Default)]
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of string values.
    pub fn row(mut self, values: &[&str]) -> Self {
        self.rows
            .push(values.iter().map(|s| Some(s.to_string())).collect());
        self
    }

    /// Add a row where `None` is a NULL column.
    pub fn row_with_nulls(mut self, values: &[Option<&str>]) -> Self {
        self.rows
            .push(values.iter().map(|v| v.map(str::to_string)).collect());
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DbReader;

    #[test]
    fn test_vendor_types_map_or_fail() {
        let driver = InMemoryDriver::new();
        assert_eq!(driver.probe_vendor_type(&TestDbType::Money).unwrap(), GenericType::Decimal);
        assert_eq!(
            driver.probe_vendor_type(&TestDbType::VarChar).unwrap(),
            GenericType::AnsiString
        );
        assert!(driver.probe_vendor_type(&TestDbType::Structured).is_err());
    }

    #[test]
    fn test_construction_limit() {
        let driver = InMemoryDriver::new().fail_construction_after(1);
        assert!(driver.create_parameter().is_ok());
        assert!(driver.create_parameter().is_err());
        assert_eq!(driver.construction_count(), 2);
    }

    #[test]
    fn test_index_of_is_case_sensitive() {
        let mut command = InMemoryCommand::default();
        let mut parameter = InMemoryParameter::default();
        parameter.set_name("@Id".to_string());
        command.push_parameter(parameter);

        assert_eq!(command.index_of("@Id"), Some(0));
        assert_eq!(command.index_of("@id"), None);
    }

    #[test]
    fn test_remove_parameter_at_out_of_range() {
        let mut command = InMemoryCommand::default();
        command.push_parameter(InMemoryParameter::default());

        assert!(command.remove_parameter_at(1).is_none());
        assert!(command.remove_parameter_at(0).is_some());
        assert!(command.parameters().is_empty());
    }

    #[tokio::test]
    async fn test_connection_records_and_replays() {
        let connection = InMemoryConnection::new()
            .with_response(
                InMemoryTestResponseBuilder::new()
                    .columns(&["id"])
                    .row(&["1"])
                    .build(),
            )
            .with_default_response(
                InMemoryTestResponseBuilder::new()
                    .columns(&["n"])
                    .row_with_nulls(&[None])
                    .build(),
            );
        let mut command = InMemoryCommand::default();
        command.set_text("SELECT 1".to_string());

        let mut first = connection.execute_reader(&command).await.unwrap();
        assert_eq!(first.next_row().unwrap().get("id").unwrap(), Some("1"));

        let mut second = connection.execute_reader(&command).await.unwrap();
        assert_eq!(second.next_row().unwrap().get("n").unwrap(), None);

        connection.assert_command_count(2);
        connection.assert_last_command("SELECT 1", &[]);
        connection.clear_recorded_commands();
        assert!(connection.last_command().is_none());
    }
}
