use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use crate::error::{AntiSqliError, Result};
use crate::traits::{DbCommand, DbConnection, DbParameter, Driver};
use crate::types::{CommandKind, Direction, GenericType, RawQueryResult, RowReader, SqlValue};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Vendor type codes are [`tokio_postgres::types::Type`]s; they are
/// resolved by asking tokio-postgres which Rust types it accepts for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPostgresDriver;

impl TokioPostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for TokioPostgresDriver {
    type Command = PgCommand;
    type Parameter = PgParameter;
    type Connection = PgConnection;
    type Reader = RowReader;
    type VendorType = Type;

    fn create_command(&self) -> PgCommand {
        PgCommand::default()
    }

    fn create_parameter(&self) -> Result<PgParameter> {
        Ok(PgParameter::default())
    }

    fn probe_vendor_type(&self, vendor_type: &Type) -> Result<GenericType> {
        let generic_type = if <bool as ToSql>::accepts(vendor_type) {
            GenericType::Boolean
        } else if <i8 as ToSql>::accepts(vendor_type) {
            GenericType::Byte
        } else if <i16 as ToSql>::accepts(vendor_type) {
            GenericType::Int16
        } else if <i32 as ToSql>::accepts(vendor_type) {
            GenericType::Int32
        } else if <i64 as ToSql>::accepts(vendor_type) {
            GenericType::Int64
        } else if <f32 as ToSql>::accepts(vendor_type) {
            GenericType::Single
        } else if <f64 as ToSql>::accepts(vendor_type) {
            GenericType::Double
        } else if <String as ToSql>::accepts(vendor_type) {
            GenericType::String
        } else if <Vec<u8> as ToSql>::accepts(vendor_type) {
            GenericType::Binary
        } else {
            return Err(AntiSqliError::UnmappedVendorType(vendor_type.name().to_string()));
        };
        Ok(generic_type)
    }

    fn probe_value_type(&self, value: &SqlValue) -> Result<GenericType> {
        let candidate = match value {
            SqlValue::Null | SqlValue::Text(_) => Type::TEXT,
            SqlValue::Int16(_) => Type::INT2,
            SqlValue::Int32(_) => Type::INT4,
            SqlValue::Int64(_) => Type::INT8,
            SqlValue::Float32(_) => Type::FLOAT4,
            SqlValue::Float64(_) => Type::FLOAT8,
            SqlValue::Bool(_) => Type::BOOL,
            SqlValue::Bytes(_) => Type::BYTEA,
            SqlValue::Other(_) => {
                return Err(AntiSqliError::UnmappedValue(value.type_name().to_string()))
            }
        };
        self.probe_vendor_type(&candidate)
    }
}

/// Parameter of the PostgreSQL driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PgParameter {
    name: String,
    value: SqlValue,
    generic_type: GenericType,
    size: Option<usize>,
    direction: Direction,
}

impl Default for PgParameter {
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

impl DbParameter for PgParameter {
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

/// Command of the PostgreSQL driver.
#[derive(Debug, Clone, Default)]
pub struct PgCommand {
    text: String,
    kind: CommandKind,
    connection: Option<PgConnection>,
    parameters: Vec<PgParameter>,
}

impl DbCommand for PgCommand {
    type Parameter = PgParameter;
    type Connection = PgConnection;

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

    fn connection(&self) -> Option<&PgConnection> {
        self.connection.as_ref()
    }

    fn set_connection(&mut self, connection: Option<PgConnection>) {
        self.connection = connection;
    }

    fn parameters(&self) -> &[PgParameter] {
        &self.parameters
    }

    fn clear_parameters(&mut self) {
        self.parameters.clear();
    }

    fn push_parameter(&mut self, parameter: PgParameter) {
        self.parameters.push(parameter);
    }

    fn remove_parameter_at(&mut self, index: usize) -> Option<PgParameter> {
        (index < self.parameters.len()).then(|| self.parameters.remove(index))
    }
}

/// A shared tokio-postgres client.
#[derive(Clone)]
pub struct PgConnection {
    client: Arc<Client>,
}

impl std::fmt::Debug for PgConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection").finish_non_exhaustive()
    }
}

impl PgConnection {
    /// Connect to a PostgreSQL database.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| AntiSqliError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Self::from_client(client))
    }

    /// Wrap an already connected client.
    pub fn from_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl DbConnection for PgConnection {
    type Command = PgCommand;
    type Reader = RowReader;

    async fn execute_reader(&self, command: &PgCommand) -> Result<RowReader> {
        let (sql, bound) = prepare_statement(command)?;
        debug!(parameters = bound.len(), "executing postgres command");

        let converted_params: Vec<PgBindValue<'_>> =
            bound.iter().map(|p| PgBindValue(p.value())).collect();

        let param_refs: Vec<&(dyn ToSql + Sync)> = converted_params
            .iter()
            .map(|b| b as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client
            .query(sql.as_str(), &param_refs)
            .await
            .map_err(|e| AntiSqliError::QueryFailed(e.to_string()))?;

        // Extract column names
        let columns: Vec<String> = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => Vec::new(),
        };

        let result_rows: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|row| {
                (0..row.columns().len())
                    .map(|i| row_value_to_string(row, i))
                    .collect()
            })
            .collect();

        Ok(RowReader::from_raw(RawQueryResult::new(columns, result_rows)))
    }
}

/// Turn a command into PostgreSQL SQL and the parameters to bind, in `$n`
/// order.
///
/// Plain text has its `@name` references rewritten to `$n`, numbered by
/// first reference, so only referenced parameters are bound. Names with no
/// matching parameter are left alone, as is anything inside string
/// literals, quoted identifiers and comments. Stored procedures become
/// `CALL name($1, ...)` over the whole parameter collection.
fn prepare_statement(command: &PgCommand) -> Result<(String, Vec<&PgParameter>)> {
    if let Some(p) = command
        .parameters
        .iter()
        .find(|p| !p.direction.carries_value())
    {
        return Err(AntiSqliError::QueryFailed(format!(
            "parameter {} is {:?}; postgres commands only take input parameters",
            p.name, p.direction
        )));
    }

    match command.kind {
        CommandKind::StoredProcedure => {
            let placeholders: Vec<String> = (1..=command.parameters.len())
                .map(|n| format!("${n}"))
                .collect();
            let sql = format!("CALL {}({})", command.text, placeholders.join(", "));
            Ok((sql, command.parameters.iter().collect()))
        }
        CommandKind::Text => Ok(rewrite_named_parameters(&command.text, &command.parameters)),
    }
}

fn rewrite_named_parameters<'a>(
    text: &str,
    parameters: &'a [PgParameter],
) -> (String, Vec<&'a PgParameter>) {
    let by_name: HashMap<&str, &PgParameter> =
        parameters.iter().map(|p| (p.name.as_str(), p)).collect();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut bound: Vec<&PgParameter> = Vec::new();

    let mut sql = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(len) = verbatim_len(rest) {
            sql.push_str(&rest[..len]);
            rest = &rest[len..];
            continue;
        }
        if c == '@' {
            let end = rest[1..]
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .map_or(rest.len(), |i| i + 1);
            let name = &rest[..end];
            if let Some(&parameter) = by_name.get(name) {
                let position = *positions.entry(parameter.name.as_str()).or_insert_with(|| {
                    bound.push(parameter);
                    bound.len()
                });
                sql.push('$');
                sql.push_str(&position.to_string());
                rest = &rest[end..];
                continue;
            }
        }
        sql.push(c);
        rest = &rest[c.len_utf8()..];
    }

    (sql, bound)
}

/// Length of the string literal, quoted identifier or comment that `rest`
/// starts with. An unterminated one runs to the end of the text.
fn verbatim_len(rest: &str) -> Option<usize> {
    let (open, close) = if rest.starts_with('\'') {
        ("'", "'")
    } else if rest.starts_with('"') {
        ("\"", "\"")
    } else if rest.starts_with("--") {
        ("--", "\n")
    } else if rest.starts_with("/*") {
        ("/*", "*/")
    } else {
        return None;
    };
    let body = &rest[open.len()..];
    Some(
        body.find(close)
            .map_or(rest.len(), |i| open.len() + i + close.len()),
    )
}

/// Binds a [`SqlValue`] against whatever type the server inferred for its
/// placeholder. Integers and floats are converted to the target width
/// (failing if the value does not fit) and `Null` binds to any type.
#[derive(Debug)]
struct PgBindValue<'a>(&'a SqlValue);

impl PgBindValue<'_> {
    fn accepts_value(&self, ty: &Type) -> bool {
        match self.0 {
            SqlValue::Null => true,
            SqlValue::Int16(_) | SqlValue::Int32(_) | SqlValue::Int64(_) => {
                matches!(*ty, Type::INT2 | Type::INT4 | Type::INT8)
            }
            SqlValue::Float32(_) => <f32 as ToSql>::accepts(ty) || <f64 as ToSql>::accepts(ty),
            SqlValue::Float64(_) => <f64 as ToSql>::accepts(ty),
            SqlValue::Bool(_) => <bool as ToSql>::accepts(ty),
            SqlValue::Bytes(_) => <Vec<u8> as ToSql>::accepts(ty),
            SqlValue::Text(_) | SqlValue::Other(_) => <String as ToSql>::accepts(ty),
        }
    }
}

impl ToSql for PgBindValue<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self.0 {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Int16(i) => int_to_sql(i64::from(*i), ty, out),
            SqlValue::Int32(i) => int_to_sql(i64::from(*i), ty, out),
            SqlValue::Int64(i) => int_to_sql(*i, ty, out),
            SqlValue::Float32(f) if *ty == Type::FLOAT8 => f64::from(*f).to_sql(ty, out),
            SqlValue::Float32(f) => f.to_sql(ty, out),
            SqlValue::Float64(f) => f.to_sql(ty, out),
            SqlValue::Bool(b) => b.to_sql(ty, out),
            SqlValue::Bytes(b) => b.to_sql(ty, out),
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Other(v) => v.to_string().to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        if !self.accepts_value(ty) {
            return Err(Box::new(WrongType::new::<Self>(ty.clone())));
        }
        self.to_sql(ty, out)
    }
}

fn int_to_sql(
    value: i64,
    ty: &Type,
    out: &mut BytesMut,
) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

/// Convert a row value at a given index to a string. `None` is NULL.
fn row_value_to_string(row: &tokio_postgres::Row, index: usize) -> Option<String> {
    // Try common types and convert to string

    if let Ok(val) = row.try_get::<_, Option<i32>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<i64>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<i16>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<String>>(index) {
        return val;
    }

    if let Ok(val) = row.try_get::<_, Option<bool>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<f64>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<f32>>(index) {
        return val.map(|v| v.to_string());
    }

    if let Ok(val) = row.try_get::<_, Option<Vec<u8>>>(index) {
        return val.map(|v| format!("{:?}", v));
    }

    // Fallback
    Some("UNKNOWN".to_string())
}
