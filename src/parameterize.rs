use tracing::debug;

use crate::builders::build_parameters;
use crate::config::ParameterizeConfig;
use crate::error::{AntiSqliError, Result};
use crate::template::parameterize_query_text;
use crate::traits::{DbCommand, Driver};
use crate::type_mapper::TypeMapper;
use crate::types::{CommandKind, SqlValue};

/// Parameterize `query_text` with `values` and load the result into
/// `command`.
///
/// Each `{i}` in the query text is replaced with the generated name of the
/// parameter bound to `values[i]`; no value is ever spliced into the text.
/// An empty value list is refused: this path never runs dynamic text
/// without parameters.
///
/// On success the command's text and kind are overwritten and its
/// parameters replaced. On failure the command is left untouched.
///
/// # Example
/// ```
/// use antisqli::drivers::InMemoryDriver;
/// use antisqli::traits::{DbCommand, DbParameter, Driver};
/// use antisqli::{params, parameterize_and_load, ParameterizeConfig, TypeMapper};
///
/// let mapper = TypeMapper::new(InMemoryDriver::new());
/// let mut command = mapper.driver().create_command();
///
/// parameterize_and_load(
///     &mapper,
///     "SELECT * FROM T WHERE id={0}",
///     &mut command,
///     &params![7],
///     &ParameterizeConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(command.text(), "SELECT * FROM T WHERE id=@AntiSQLiParam0");
/// assert_eq!(command.parameters()[0].name(), "@AntiSQLiParam0");
/// ```
pub fn parameterize_and_load<D: Driver>(
    mapper: &TypeMapper<D>,
    query_text: &str,
    command: &mut D::Command,
    values: &[SqlValue],
    config: &ParameterizeConfig,
) -> Result<()> {
    if query_text.is_empty() {
        return Err(AntiSqliError::EmptyQuery);
    }
    if values.is_empty() {
        return Err(AntiSqliError::NoParametersSupplied);
    }

    let parameters = build_parameters(mapper, values)
        .map_err(|e| AntiSqliError::ParameterParse(Box::new(e)))?;
    if parameters.is_empty() {
        return Err(AntiSqliError::NoParametersParsed);
    }

    let processed = parameterize_query_text(query_text, &parameters, config)?;

    debug!(parameters = parameters.len(), "loading parameterized query");
    command.clear_parameters();
    command.set_text(processed);
    command.set_kind(CommandKind::Text);
    for parameter in parameters {
        command.push_parameter(parameter);
    }
    Ok(())
}
