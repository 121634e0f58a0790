use crate::config::parameter_name;
use crate::error::{AntiSqliError, Result};
use crate::traits::{DbParameter, Driver};
use crate::type_mapper::TypeMapper;
use crate::types::{Direction, SqlValue};

/// Build one named, typed input parameter per value, in order.
///
/// The parameter for `values[i]` is named `@AntiSQLiParam<i>`. Values the
/// driver cannot type are bound as strings. If any parameter cannot be
/// constructed the whole build fails and nothing is returned.
pub fn build_parameters<D: Driver>(
    mapper: &TypeMapper<D>,
    values: &[SqlValue],
) -> Result<Vec<D::Parameter>> {
    let mut built = Vec::with_capacity(values.len());

    for value in values {
        let mut parameter = mapper.driver().create_parameter()?;
        parameter.set_name(parameter_name(built.len()));

        let (value, generic_type) = mapper.resolve_value(value.clone());
        parameter.set_value(value);
        parameter.set_generic_type(generic_type);
        parameter.set_direction(Direction::Input);

        built.push(parameter);
    }

    if built.len() != values.len() {
        return Err(AntiSqliError::ParameterConstruction(format!(
            "built {} of {} parameters",
            built.len(),
            values.len()
        )));
    }
    Ok(built)
}
