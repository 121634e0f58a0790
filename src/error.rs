use thiserror::Error;

use crate::template::TemplateError;

/// Broad classification of an [`AntiSqliError`].
///
/// Lets callers tell caller misuse apart from driver limitations and
/// template/value mismatches without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Empty query text, no values supplied, no connection set.
    Precondition,
    /// A value or vendor type code has no generic mapping.
    TypeResolution,
    /// A parameter could not be built.
    Construction,
    /// Placeholder arity or syntax did not match the values.
    Substitution,
    /// The connection or reader reported a failure.
    Execution,
}

/// Error type for antisqli operations
#[derive(Debug, Error)]
pub enum AntiSqliError {
    #[error("No query specified")]
    EmptyQuery,

    #[error("No parameters were provided, it may not be safe to proceed")]
    NoParametersSupplied,

    #[error("Unable to parse parameters: {0}")]
    ParameterParse(#[source] Box<AntiSqliError>),

    #[error("There were no parameters parsed, it may not be safe to proceed")]
    NoParametersParsed,

    #[error("Unable to parameterize the query text: {0}")]
    QueryTextParameterize(#[from] TemplateError),

    #[error("No generic type mapping for vendor type {0}")]
    UnmappedVendorType(String),

    #[error("No generic type mapping for value of type {0}")]
    UnmappedValue(String),

    #[error("Parameter construction failed: {0}")]
    ParameterConstruction(String),

    #[error("No connection is attached to the command")]
    NoConnection,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Expected {expected} row(s), got {actual}")]
    UnexpectedRowCount { expected: usize, actual: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

impl AntiSqliError {
    /// Classifies this error.
    ///
    /// `ParameterParse` reports the class of the failure that aborted the
    /// build, so a construction failure stays a construction failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            AntiSqliError::EmptyQuery
            | AntiSqliError::NoParametersSupplied
            | AntiSqliError::NoParametersParsed
            | AntiSqliError::NoConnection => ErrorClass::Precondition,
            AntiSqliError::ParameterParse(inner) => inner.class(),
            AntiSqliError::UnmappedVendorType(_) | AntiSqliError::UnmappedValue(_) => {
                ErrorClass::TypeResolution
            }
            AntiSqliError::ParameterConstruction(_) => ErrorClass::Construction,
            AntiSqliError::QueryTextParameterize(_) => ErrorClass::Substitution,
            AntiSqliError::ConnectionFailed(_)
            | AntiSqliError::QueryFailed(_)
            | AntiSqliError::UnexpectedRowCount { .. }
            | AntiSqliError::ColumnNotFound(_) => ErrorClass::Execution,
        }
    }
}

/// Result type alias for antisqli operations
pub type Result<T> = std::result::Result<T, AntiSqliError>;
