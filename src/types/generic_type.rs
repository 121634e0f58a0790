use std::fmt;

/// Driver-agnostic classification of a parameter's storage type.
///
/// Every vendor type code a driver knows about resolves to exactly one of
/// these, or resolution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericType {
    String,
    AnsiString,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Binary,
    Date,
    Time,
    DateTime,
    Guid,
    Object,
}

impl GenericType {
    /// Whether the type holds numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            GenericType::Byte
                | GenericType::Int16
                | GenericType::Int32
                | GenericType::Int64
                | GenericType::Single
                | GenericType::Double
                | GenericType::Decimal
        )
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Which way a parameter's value flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl Direction {
    /// Only input and input-output parameters are seeded with a value by
    /// the caller. The others are produced by execution.
    pub fn carries_value(self) -> bool {
        matches!(self, Direction::Input | Direction::InputOutput)
    }
}

/// How a command's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandKind {
    #[default]
    Text,
    StoredProcedure,
}
