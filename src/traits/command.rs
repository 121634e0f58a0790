use crate::traits::DbParameter;
use crate::types::CommandKind;

/// A vendor command object: text, kind, connection and an ordered
/// parameter collection.
pub trait DbCommand: Send + Sync {
    type Parameter: DbParameter;
    type Connection: Clone + Send + Sync;

    fn text(&self) -> &str;
    fn set_text(&mut self, text: String);

    fn kind(&self) -> CommandKind;
    fn set_kind(&mut self, kind: CommandKind);

    fn connection(&self) -> Option<&Self::Connection>;
    fn set_connection(&mut self, connection: Option<Self::Connection>);

    /// Parameters in the order they were added.
    fn parameters(&self) -> &[Self::Parameter];
    fn clear_parameters(&mut self);
    fn push_parameter(&mut self, parameter: Self::Parameter);
    /// Remove and return the parameter at `index`; `None` if out of range.
    fn remove_parameter_at(&mut self, index: usize) -> Option<Self::Parameter>;

    /// Position of the parameter with the given name.
    /// Matching is case-sensitive unless a driver says otherwise.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters().iter().position(|p| p.name() == name)
    }
}
