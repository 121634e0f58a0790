use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{DbCommand, DbReader};

/// A live connection that can run prepared commands.
///
/// The parameterization engine never executes anything itself; it hands a
/// fully prepared command to an implementation of this trait.
#[async_trait]
pub trait DbConnection: Send + Sync {
    type Command: DbCommand;
    type Reader: DbReader;

    /// Execute the command and return a reader over its results.
    async fn execute_reader(&self, command: &Self::Command) -> Result<Self::Reader>;
}
