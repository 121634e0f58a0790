mod in_memory_test;
mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryCommand, InMemoryConnection, InMemoryDriver, InMemoryParameter,
    InMemoryTestResponseBuilder, RecordedCommand, TestDbType,
};
pub use self::tokio_postgres::{PgCommand, PgConnection, PgParameter, TokioPostgresDriver};
