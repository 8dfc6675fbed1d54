mod cleanup;

pub use cleanup::*;
use sqlx::{Postgres, Transaction};

pub type PgTransaction = Transaction<'static, Postgres>;
