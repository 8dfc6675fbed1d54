use std::fmt::{self, Display, Formatter};

/// Tables swept by the cleanup job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTable {
    Users,
    Customers,
    Invoices,
    Revenue,
}

impl CleanupTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupTable::Users => "users",
            CleanupTable::Customers => "customers",
            CleanupTable::Invoices => "invoices",
            CleanupTable::Revenue => "revenue",
        }
    }
}

impl Display for CleanupTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table together with the columns whose values make two rows duplicates.
///
/// Within each duplicate group the row with the lowest `ctid` is kept. `ctid` is
/// the physical location of the row: deterministic and stable for the lifetime of
/// the transaction, but not insertion order once a row has been updated or the
/// table has been rewritten.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateRule {
    pub table: CleanupTable,
    pub key_columns: &'static [&'static str],
}

/// Executed in this order inside a single transaction.
pub const DUPLICATE_RULES: [DuplicateRule; 4] = [
    DuplicateRule {
        table: CleanupTable::Users,
        key_columns: &["email"],
    },
    DuplicateRule {
        table: CleanupTable::Customers,
        key_columns: &["email"],
    },
    DuplicateRule {
        table: CleanupTable::Invoices,
        key_columns: &["customer_id", "amount", "status", "date"],
    },
    DuplicateRule {
        table: CleanupTable::Revenue,
        key_columns: &["month"],
    },
];

impl DuplicateRule {
    /// Deletes every row that is not the keeper of its group. NULL keys group together.
    ///
    /// `MIN(tid)` needs PostgreSQL 14 or later.
    pub fn delete_statement(&self) -> String {
        format!(
            r#"
            DELETE FROM {table}
            WHERE ctid NOT IN (
                SELECT MIN(ctid)
                FROM {table}
                GROUP BY {keys}
            )
            "#,
            table = self.table,
            keys = self.key_columns.join(", "),
        )
    }
}
