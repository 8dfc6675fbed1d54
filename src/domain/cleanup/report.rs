use serde::Serialize;

use crate::domain::CleanupTable;

/// Rows deleted per table by one cleanup run.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub users_deleted: u64,
    pub customers_deleted: u64,
    pub invoices_deleted: u64,
    pub revenue_deleted: u64,
}

impl CleanupReport {
    pub fn record(&mut self, table: CleanupTable, deleted: u64) {
        match table {
            CleanupTable::Users => self.users_deleted = deleted,
            CleanupTable::Customers => self.customers_deleted = deleted,
            CleanupTable::Invoices => self.invoices_deleted = deleted,
            CleanupTable::Revenue => self.revenue_deleted = deleted,
        }
    }

    pub fn total(&self) -> u64 {
        self.users_deleted + self.customers_deleted + self.invoices_deleted + self.revenue_deleted
    }
}

#[derive(Serialize)]
pub struct CleanupResponse {
    pub message: &'static str,
    pub results: CleanupReport,
}

impl From<CleanupReport> for CleanupResponse {
    fn from(results: CleanupReport) -> Self {
        Self {
            message: "Duplicates removed successfully",
            results,
        }
    }
}
