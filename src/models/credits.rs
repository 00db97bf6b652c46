use serde::Serialize;

/// Current balance plus the ledger history, newest first.
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub credits: i32,
    pub transactions: Vec<entity::credit_transactions::Model>,
}
