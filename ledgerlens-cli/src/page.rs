//! Account page state: what the renderers read, updated after each fetch.

use ledgerlens_core::statement::DEFAULT_CURRENCY;
use ledgerlens_core::{Account, BankStatement, Transaction, format_amount, format_balance};
use ledgerlens_ingest::{FetchError, StatementSource};
use tracing::error;

/// Shown instead of the statement when a fetch fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load bank statement. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct AccountPage {
    pub statement: Option<BankStatement>,
    pub account: Option<Account>,
    pub transactions: Vec<Transaction>,
    pub currency: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AccountPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch once and apply the outcome. Fetch errors end up in `error`, never returned.
    pub async fn load<S: StatementSource>(&mut self, source: &S) {
        self.begin_load();
        let res = source.fetch().await;
        self.finish_load(res);
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, res: Result<BankStatement, FetchError>) {
        match res {
            Ok(statement) => {
                self.account = Some(statement.account.clone());
                self.transactions = statement.transactions.clone();
                self.currency = statement.currency_or_default().to_string();
                self.statement = Some(statement);
            }
            Err(err) => {
                error!("Error loading bank statement: {err}");
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.is_loading = false;
    }

    pub fn formatted_balance(&self) -> String {
        format_balance(self.account.as_ref().and_then(|a| a.balance))
    }

    /// Formatted incoming and outgoing totals of the loaded statement
    pub fn formatted_totals(&self) -> Option<(String, String)> {
        let statement = self.statement.as_ref()?;
        Some((
            format_amount(Some(statement.total_in()), true),
            format_amount(Some(statement.total_out()), false),
        ))
    }

    pub fn currency(&self) -> &str {
        if self.currency.is_empty() {
            DEFAULT_CURRENCY
        } else {
            &self.currency
        }
    }
}
