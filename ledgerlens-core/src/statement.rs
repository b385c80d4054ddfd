//! Bank statement payload as served by `GET /api/getbalance`

use serde::{Deserialize, Deserializer, Serialize};

use crate::present;

/// Currency shown when the backend leaves `currency` empty
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Missing keys and explicit `null` both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Account summary at the top of a statement
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub iban: String,
    /// Current balance, any sign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
}

/// A single statement line.
///
/// Exactly one of `from` (incoming) or `to` (outgoing) is expected. Payloads with neither are
/// accepted and treated as a debit with an unknown counterparty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Non-negative by convention; the direction comes from `from`/`to`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Transaction {
    /// Incoming funds
    pub fn is_credit(&self) -> bool {
        present::is_credit(Some(self))
    }

    /// Name of the other party, or "Unknown"
    pub fn counterparty(&self) -> String {
        present::counterparty(Some(self))
    }
}

/// Account, currency and transaction history in display order (never re-sorted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankStatement {
    pub account: Account,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    pub transactions: Vec<Transaction>,
}

impl BankStatement {
    pub fn currency_or_default(&self) -> &str {
        if self.currency.trim().is_empty() {
            DEFAULT_CURRENCY
        } else {
            &self.currency
        }
    }

    pub fn credits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_credit())
    }

    pub fn debits(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| !t.is_credit())
    }

    /// Sum of incoming amounts, missing amounts count as zero
    pub fn total_in(&self) -> f64 {
        self.credits().filter_map(|t| t.amount).sum()
    }

    /// Sum of outgoing amounts, missing amounts count as zero
    pub fn total_out(&self) -> f64 {
        self.debits().filter_map(|t| t.amount).sum()
    }
}
