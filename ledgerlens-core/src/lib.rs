//! ledgerlens-core: bank statement types and the transaction presenter

pub mod present;
pub mod statement;

pub use present::{
    Severity, counterparty, format_amount, format_balance, format_date, format_date_in, is_credit,
    severity,
};
pub use statement::{Account, BankStatement, Transaction};
