//! Turns page state into display rows. Shared by plain output and the TUI.

use chrono_tz::Tz;
use ledgerlens_core::{
    Severity, Transaction, counterparty, format_amount, format_date_in, is_credit, severity,
};

use crate::page::AccountPage;

pub const LOADING_MESSAGE: &str = "Loading bank statement...";
pub const EMPTY_MESSAGE: &str = "No transactions";

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub severity: Severity,
    pub counterparty: String,
    pub description: String,
    pub date: String,
    pub amount: String,
}

impl TransactionRow {
    pub fn from_transaction(tx: &Transaction, tz: Tz) -> Self {
        let credit = is_credit(Some(tx));
        Self {
            severity: severity(credit),
            counterparty: counterparty(Some(tx)),
            description: tx.description.clone(),
            date: format_date_in(tx.date.as_deref(), tz),
            amount: format_amount(tx.amount, credit),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self.severity {
            Severity::Success => "IN",
            Severity::Danger => "OUT",
        }
    }
}

pub fn transaction_rows(txs: &[Transaction], tz: Tz) -> Vec<TransactionRow> {
    txs.iter()
        .map(|t| TransactionRow::from_transaction(t, tz))
        .collect()
}

/// Account summary lines, empty until a statement has loaded.
pub fn account_lines(page: &AccountPage) -> Vec<String> {
    let Some(account) = &page.account else {
        return Vec::new();
    };
    let mut lines = vec![
        account.name.clone(),
        format!("IBAN: {}", account.iban),
        format!("Balance: {} {}", page.formatted_balance(), page.currency()),
    ];
    if let Some((total_in, total_out)) = page.formatted_totals() {
        lines.push(format!("In: {total_in}  Out: {total_out}"));
    }
    lines
}

/// Whole page as text, in display order.
pub fn plain_lines(page: &AccountPage, tz: Tz) -> Vec<String> {
    if page.is_loading {
        return vec![LOADING_MESSAGE.to_string()];
    }

    let mut out = Vec::new();
    if let Some(err) = &page.error {
        out.push(err.clone());
        return out;
    }

    out.extend(account_lines(page));
    if page.account.is_none() {
        return out;
    }
    out.push(String::new());

    if page.transactions.is_empty() {
        out.push(EMPTY_MESSAGE.to_string());
        return out;
    }

    for row in transaction_rows(&page.transactions, tz) {
        out.push(format!(
            "[{:<3}] {:<24} {:<28} {:<24} {:>14}",
            row.tag(),
            row.counterparty,
            row.description,
            row.date,
            row.amount
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::{Account, BankStatement};

    fn loaded_page(transactions: Vec<Transaction>) -> AccountPage {
        let mut page = AccountPage::new();
        page.finish_load(Ok(BankStatement {
            account: Account {
                name: "Jane Doe".to_string(),
                iban: "NL91ABNA0417164300".to_string(),
                balance: Some(-42.0),
            },
            currency: "EUR".to_string(),
            transactions,
        }));
        page
    }

    #[test]
    fn test_row_for_credit_and_debit() {
        let credit = Transaction {
            description: "Salary".to_string(),
            amount: Some(2500.0),
            date: Some("2024-01-25T09:00:00Z".to_string()),
            from: Some("ACME BV".to_string()),
            to: None,
        };
        let row = TransactionRow::from_transaction(&credit, Tz::UTC);
        assert_eq!(row.severity, Severity::Success);
        assert_eq!(row.counterparty, "ACME BV");
        assert_eq!(row.date, "Jan 25, 2024, 09:00 AM");
        assert_eq!(row.amount, "+€2,500.00");
        assert_eq!(row.tag(), "IN");

        let debit = Transaction {
            description: "Rent".to_string(),
            amount: None,
            date: None,
            from: None,
            to: Some("Landlord".to_string()),
        };
        let row = TransactionRow::from_transaction(&debit, Tz::UTC);
        assert_eq!(row.severity, Severity::Danger);
        assert_eq!(row.date, "N/A");
        assert_eq!(row.amount, "-€0.00");
        assert_eq!(row.tag(), "OUT");
    }

    #[test]
    fn test_plain_lines_keep_order() {
        let page = loaded_page(vec![
            Transaction {
                description: "Second".to_string(),
                to: Some("B".to_string()),
                ..Default::default()
            },
            Transaction {
                description: "First".to_string(),
                from: Some("A".to_string()),
                ..Default::default()
            },
        ]);
        let lines = plain_lines(&page, Tz::UTC);
        assert_eq!(lines[0], "Jane Doe");
        assert_eq!(lines[2], "Balance: -42.00 EUR");
        assert_eq!(lines[3], "In: +€0.00  Out: -€0.00");
        assert!(lines[5].contains("Second"));
        assert!(lines[6].contains("First"));
    }

    #[test]
    fn test_plain_lines_states() {
        let page = loaded_page(Vec::new());
        assert_eq!(plain_lines(&page, Tz::UTC).last().unwrap(), EMPTY_MESSAGE);

        let mut loading = AccountPage::new();
        loading.begin_load();
        assert_eq!(plain_lines(&loading, Tz::UTC), vec![LOADING_MESSAGE.to_string()]);

        let failed = AccountPage {
            error: Some("boom".to_string()),
            ..Default::default()
        };
        assert_eq!(plain_lines(&failed, Tz::UTC), vec!["boom".to_string()]);
    }
}
