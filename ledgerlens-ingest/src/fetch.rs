//! One-shot statement fetch: GET, status check, JSON parse, shape check.
//!
//! Calls are independent. Nothing is cached or shared between them, so two calls always make two
//! requests.

use ledgerlens_core::BankStatement;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::FetchError;

/// Relative path of the statement endpoint
pub const ENDPOINT_PATH: &str = "/api/getbalance";

/// Anything that can produce a bank statement once per call.
pub trait StatementSource {
    fn fetch(&self) -> impl Future<Output = Result<BankStatement, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct StatementClient {
    http: reqwest::Client,
    url: String,
}

impl StatementClient {
    /// Client for `<base_url>/api/getbalance` without a request timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: endpoint_url(base_url),
        }
    }

    /// Like [`StatementClient::new`], optionally bounding each request.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            http: builder.build()?,
            url: endpoint_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and validate the statement. Failures are logged before being returned.
    pub async fn fetch(&self) -> Result<BankStatement, FetchError> {
        let res = self.fetch_once().await;
        if let Err(err) = &res {
            error!("Error fetching transactions: {err}");
        }
        res
    }

    async fn fetch_once(&self) -> Result<BankStatement, FetchError> {
        debug!(url = %self.url, "fetching statement");
        let resp = self.http.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        let statement = validate_payload(value)?;

        debug!(
            transactions = statement.transactions.len(),
            "statement received"
        );
        Ok(statement)
    }
}

impl StatementSource for StatementClient {
    fn fetch(&self) -> impl Future<Output = Result<BankStatement, FetchError>> + Send {
        StatementClient::fetch(self)
    }
}

/// Check that `account` and `transactions` are present, then decode.
///
/// `transactions` may be an empty list.
pub fn validate_payload(value: Value) -> Result<BankStatement, FetchError> {
    if value.is_null() {
        return Err(FetchError::InvalidStructure("payload is null".to_string()));
    }

    for field in ["account", "transactions"] {
        match value.get(field) {
            None | Some(Value::Null) => {
                return Err(FetchError::InvalidStructure(format!("missing `{field}`")));
            }
            Some(_) => {}
        }
    }

    serde_json::from_value(value).map_err(|e| FetchError::InvalidStructure(e.to_string()))
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), ENDPOINT_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> Value {
        json!({ "name": "Jane Doe", "iban": "DE89370400440532013000", "balance": 120.75 })
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:3000"),
            "http://localhost:3000/api/getbalance"
        );
        assert_eq!(
            endpoint_url("http://localhost:3000/"),
            "http://localhost:3000/api/getbalance"
        );
        assert_eq!(endpoint_url(""), "/api/getbalance");
    }

    #[test]
    fn test_validate_accepts_empty_transactions() {
        let s = validate_payload(json!({
            "account": account(),
            "currency": "EUR",
            "transactions": []
        }))
        .unwrap();
        assert!(s.transactions.is_empty());
        assert_eq!(s.account.balance, Some(120.75));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let cases = [
            Value::Null,
            json!({ "currency": "EUR", "transactions": [] }),
            json!({ "account": account(), "currency": "EUR" }),
            json!({ "account": null, "transactions": [] }),
            json!([]),
            json!("statement"),
        ];
        for case in cases {
            let err = validate_payload(case.clone()).unwrap_err();
            assert!(
                matches!(err, FetchError::InvalidStructure(_)),
                "{case} -> {err:?}"
            );
            assert!(err.to_string().contains("Invalid data structure"));
        }
    }

    #[test]
    fn test_validate_accepts_null_optional_fields() {
        let s = validate_payload(json!({
            "account": { "name": "A", "iban": "X" },
            "currency": null,
            "transactions": [{ "description": null, "amount": 4.2, "to": "Shop" }]
        }))
        .unwrap();
        assert_eq!(s.account.balance, None);
        assert_eq!(s.currency_or_default(), "EUR");
        assert_eq!(s.transactions[0].description, "");
    }

    #[test]
    fn test_validate_rejects_wrong_shape() {
        let err = validate_payload(json!({ "account": "nope", "transactions": [] })).unwrap_err();
        assert!(err.to_string().contains("Invalid data structure"));
    }
}
