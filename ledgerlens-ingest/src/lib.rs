//! ledgerlens-ingest: fetches the bank statement from the backend and checks its shape.

pub mod error;
pub mod fetch;

pub use error::FetchError;
pub use fetch::{ENDPOINT_PATH, StatementClient, StatementSource, validate_payload};
