//! `monta-autofill`: fill an empty commitment-date input from the host.
//!
//! Two states (EMPTY, FILLED), one transition. On page ready the flow
//! checks the target input, parses the record id from the page path's
//! trailing segment, reads `commitment_date` over the host's generic RPC
//! endpoint, reformats the stored UTC timestamp into local display time,
//! and writes it into the input, firing `input` and `change` notifications
//! once each.
//!
//! Internals are `Result`-based so each bail-out point is explicit; only
//! the public entry point [`autofill_commitment_date`] swallows, logging at
//! debug level. The page must keep rendering no matter what goes wrong.

pub mod format;
pub mod input;
pub mod rpc;

pub use input::{FormInput, InputEvent};
pub use rpc::{RpcClient, RpcError};

use serde_json::Value;
use thiserror::Error;

pub const ORDER_MODEL: &str = "sale.order";
pub const COMMITMENT_DATE_FIELD: &str = "commitment_date";

#[derive(Debug, Error)]
pub enum AutofillError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("unparseable commitment date: {0}")]
    BadTimestamp(#[from] chrono::ParseError),
}

/// Why a run ended without writing to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The target input is not on this page.
    InputMissing,
    /// The input already holds a value; user or server data is never
    /// overwritten.
    AlreadyFilled,
    /// The page path does not end in a numeric record id.
    NoRecordId,
    /// The record has no commitment date yet.
    EmptyField,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Filled(String),
    Skipped(Skip),
}

/// Fill the commitment-date input if it is empty.
///
/// Never fails and never panics: any error downgrades to a debug log and
/// the page is left untouched.
pub fn autofill_commitment_date(
    input: Option<&mut dyn FormInput>,
    page_path: &str,
    rpc: &RpcClient,
) {
    match try_fill(input, page_path, rpc) {
        Ok(Outcome::Filled(value)) => tracing::debug!(value, "commitment date filled"),
        Ok(Outcome::Skipped(skip)) => tracing::debug!(?skip, "commitment date autofill skipped"),
        Err(err) => tracing::debug!(error = %err, "commitment date autofill failed"),
    }
}

fn try_fill(
    input: Option<&mut dyn FormInput>,
    page_path: &str,
    rpc: &RpcClient,
) -> Result<Outcome, AutofillError> {
    let Some(input) = input else {
        return Ok(Outcome::Skipped(Skip::InputMissing));
    };
    if !input.value().trim().is_empty() {
        return Ok(Outcome::Skipped(Skip::AlreadyFilled));
    }
    let Some(record_id) = record_id_from_path(page_path) else {
        return Ok(Outcome::Skipped(Skip::NoRecordId));
    };

    let value = rpc.read_field(ORDER_MODEL, record_id, COMMITMENT_DATE_FIELD)?;
    let Some(raw) = as_timestamp(&value) else {
        return Ok(Outcome::Skipped(Skip::EmptyField));
    };

    let display = format::format_local(&raw)?;
    input.set_value(&display);
    input.notify(InputEvent::Input);
    input.notify(InputEvent::Change);
    Ok(Outcome::Filled(display))
}

/// Numeric record id from the trailing path segment, e.g. `/web/orders/123`.
fn record_id_from_path(path: &str) -> Option<u64> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    segment.parse().ok()
}

/// The host encodes an unset datetime as `false` or `null`.
fn as_timestamp(value: &Value) -> Option<String> {
    let raw = value.as_str()?.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
