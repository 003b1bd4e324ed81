use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Payment state of a premium registration record.
/// Free registrations carry no payment status at all (`NULL` in the store).
/// A premium record is `Pending` from the moment it is inserted until the
/// payment processor confirms the charge, at which point it becomes
/// `Completed`. A record stuck at `Pending` is an abandoned paid
/// registration; no automatic reconciliation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(Error::Parsing(format!(
                "\"{}\" is not a valid payment status",
                other
            ))),
        }
    }
}

impl AsRef<str> for PaymentStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}
