use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Registration tier selected by the participant.
/// Free registrations complete immediately; premium registrations
/// require a card payment before they are considered complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    #[default]
    Free,
    Premium,
}

impl FromStr for RegistrationType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            other => Err(Error::Parsing(format!(
                "\"{}\" is not a valid registration type",
                other
            ))),
        }
    }
}

impl AsRef<str> for RegistrationType {
    fn as_ref(&self) -> &str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}
