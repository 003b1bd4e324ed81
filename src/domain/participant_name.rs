use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;

const MAX_LEN: usize = 256;

/// A participant-supplied name, trimmed
#[derive(Debug, PartialEq, Clone)]
pub struct ParticipantName(String);

impl FromStr for ParticipantName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(Error::Parsing("Name cannot be empty".into()));
        }
        if value.graphemes(true).count() > MAX_LEN {
            return Err(Error::Parsing("Name too long".into()));
        }

        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for ParticipantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
