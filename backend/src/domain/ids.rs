//! Store-assigned numeric identifiers.
//!
//! Identifiers arrive from callers as JSON numbers or as numeric strings
//! (path segments, form fields); both spellings coerce to the same value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors raised when coercing caller input into an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// The input was not an integer.
    #[error("must be a whole number")]
    NotNumeric,
    /// The integer was zero or negative.
    #[error("must be a positive number")]
    NotPositive,
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a store-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let value: i64 = raw.trim().parse().map_err(|_| IdParseError::NotNumeric)?;
                if value <= 0 {
                    return Err(IdParseError::NotPositive);
                }
                Ok(Self(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Deck identifier.
    DeckId
}

numeric_id! {
    /// Card identifier.
    CardId
}
