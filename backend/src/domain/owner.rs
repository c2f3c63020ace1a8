//! Identity values issued by the external identity provider.
//!
//! Owner and organisation identifiers are opaque strings: the provider decides
//! their shape, the domain only requires them to be non-blank.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for provider-issued identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier carried leading or trailing whitespace.
    #[error("identifier must not contain surrounding whitespace")]
    Padded,
}

fn validate_identifier(raw: &str) -> Result<(), IdentityValidationError> {
    if raw.is_empty() {
        return Err(IdentityValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdentityValidationError::Padded);
    }
    Ok(())
}

macro_rules! opaque_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
                let raw = raw.into();
                validate_identifier(&raw)?;
                Ok(Self(raw))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdentityValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

opaque_identifier! {
    /// Identity owning decks. Immutable once a deck is created.
    OwnerId
}

opaque_identifier! {
    /// Organisation the caller is acting within, if any.
    OrgId
}

/// Authenticated caller as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Identity acting on the request.
    pub user_id: OwnerId,
    /// Active organisation, when the caller selected one.
    pub org_id: Option<OrgId>,
}

impl Principal {
    /// Principal acting outside any organisation.
    #[must_use]
    pub fn user(user_id: OwnerId) -> Self {
        Self {
            user_id,
            org_id: None,
        }
    }

    /// Attach the active organisation.
    #[must_use]
    pub fn with_org(mut self, org_id: OrgId) -> Self {
        self.org_id = Some(org_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentityValidationError::Empty)]
    #[case(" user_1", IdentityValidationError::Padded)]
    #[case("user_1\n", IdentityValidationError::Padded)]
    fn rejects_malformed_identifiers(#[case] raw: &str, #[case] expected: IdentityValidationError) {
        assert_eq!(OwnerId::new(raw), Err(expected));
    }

    #[test]
    fn accepts_provider_shaped_identifiers() {
        let owner = OwnerId::new("user_2abcDEF").expect("valid owner id");
        assert_eq!(owner.as_str(), "user_2abcDEF");
        let org = OrgId::new("org_9").expect("valid org id");
        let principal = Principal::user(owner.clone()).with_org(org.clone());
        assert_eq!(principal.user_id, owner);
        assert_eq!(principal.org_id, Some(org));
    }

    #[test]
    fn deserialisation_applies_validation() {
        let result: Result<OwnerId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
