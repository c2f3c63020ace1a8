//! Rendered views affected by mutations and where callers go next.

use std::fmt;

use serde::{Serialize, Serializer};

use super::DeckId;

/// Cached view a mutation can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPath {
    /// The owner's deck list (`/dashboard`).
    DeckList,
    /// One deck's detail page (`/dashboard/{id}`).
    DeckDetail(DeckId),
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeckList => f.write_str("/dashboard"),
            Self::DeckDetail(id) => write!(f, "/dashboard/{id}"),
        }
    }
}

impl Serialize for ViewPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of a mutation plus the downstream signals it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome<T> {
    /// Entity produced by the mutation.
    pub value: T,
    /// Views invalidated after the write committed.
    pub invalidated: Vec<ViewPath>,
    /// Where the caller should navigate, if anywhere.
    pub redirect: Option<ViewPath>,
}

impl<T> MutationOutcome<T> {
    /// Outcome without a navigation hint.
    pub fn new(value: T, invalidated: Vec<ViewPath>) -> Self {
        Self {
            value,
            invalidated,
            redirect: None,
        }
    }

    /// Attach a navigation hint.
    #[must_use]
    pub fn redirect_to(mut self, view: ViewPath) -> Self {
        self.redirect = Some(view);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_as_dashboard_routes() {
        assert_eq!(ViewPath::DeckList.to_string(), "/dashboard");
        assert_eq!(ViewPath::DeckDetail(DeckId::new(12)).to_string(), "/dashboard/12");
    }

    #[test]
    fn serialises_as_path_string() {
        let value = serde_json::to_value(ViewPath::DeckDetail(DeckId::new(3))).expect("json");
        assert_eq!(value, serde_json::json!("/dashboard/3"));
    }
}
