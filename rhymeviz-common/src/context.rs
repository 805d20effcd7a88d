//! Typed page context for widget initialization
//!
//! Each widget is constructed with an explicit `PageContext` instead of
//! scraping its slug or id out of the surrounding markup. The context is
//! resolved once per widget and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three mutually exclusive page kinds a widget can be mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextKind {
    /// Dictionary entry/sense page (the default context)
    Sense,
    /// Artist profile page
    Artist,
    /// Place page
    Place,
}

impl ContextKind {
    /// Sense is the default context; artist and place are the
    /// non-default kinds (they get the one-shot zoom clamp on maps).
    pub fn is_default(&self) -> bool {
        matches!(self, ContextKind::Sense)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Sense => write!(f, "sense"),
            ContextKind::Artist => write!(f, "artist"),
            ContextKind::Place => write!(f, "place"),
        }
    }
}

/// Per-widget context: what page are we on, and for which identifier
///
/// The identifier is a sense id for `Sense` contexts and a slug for
/// `Artist`/`Place` contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub kind: ContextKind,
    pub identifier: String,
}

impl PageContext {
    pub fn sense(sense_id: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Sense,
            identifier: sense_id.into(),
        }
    }

    pub fn artist(slug: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Artist,
            identifier: slug.into(),
        }
    }

    pub fn place(slug: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Place,
            identifier: slug.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sense_is_default_context() {
        assert!(ContextKind::Sense.is_default());
        assert!(!ContextKind::Artist.is_default());
        assert!(!ContextKind::Place.is_default());
    }

    #[test]
    fn test_context_constructors() {
        let ctx = PageContext::artist("method-man");
        assert_eq!(ctx.kind, ContextKind::Artist);
        assert_eq!(ctx.identifier, "method-man");
    }
}
