//! Occasion tags for catalog listings.

use serde::{Deserialize, Serialize};

/// Error returned for a name outside the occasion vocabulary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("occasion must be one of: {}", Occasion::names().join(", "))]
pub struct OccasionError;

/// The fixed set of occasions a flower can be listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Romance,
    Birthday,
    Wedding,
    Sympathy,
    Congratulations,
    Everyday,
}

impl Occasion {
    /// Every occasion, in display order.
    pub const ALL: [Self; 6] = [
        Self::Romance,
        Self::Birthday,
        Self::Wedding,
        Self::Sympathy,
        Self::Congratulations,
        Self::Everyday,
    ];

    /// Returns the wire name of the occasion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Romance => "romance",
            Self::Birthday => "birthday",
            Self::Wedding => "wedding",
            Self::Sympathy => "sympathy",
            Self::Congratulations => "congratulations",
            Self::Everyday => "everyday",
        }
    }

    /// Wire names of every occasion.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|o| o.as_str()).collect()
    }

    /// Parse an occasion name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`OccasionError`] if the name is not in the vocabulary.
    pub fn parse(s: &str) -> Result<Self, OccasionError> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(wanted))
            .ok_or(OccasionError)
    }
}

impl std::fmt::Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Occasion {
    type Err = OccasionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
