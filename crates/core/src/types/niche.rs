//! Normalized niche keys for content, image, and pricing tables.

use serde::{Deserialize, Serialize};

/// A product-category key (e.g., "pets", "beauty").
///
/// Niches index the static content/image/price tables. The wrapper
/// normalizes to lowercase on construction so that `"Pets"`, `"PETS"`,
/// and `"pets"` all hit the same table entry. Unknown niches are valid
/// values - table lookups fall back to a generic entry, they do not fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Niche(String);

impl Niche {
    /// Create a niche key, normalizing to lowercase and trimming whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Get the normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Niche {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Niche {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Niche {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_niche_normalizes_case_and_whitespace() {
        assert_eq!(Niche::new("  Pets "), Niche::new("pets"));
        assert_eq!(Niche::new("BEAUTY").as_str(), "beauty");
    }

    #[test]
    fn test_niche_display() {
        assert_eq!(Niche::new("Home Decor").to_string(), "home decor");
    }
}
