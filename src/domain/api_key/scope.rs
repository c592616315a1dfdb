//! API key scopes

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named permission granted to an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApiScope {
    /// Read translations of the repository
    #[serde(rename = "translations.view")]
    TranslationsView,
    /// Modify translation texts
    #[serde(rename = "translations.edit")]
    TranslationsEdit,
    /// Create, rename and delete translation keys
    #[serde(rename = "keys.edit")]
    KeysEdit,
}

/// Set of scopes; membership only, ordering is for stable output
pub type ScopeSet = BTreeSet<ApiScope>;

impl ApiScope {
    pub const ALL: [ApiScope; 3] = [Self::TranslationsView, Self::TranslationsEdit, Self::KeysEdit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TranslationsView => "translations.view",
            Self::TranslationsEdit => "translations.edit",
            Self::KeysEdit => "keys.edit",
        }
    }

    /// Every defined scope
    pub fn all() -> ScopeSet {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for ApiScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("unknown scope '{}'", s))
    }
}
