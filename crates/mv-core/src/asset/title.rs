use serde::{Deserialize, Serialize};

/// Human-assigned, unique asset title.
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetTitle(String);

impl AssetTitle {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetTitle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AssetTitle::parse(&value).ok_or_else(|| "title must not be empty".to_string())
    }
}

impl From<AssetTitle> for String {
    fn from(title: AssetTitle) -> Self {
        title.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(AssetTitle::parse("  Bee ").unwrap().as_str(), "Bee");
        assert!(AssetTitle::parse("").is_none());
        assert!(AssetTitle::parse(" \t\n").is_none());
    }

    #[test]
    fn deserialize_rejects_blank_title() {
        let parsed: Result<AssetTitle, _> = serde_json::from_str("\"   \"");
        assert!(parsed.is_err());
        let ok: AssetTitle = serde_json::from_str("\"Bee\"").unwrap();
        assert_eq!(ok.as_str(), "Bee");
    }
}
