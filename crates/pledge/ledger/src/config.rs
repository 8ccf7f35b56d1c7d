use pledge_types::{PledgeError, PledgeResult};
use serde::{Deserialize, Serialize};

/// Ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Maximum title length in bytes.
    pub title_max_bytes: usize,
    /// Maximum description length in code points.
    pub description_max_chars: usize,
    /// Append successful mutations to the audit trail.
    pub audit_trail: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            title_max_bytes: 100,
            description_max_chars: 500,
            audit_trail: true,
        }
    }
}

impl LedgerConfig {
    /// Tighter text bounds, audit on.
    pub fn strict() -> Self {
        Self {
            title_max_bytes: 64,
            description_max_chars: 280,
            audit_trail: true,
        }
    }

    /// Default bounds without an audit trail, for throwaway ledgers.
    pub fn ephemeral() -> Self {
        Self {
            audit_trail: false,
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub(crate) fn check_text(&self, title: &str, description: &str) -> PledgeResult<()> {
        if title.len() > self.title_max_bytes {
            return Err(PledgeError::TextTooLong {
                field: "title",
                limit: self.title_max_bytes,
            });
        }
        if description.chars().count() > self.description_max_chars {
            return Err(PledgeError::TextTooLong {
                field: "description",
                limit: self.description_max_chars,
            });
        }
        Ok(())
    }
}
