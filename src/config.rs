use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AgingError, Result};
use crate::types::IdentityStrategy;

/// label used when a row has no customer name
pub const DEFAULT_UNKNOWN_CUSTOMER: &str = "Unknown";

/// simplification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    pub identity: IdentityStrategy,
    pub unknown_customer_label: String,
    /// as-of date that takes precedence over the report's own
    pub as_of_override: Option<NaiveDate>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self::reference_keyed()
    }
}

impl SimplifyConfig {
    /// group by external reference, falling back to the customer name
    pub fn reference_keyed() -> Self {
        Self {
            identity: IdentityStrategy::ReferenceKeyed,
            unknown_customer_label: DEFAULT_UNKNOWN_CUSTOMER.to_string(),
            as_of_override: None,
        }
    }

    /// additionally merge customers that share a canonical name
    pub fn name_merge() -> Self {
        Self {
            identity: IdentityStrategy::NameMerge,
            ..Self::reference_keyed()
        }
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of_override = Some(as_of);
        self
    }

    pub fn merges_names(&self) -> bool {
        self.identity == IdentityStrategy::NameMerge
    }

    /// load and validate from json
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimplifyConfig = serde_json::from_str(json).map_err(|e| AgingError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.unknown_customer_label.trim().is_empty() {
            return Err(AgingError::InvalidConfiguration {
                message: "unknown_customer_label must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
