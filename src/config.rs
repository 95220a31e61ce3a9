//! Matcher configuration.
//!
//! ```
//! use spread_matcher::config::{MatcherConfig, ReferencePolicy};
//!
//! let config: MatcherConfig = serde_json::from_str(r#"{"references":"lenient"}"#).unwrap();
//! assert_eq!(config.references, ReferencePolicy::Lenient);
//! assert!(!config.report_exhausted);
//! ```

use serde::{Deserialize, Serialize};

/// How the matcher treats priority nodes that name unknown entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Reject the whole call
    #[default]
    Strict,
    /// Skip the node and keep going
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub references: ReferencePolicy,

    /// List fully consumed entities (volume 0) in the leftover groups too
    #[serde(default = "default_report_exhausted")]
    pub report_exhausted: bool,
}

pub fn default_report_exhausted() -> bool {
    false
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            references: ReferencePolicy::default(),
            report_exhausted: default_report_exhausted(),
        }
    }
}

impl MatcherConfig {
    /// Permissive reporting: unknown ids are skipped and every entity is
    /// listed in the leftover groups.
    pub fn compatible() -> Self {
        Self {
            references: ReferencePolicy::Lenient,
            report_exhausted: true,
        }
    }

    pub fn with_references(mut self, references: ReferencePolicy) -> Self {
        self.references = references;
        self
    }

    pub fn with_report_exhausted(mut self, report_exhausted: bool) -> Self {
        self.report_exhausted = report_exhausted;
        self
    }
}
