use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category of sensitive material the scanner can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    AwsAccessKey,
    PrivateKeyMarker,
    GenericApiKeyAssignment,
    PasswordAssignment,
    BearerToken,
    VcsToken,
}

impl RuleName {
    pub const ALL: [RuleName; 6] = [
        RuleName::AwsAccessKey,
        RuleName::PrivateKeyMarker,
        RuleName::GenericApiKeyAssignment,
        RuleName::PasswordAssignment,
        RuleName::BearerToken,
        RuleName::VcsToken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::AwsAccessKey => "aws_access_key",
            RuleName::PrivateKeyMarker => "private_key_marker",
            RuleName::GenericApiKeyAssignment => "generic_api_key_assignment",
            RuleName::PasswordAssignment => "password_assignment",
            RuleName::BearerToken => "bearer_token",
            RuleName::VcsToken => "vcs_token",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of scanning a block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "rules", rename_all = "snake_case")]
pub enum ScanVerdict {
    Clean,
    /// Every rule that matched, never empty
    Flagged(BTreeSet<RuleName>),
}

impl ScanVerdict {
    pub fn from_rules(rules: BTreeSet<RuleName>) -> Self {
        if rules.is_empty() {
            ScanVerdict::Clean
        } else {
            ScanVerdict::Flagged(rules)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ScanVerdict::Clean)
    }

    pub fn rules(&self) -> Option<&BTreeSet<RuleName>> {
        match self {
            ScanVerdict::Clean => None,
            ScanVerdict::Flagged(rules) => Some(rules),
        }
    }
}
