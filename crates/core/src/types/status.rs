//! Lifecycle status of a trial request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Follow-up state of a trial request.
///
/// Stored as `TEXT` in `trial_requests.status`; new rows start as
/// [`TrialStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    #[default]
    Pending,
    Contacted,
    Converted,
    Declined,
}

impl TrialStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "converted" => Ok(Self::Converted),
            "declined" => Ok(Self::Declined),
            _ => Err(format!("invalid trial status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form_matches_serde() {
        for status in [
            TrialStatus::Pending,
            TrialStatus::Contacted,
            TrialStatus::Converted,
            TrialStatus::Declined,
        ] {
            assert_eq!(status.as_str().parse::<TrialStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_string(&status).unwrap(),
                format!("\"{status}\"")
            );
        }
    }

    #[test]
    fn test_unknown_status() {
        assert!("archived".parse::<TrialStatus>().is_err());
        assert_eq!(TrialStatus::default(), TrialStatus::Pending);
    }
}
