//! Type-safe enumerations for survival dataset construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SurvivalError;

/// Tie-break policy applied when both a primary and a competing event exist.
///
/// - **First**: whichever qualifying event occurs chronologically first wins.
/// - **Primary**: the primary event governs the end date, even if the
///   competing event happened earlier.
/// - **Competing**: the competing event governs the end date, even if the
///   primary event happened earlier.
///
/// The censor date always stays a candidate, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndEventPriority {
    #[default]
    First,
    Primary,
    Competing,
}

impl EndEventPriority {
    /// All accepted policies, in documentation order.
    pub const ALL: [EndEventPriority; 3] = [
        EndEventPriority::First,
        EndEventPriority::Primary,
        EndEventPriority::Competing,
    ];

    /// Returns the configuration spelling of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndEventPriority::First => "first",
            EndEventPriority::Primary => "primary",
            EndEventPriority::Competing => "competing",
        }
    }
}

impl fmt::Display for EndEventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EndEventPriority {
    type Err = SurvivalError;

    /// Parse a policy name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(EndEventPriority::First),
            "primary" => Ok(EndEventPriority::Primary),
            "competing" => Ok(EndEventPriority::Competing),
            _ => Err(SurvivalError::Configuration(format!(
                "unexpected end event priority '{s}' (expected first, primary or competing)"
            ))),
        }
    }
}

/// The kind of terminal event that closed a subject's follow-up.
///
/// Variant order is the tie order: when two retained events fall on the same
/// day, the earlier variant is reported as the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Primary,
    Competing,
    Censor,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Primary => "primary",
            EventCategory::Competing => "competing",
            EventCategory::Censor => "censor",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_priority_case_insensitively() {
        assert_eq!(
            "First".parse::<EndEventPriority>().unwrap(),
            EndEventPriority::First
        );
        assert_eq!(
            " competing ".parse::<EndEventPriority>().unwrap(),
            EndEventPriority::Competing
        );
    }

    #[test]
    fn rejects_unknown_priority() {
        let err = "latest".parse::<EndEventPriority>().unwrap_err();
        assert!(matches!(err, SurvivalError::Configuration(_)));
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn default_priority_is_first() {
        assert_eq!(EndEventPriority::default(), EndEventPriority::First);
    }

    #[test]
    fn category_order_is_tie_order() {
        assert!(EventCategory::Primary < EventCategory::Competing);
        assert!(EventCategory::Competing < EventCategory::Censor);
    }
}
