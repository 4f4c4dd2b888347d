//! Document status codes and approval-step actions.
//!
//! The surrounding store persists a document's workflow state as a single
//! prefix-matched string (`"PendingA3"`, `"Approved"`, ...). This module
//! parses that string once into the tagged [`StatusCode`] variant so the rest
//! of the system never re-derives state from substrings.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// StatusCode
// ============================================================================

/// Workflow state of a document, derived from the stored status string.
///
/// The stored vocabulary is closed; [`StatusCode::parse`] returns `None` for
/// anything outside it, which downstream consumers treat as "no determinable
/// state".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// Document exists but has not entered its approval chain.
    Draft,
    /// Waiting on the approver at the given 1-based step order.
    Pending(u32),
    /// Every step in the chain approved the document.
    Approved,
    /// An approver rejected the document.
    Rejected,
    /// An approver put the document on hold.
    OnHold,
    /// The creator recalled the document from its chain.
    Recalled,
}

impl StatusCode {
    /// Parse a stored status string into its tagged form.
    ///
    /// Matching is case-insensitive and prefix-based, highest priority first:
    /// `recalled` > `pending` > `rejected` > `onhold` > `approved`. An empty
    /// or whitespace-only value is a draft. Anything else is outside the
    /// vocabulary and yields `None`.
    ///
    /// A `Pending` value carries the current step order as a numeric suffix,
    /// optionally preceded by a chain marker (`"PendingA3"` and `"Pending3"`
    /// both mean step 3). A bare `"Pending"` is treated as step 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use vidimus_core::StatusCode;
    ///
    /// assert_eq!(StatusCode::parse("PendingA3"), Some(StatusCode::Pending(3)));
    /// assert_eq!(StatusCode::parse("approved"), Some(StatusCode::Approved));
    /// assert_eq!(StatusCode::parse(""), Some(StatusCode::Draft));
    /// assert_eq!(StatusCode::parse("archived"), None);
    /// ```
    pub fn parse(stored: &str) -> Option<StatusCode> {
        let trimmed = stored.trim();
        if trimmed.is_empty() {
            return Some(StatusCode::Draft);
        }
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("recalled") {
            Some(StatusCode::Recalled)
        } else if let Some(rest) = lower.strip_prefix("pending") {
            Some(StatusCode::Pending(parse_step_suffix(rest)))
        } else if lower.starts_with("rejected") {
            Some(StatusCode::Rejected)
        } else if lower.starts_with("onhold") {
            Some(StatusCode::OnHold)
        } else if lower.starts_with("approved") {
            Some(StatusCode::Approved)
        } else {
            None
        }
    }

    /// Canonical stored representation of this status.
    pub fn as_stored(&self) -> String {
        match self {
            StatusCode::Draft => String::new(),
            StatusCode::Pending(order) => format!("PendingA{order}"),
            StatusCode::Approved => "Approved".to_string(),
            StatusCode::Rejected => "Rejected".to_string(),
            StatusCode::OnHold => "OnHold".to_string(),
            StatusCode::Recalled => "Recalled".to_string(),
        }
    }

    /// The verb category used for result-summary sentences.
    ///
    /// A draft has no verb; its summary is attributed to the creator with no
    /// phrase, which the board layer composes separately.
    pub fn summary_verb(&self) -> Option<SummaryVerb> {
        match self {
            StatusCode::Draft => None,
            StatusCode::Pending(_) => Some(SummaryVerb::Pending),
            StatusCode::Approved => Some(SummaryVerb::Approved),
            StatusCode::Rejected => Some(SummaryVerb::Rejected),
            StatusCode::OnHold => Some(SummaryVerb::OnHold),
            StatusCode::Recalled => Some(SummaryVerb::Recalled),
        }
    }

    /// Returns `true` if the document is waiting on some approver.
    pub fn is_pending(&self) -> bool {
        matches!(self, StatusCode::Pending(_))
    }

    /// Returns `true` if the chain can no longer advance (terminal states).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StatusCode::Approved | StatusCode::Rejected | StatusCode::Recalled
        )
    }

    /// The pending step order, if this status is `Pending`.
    pub fn pending_step(&self) -> Option<u32> {
        match self {
            StatusCode::Pending(order) => Some(*order),
            _ => None,
        }
    }
}

/// Numeric suffix of a pending status, skipping any chain marker letters.
fn parse_step_suffix(rest: &str) -> u32 {
    let digits: String = rest
        .chars()
        .skip_while(|c| c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(1)
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Draft => write!(f, "draft"),
            StatusCode::Pending(order) => write!(f, "pending({order})"),
            StatusCode::Approved => write!(f, "approved"),
            StatusCode::Rejected => write!(f, "rejected"),
            StatusCode::OnHold => write!(f, "on_hold"),
            StatusCode::Recalled => write!(f, "recalled"),
        }
    }
}

// ============================================================================
// SummaryVerb
// ============================================================================

/// Verb category of a board result-summary sentence.
///
/// Classification priority (a stored string that matches several prefixes
/// resolves to the highest): `Recalled` > `Pending` > `Rejected` > `OnHold` >
/// `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryVerb {
    /// The creator recalled the document.
    Recalled,
    /// An approver still has the document.
    Pending,
    /// An approver rejected the document.
    Rejected,
    /// An approver held the document.
    OnHold,
    /// The final approver approved the document.
    Approved,
}

impl SummaryVerb {
    /// Catalog key for the localized phrase template of this verb.
    pub fn catalog_key(&self) -> &'static str {
        match self {
            SummaryVerb::Recalled => "summary.recalled",
            SummaryVerb::Pending => "summary.pending",
            SummaryVerb::Rejected => "summary.rejected",
            SummaryVerb::OnHold => "summary.onhold",
            SummaryVerb::Approved => "summary.approved",
        }
    }
}

// ============================================================================
// StepAction
// ============================================================================

/// Action recorded on a single approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// The approver has not acted yet.
    Pending,
    /// The approver approved.
    Approved,
    /// The approver rejected.
    Rejected,
    /// The approver put the document on hold.
    OnHold,
}

impl StepAction {
    /// Returns `true` once the approver has acted on the step.
    pub fn is_acted(&self) -> bool {
        !matches!(self, StepAction::Pending)
    }

    /// The summary verb this action maps to when it is the displayed state.
    pub fn summary_verb(&self) -> Option<SummaryVerb> {
        match self {
            StepAction::Pending => None,
            StepAction::Approved => Some(SummaryVerb::Approved),
            StepAction::Rejected => Some(SummaryVerb::Rejected),
            StepAction::OnHold => Some(SummaryVerb::OnHold),
        }
    }

    /// Stored representation of the action.
    pub fn as_stored(&self) -> &'static str {
        match self {
            StepAction::Pending => "Pending",
            StepAction::Approved => "Approved",
            StepAction::Rejected => "Rejected",
            StepAction::OnHold => "OnHold",
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_stored())
    }
}

impl std::str::FromStr for StepAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(StepAction::Pending),
            "approved" => Ok(StepAction::Approved),
            "rejected" => Ok(StepAction::Rejected),
            "onhold" => Ok(StepAction::OnHold),
            other => Err(crate::Error::parse(format!("unknown step action: {other}"))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_draft() {
        assert_eq!(StatusCode::parse(""), Some(StatusCode::Draft));
        assert_eq!(StatusCode::parse("   "), Some(StatusCode::Draft));
    }

    #[test]
    fn test_parse_pending_variants() {
        assert_eq!(StatusCode::parse("PendingA3"), Some(StatusCode::Pending(3)));
        assert_eq!(StatusCode::parse("Pending2"), Some(StatusCode::Pending(2)));
        assert_eq!(StatusCode::parse("pendinga12"), Some(StatusCode::Pending(12)));
        assert_eq!(StatusCode::parse("Pending"), Some(StatusCode::Pending(1)));
    }

    #[test]
    fn test_parse_simple_states() {
        assert_eq!(StatusCode::parse("Approved"), Some(StatusCode::Approved));
        assert_eq!(StatusCode::parse("REJECTED"), Some(StatusCode::Rejected));
        assert_eq!(StatusCode::parse("OnHold"), Some(StatusCode::OnHold));
        assert_eq!(StatusCode::parse("Recalled"), Some(StatusCode::Recalled));
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(StatusCode::parse("archived"), None);
        assert_eq!(StatusCode::parse("42"), None);
    }

    #[test]
    fn test_recalled_wins_over_other_prefixes() {
        // A malformed stored value matching several prefixes must classify
        // as Recalled, the highest-priority bucket.
        assert_eq!(
            StatusCode::parse("RecalledPendingA2"),
            Some(StatusCode::Recalled)
        );
    }

    #[test]
    fn test_as_stored_roundtrip() {
        for code in [
            StatusCode::Draft,
            StatusCode::Pending(4),
            StatusCode::Approved,
            StatusCode::Rejected,
            StatusCode::OnHold,
            StatusCode::Recalled,
        ] {
            assert_eq!(StatusCode::parse(&code.as_stored()), Some(code));
        }
    }

    #[test]
    fn test_summary_verb_mapping() {
        assert_eq!(StatusCode::Draft.summary_verb(), None);
        assert_eq!(
            StatusCode::Pending(9).summary_verb(),
            Some(SummaryVerb::Pending)
        );
        assert_eq!(
            StatusCode::Recalled.summary_verb(),
            Some(SummaryVerb::Recalled)
        );
    }

    #[test]
    fn test_predicates() {
        assert!(StatusCode::Pending(1).is_pending());
        assert!(!StatusCode::OnHold.is_pending());
        assert!(StatusCode::Approved.is_terminal());
        assert!(StatusCode::Recalled.is_terminal());
        assert!(!StatusCode::Pending(1).is_terminal());
        assert_eq!(StatusCode::Pending(7).pending_step(), Some(7));
        assert_eq!(StatusCode::Approved.pending_step(), None);
    }

    #[test]
    fn test_step_action_from_str() {
        assert_eq!("Approved".parse::<StepAction>().unwrap(), StepAction::Approved);
        assert_eq!("onhold".parse::<StepAction>().unwrap(), StepAction::OnHold);
        assert!("nope".parse::<StepAction>().is_err());
    }

    #[test]
    fn test_step_action_verbs() {
        assert_eq!(StepAction::Pending.summary_verb(), None);
        assert_eq!(
            StepAction::Rejected.summary_verb(),
            Some(SummaryVerb::Rejected)
        );
        assert!(StepAction::Approved.is_acted());
        assert!(!StepAction::Pending.is_acted());
    }
}
