//! Result-summary derivation.
//!
//! Every board row carries a one-line sentence naming who last acted on the
//! document and in what role ("Kim Minsu Team Lead has approved the
//! document"). Derivation has three stages:
//!
//! 1. classify the stored status into a verb category ([`StatusCode`] parse,
//!    priority `Recalled` > `Pending` > `Rejected` > `OnHold` > `Approved`);
//! 2. resolve the acting person from the approval-log history;
//! 3. compose the sentence through the localized catalog, with a documented
//!    fallback chain.
//!
//! Stages 1 and 2 are pure; the aggregator performs the profile lookups
//! between 2 and 3.

use vidimus_core::locale::MessageCatalog;
use vidimus_core::{ApprovalStep, Document, StatusCode, StepAction, SummaryVerb, UserId};

/// Resolve the acting person for a document's summary.
///
/// - `Recalled` and draft documents are attributed to the creator.
/// - `Pending(n)` is attributed to the approver whose step order equals `n`
///   (the earliest such step when orders are duplicated).
/// - `Rejected` / `OnHold` / `Approved` are attributed to the most recent
///   step with the matching action: latest `acted_at` wins, then the highest
///   step order; steps that never acted sort last.
///
/// An undeterminable status (`code == None`) or a missing matching step
/// yields `None`, which composes to an empty summary.
pub fn resolve_actor(
    code: Option<StatusCode>,
    document: &Document,
    steps: &[ApprovalStep],
) -> Option<UserId> {
    match code? {
        StatusCode::Draft | StatusCode::Recalled => Some(document.author.clone()),
        StatusCode::Pending(order) => steps
            .iter()
            .filter(|s| s.order == order)
            .min_by_key(|s| s.order)
            .map(|s| s.approver.clone()),
        StatusCode::Approved => latest_matching(steps, StepAction::Approved),
        StatusCode::Rejected => latest_matching(steps, StepAction::Rejected),
        StatusCode::OnHold => latest_matching(steps, StepAction::OnHold),
    }
}

fn latest_matching(steps: &[ApprovalStep], action: StepAction) -> Option<UserId> {
    steps
        .iter()
        .filter(|s| s.action == action)
        .max_by_key(|s| (s.acted_at, s.order))
        .map(|s| s.approver.clone())
}

/// Compose the summary sentence from verb category and actor display parts.
///
/// Fallback chain: localized phrase template for the verb → bare
/// `"{name} {position}"` → whichever of the two parts is non-empty → empty
/// string. Both parts empty always yields the empty string.
pub fn compose(
    catalog: &MessageCatalog,
    lang: &str,
    verb: Option<SummaryVerb>,
    name: &str,
    position: &str,
) -> String {
    let name = name.trim();
    let position = position.trim();
    if name.is_empty() && position.is_empty() {
        return String::new();
    }
    if let Some(verb) = verb {
        if let Some(line) = catalog.render(verb.catalog_key(), lang, name, position) {
            return line;
        }
    }
    match (name.is_empty(), position.is_empty()) {
        (false, false) => format!("{name} {position}"),
        (false, true) => name.to_string(),
        (true, false) => position.to_string(),
        (true, true) => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vidimus_core::DocumentId;

    fn doc(status: &str) -> Document {
        Document {
            id: DocumentId::new(),
            title: "Quarterly budget".to_string(),
            author: "creator".into(),
            created_at: Utc::now(),
            status: status.to_string(),
        }
    }

    fn step(order: u32, approver: &str, action: StepAction, acted_secs: Option<i64>) -> ApprovalStep {
        ApprovalStep {
            document_id: DocumentId::new(),
            order,
            approver: approver.into(),
            action,
            acted_at: acted_secs.map(|s| Utc.timestamp_opt(s, 0).single().unwrap()),
        }
    }

    #[test]
    fn test_recalled_attributed_to_creator() {
        let d = doc("Recalled");
        let actor = resolve_actor(StatusCode::parse(&d.status), &d, &[]);
        assert_eq!(actor, Some("creator".into()));
    }

    #[test]
    fn test_draft_attributed_to_creator() {
        let d = doc("");
        let actor = resolve_actor(StatusCode::parse(&d.status), &d, &[]);
        assert_eq!(actor, Some("creator".into()));
    }

    #[test]
    fn test_unknown_status_has_no_actor() {
        let d = doc("archived");
        assert_eq!(resolve_actor(StatusCode::parse(&d.status), &d, &[]), None);
    }

    #[test]
    fn test_pending_resolves_step_by_order() {
        let d = doc("PendingA3");
        let steps = vec![
            step(1, "a1", StepAction::Approved, Some(100)),
            step(2, "a2", StepAction::Approved, Some(200)),
            step(3, "a3", StepAction::Pending, None),
        ];
        let actor = resolve_actor(StatusCode::parse(&d.status), &d, &steps);
        assert_eq!(actor, Some("a3".into()));
    }

    #[test]
    fn test_pending_with_no_matching_step() {
        let d = doc("PendingA9");
        let steps = vec![step(1, "a1", StepAction::Pending, None)];
        assert_eq!(resolve_actor(StatusCode::parse(&d.status), &d, &steps), None);
    }

    #[test]
    fn test_rejected_picks_latest_acted() {
        let d = doc("Rejected");
        let steps = vec![
            step(1, "early", StepAction::Rejected, Some(100)),
            step(2, "late", StepAction::Rejected, Some(500)),
            step(3, "never", StepAction::Rejected, None),
        ];
        let actor = resolve_actor(StatusCode::parse(&d.status), &d, &steps);
        assert_eq!(actor, Some("late".into()));
    }

    #[test]
    fn test_tie_breaks_on_highest_order() {
        let d = doc("Approved");
        let steps = vec![
            step(1, "low", StepAction::Approved, Some(100)),
            step(2, "high", StepAction::Approved, Some(100)),
        ];
        let actor = resolve_actor(StatusCode::parse(&d.status), &d, &steps);
        assert_eq!(actor, Some("high".into()));
    }

    #[test]
    fn test_every_status_variant_resolves() {
        // The stored vocabulary is closed; every variant must route through
        // the actor policy without a catch-all.
        let d = doc("");
        let steps = vec![
            step(1, "acted", StepAction::Approved, Some(100)),
            step(1, "acted", StepAction::Rejected, Some(200)),
            step(1, "acted", StepAction::OnHold, Some(300)),
        ];
        for code in [
            StatusCode::Draft,
            StatusCode::Pending(1),
            StatusCode::Approved,
            StatusCode::Rejected,
            StatusCode::OnHold,
            StatusCode::Recalled,
        ] {
            assert!(resolve_actor(Some(code), &d, &steps).is_some(), "{code}");
        }
    }

    #[test]
    fn test_compose_with_template() {
        let catalog = MessageCatalog::builtin();
        let line = compose(&catalog, "en", Some(SummaryVerb::Approved), "Kim", "Lead");
        assert_eq!(line, "Kim Lead has approved the document");
    }

    #[test]
    fn test_compose_fallback_without_template() {
        let catalog = MessageCatalog::empty();
        assert_eq!(
            compose(&catalog, "en", Some(SummaryVerb::Approved), "Kim", "Lead"),
            "Kim Lead"
        );
        assert_eq!(
            compose(&catalog, "en", Some(SummaryVerb::Approved), "Kim", ""),
            "Kim"
        );
        assert_eq!(
            compose(&catalog, "en", Some(SummaryVerb::Approved), "", "Lead"),
            "Lead"
        );
    }

    #[test]
    fn test_compose_no_verb_uses_bare_parts() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(compose(&catalog, "en", None, "Kim", "Lead"), "Kim Lead");
    }

    #[test]
    fn test_compose_empty_actor_is_empty() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(compose(&catalog, "en", Some(SummaryVerb::Recalled), "", ""), "");
    }
}
