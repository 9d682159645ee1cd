//! Completion policy over a [`SlotRecord`].

use super::{SlotField, SlotRecord, StartDate};
use serde::Serialize;

/// Maximum number of required fields that may still be missing when the
/// core fields are present.
pub const MAX_MISSING_REQUIRED: usize = 2;

/// Derived completion state of a trip request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionStatus {
    /// Required fields that are currently empty, in canonical order.
    pub missing_required: Vec<SlotField>,
    /// City, days, budget and people are all filled.
    pub core_complete: bool,
    /// Enough is known to proceed to recommendations.
    pub ready: bool,
    /// A start date was given, or the user said they have not decided.
    pub start_date_settled: bool,
}

/// Evaluate how complete a trip request is.
///
/// `ready` requires the core fields and tolerates up to
/// [`MAX_MISSING_REQUIRED`] other required fields being empty.
pub fn evaluate(record: &SlotRecord) -> CompletionStatus {
    let missing_required: Vec<SlotField> = SlotField::REQUIRED
        .iter()
        .copied()
        .filter(|field| !record.is_filled(*field))
        .collect();

    let core_complete = SlotField::CORE.iter().all(|field| record.is_filled(*field));
    let ready = core_complete && missing_required.len() <= MAX_MISSING_REQUIRED;

    let start_date_settled = !matches!(record.start_date(), StartDate::Unspecified);

    CompletionStatus {
        missing_required,
        core_complete,
        ready,
        start_date_settled,
    }
}
