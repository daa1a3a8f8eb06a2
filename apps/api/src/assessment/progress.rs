//! Progress tracking over an assessment's recommendation checklist.
//!
//! `toggle` is the only mutator of `completed_items` and is idempotent
//! in both directions; a (category, item) pair is either absent or
//! completed, nothing in between. Percentage is a derived read-only
//! value, never stored.

use chrono::Utc;

use crate::models::assessment::{AssessmentResult, CompletedItem};

/// Applies one toggle to the completed-items list. Returns whether the
/// list changed, so callers can skip the write on a no-op.
pub fn toggle(
    items: &mut Vec<CompletedItem>,
    category: &str,
    item: &str,
    completed: bool,
) -> bool {
    let position = items
        .iter()
        .position(|ci| ci.category == category && ci.item == item);

    match (completed, position) {
        (true, None) => {
            items.push(CompletedItem {
                category: category.to_string(),
                item: item.to_string(),
                completed_at: Utc::now(),
            });
            true
        }
        (false, Some(index)) => {
            items.remove(index);
            true
        }
        // Already in the requested state.
        (true, Some(_)) | (false, None) => false,
    }
}

/// Completion percentage: round(100 * completed / total), where total
/// sums the lengths of all five result arrays. Defined as 0 when the
/// result has no items at all.
pub fn completion_percentage(result: &AssessmentResult, items: &[CompletedItem]) -> u32 {
    let total = result.total_item_count();
    if total == 0 {
        return 0;
    }
    (100.0 * items.len() as f64 / total as f64).round() as u32
}
