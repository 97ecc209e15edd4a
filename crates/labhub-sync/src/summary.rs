//! Canned insight text for references.

/// Produce the demo summary block for a reference title.
///
/// A deterministic template substitution with no side effects; it stands
/// in for a real inference call and is not part of the synchronization
/// core. Callers write the result into the draft's `ai_summary` field.
pub fn draft_summary(title: &str) -> String {
    format!(
        "AI Generated Summary for \"{title}\":\nThis paper investigates the primary variable using a mixed-methods approach. Key findings suggest a significant correlation between X and Y. The methodology relies heavily on recent advancements in the field."
    )
}
