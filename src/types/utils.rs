//! Shared helpers for error filtering and text shaping.

use std::fmt::Display;

use crate::constants::llm::TRUNCATION_MARKER;

// =============================================================================
// Error Filtering
// =============================================================================

/// Turn a failed result into `None`, logging at warn level.
pub fn log_filter_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}

// =============================================================================
// Truncation
// =============================================================================

/// Cut `content` to at most `max_chars` characters.
///
/// Breaks at the last line boundary inside the budget when there is one and
/// appends a marker so the model knows the code is incomplete. A budget of
/// zero disables truncation.
pub fn truncate_code(content: &str, max_chars: usize) -> String {
    if max_chars == 0 || content.chars().count() <= max_chars {
        return content.to_string();
    }

    let cut = content
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(content.len());
    let head = &content[..cut];

    let head = match head.rfind('\n') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head,
    };

    format!("{}{}", head, TRUNCATION_MARKER)
}

/// First `max_chars` characters of `content`, with an ellipsis if cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
