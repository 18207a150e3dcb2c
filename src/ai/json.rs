//! JSON extraction for model output
//!
//! Chat models asked for JSON still wrap it in code fences, add trailing
//! commas or surround it with prose. This module recovers the object.

use serde_json::Value;
use tracing::debug;

use crate::types::{RepolyzeError, Result};

/// Extract and parse the first JSON value from a model response
pub fn extract_json(raw: &str) -> Result<Value> {
    let cleaned = strip_code_fences(raw.trim().trim_start_matches('\u{feff}'));

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Ok(value);
    }

    debug!("Direct JSON parse failed, attempting repair");

    let repaired = fix_trailing_commas(&cleaned);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        return Ok(value);
    }

    if let Some(embedded) = extract_embedded_object(&repaired)
        && let Ok(value) = serde_json::from_str::<Value>(&embedded)
    {
        return Ok(value);
    }

    Err(RepolyzeError::upstream(
        "llm",
        format!(
            "Response is not valid JSON. Content preview: {}...",
            cleaned.chars().take(200).collect::<String>()
        ),
    ))
}

fn strip_code_fences(s: &str) -> String {
    let mut result = s.to_string();

    if result.starts_with("```")
        && let Some(first_newline) = result.find('\n')
    {
        result = result[first_newline + 1..].to_string();
    }

    if result.ends_with("```") {
        result = result[..result.len() - 3].trim_end().to_string();
    }

    result.trim().to_string()
}

/// Drop commas directly followed (modulo whitespace) by `]` or `}`
fn fix_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escape = false;

    for (i, &ch) in chars.iter().enumerate() {
        if escape {
            escape = false;
            result.push(ch);
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            ',' if !in_string => {
                let next = chars[i + 1..].iter().copied().find(|c| !c.is_whitespace());
                if matches!(next, Some(']' | '}')) {
                    continue;
                }
            }
            _ => {}
        }
        result.push(ch);
    }

    result
}

/// Find the first balanced `{...}` in mixed prose
fn extract_embedded_object(s: &str) -> Option<String> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(s[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
