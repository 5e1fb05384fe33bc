// ABOUTME: Cleanup helpers for raw generative-model text before JSON decoding
// ABOUTME: Removes markdown code fences and isolates the JSON payload from surrounding prose
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Meal Lens Contributors

/// Strip a surrounding markdown code fence (```` ```json ```` or ```` ``` ````)
/// and trim whitespace. Text without a fence is only trimmed.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Slice between the first `open` and the last `close` delimiter, inclusive
#[must_use]
pub fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
