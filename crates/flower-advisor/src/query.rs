//! Query normalization and context resolution.

use chrono::Datelike;

/// Suffix that turns a bare number into a month ("7" -> "7월").
pub const MONTH_SUFFIX: &str = "월";

/// Phrases that mean "just tell me what to plant now".
const NOW_SYNONYMS: &[&str] = &["지금"];
const WHAT_TO_PLANT: &str = "뭐심지";

/// Normalize raw user input into a query.
///
/// Input made of exactly one or two ASCII digits is read as a month.
pub fn normalize_query(raw: &str) -> String {
    let trimmed = raw.trim();
    let is_month_number =
        (1..=2).contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit());
    if is_month_number {
        format!("{trimmed}{MONTH_SUFFIX}")
    } else {
        trimmed.to_string()
    }
}

/// Whether the query carries no specific subject.
pub fn is_no_preference(query: &str) -> bool {
    let trimmed = query.trim();
    if trimmed.is_empty() || NOW_SYNONYMS.contains(&trimmed) {
        return true;
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains(WHAT_TO_PLANT)
}

/// Korean long month label, e.g. `11월`.
pub fn month_label(month: u32) -> String {
    format!("{month}{MONTH_SUFFIX}")
}

/// Current local calendar month (1-12).
pub fn current_month() -> u32 {
    chrono::Local::now().month()
}

/// Resolve the subject sent to the model.
pub fn resolve_context(query: &str, month: u32) -> String {
    if is_no_preference(query) {
        format!(
            "{}에 한국에서 심기 가장 좋은 인기 묘종 TOP 10",
            month_label(month)
        )
    } else {
        query.trim().to_string()
    }
}
