//! Employee name normalization

use regex::Regex;
use std::sync::LazyLock;

// Includes the ASCII separators U+001C..U+001F, which `str::trim` and `\s` skip
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x1C-\x1F]+").expect("whitespace pattern is valid"));

static NON_ASCII_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("non-ASCII pattern is valid"));

/// Normalize a free-text employee name into its canonical display form.
///
/// 1. Collapse every whitespace run (tabs, newlines, no-break spaces) into one space
/// 2. Delete every character outside 7-bit ASCII (no transliteration)
/// 3. Delete every comma
/// 4. Trim
///
/// Deleting characters in steps 2 and 3 can leave two spaces side by side,
/// so runs are collapsed once more before trimming. That keeps the function
/// idempotent.
///
/// Casing is preserved.
///
/// # Example
/// ```
/// use roster_publisher::roster::normalize_name;
///
/// assert_eq!(normalize_name("  Mary \t O'Brien, "), "Mary O'Brien");
/// assert_eq!(normalize_name("José, Smith"), "Jos Smith");
/// assert_eq!(normalize_name("   "), "");
/// ```
pub fn normalize_name(name: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(name, " ");
    let ascii = NON_ASCII_RUN.replace_all(&collapsed, "");
    let without_commas = ascii.replace(',', "");
    WHITESPACE_RUN
        .replace_all(&without_commas, " ")
        .trim()
        .to_string()
}
