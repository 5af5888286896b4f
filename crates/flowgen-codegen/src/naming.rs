// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Identifier and casing utilities for generated Python code.
//!
//! Every function here is total: given any Unicode input (empty strings,
//! digit-leading strings, symbol soup, reserved words) it returns a
//! syntactically valid Python identifier. Applying a function twice is
//! equivalent to applying it once.

/// Python reserved words. Identifiers colliding with these get a trailing
/// underscore.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Returns true if `s` matches the Python identifier grammar and is not a
/// reserved word.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let valid_shape = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    valid_shape && !PYTHON_KEYWORDS.contains(&s)
}

/// Convert an arbitrary string into a valid snake_case member identifier.
///
/// Policy:
/// - non-alphanumeric runs become single underscores, camelCase boundaries
///   become underscores, and everything is lowercased
/// - leading/trailing underscores are stripped before the safety checks
/// - if the result starts with a digit, `fallback_prefix` is prepended
/// - reserved words get a trailing underscore
/// - empty results map to `fallback_prefix` with trailing separators removed
pub fn to_valid_identifier(raw: &str, fallback_prefix: &str) -> String {
    let mut name = to_snake_case(raw);

    if name.is_empty() {
        name = fallback_prefix.trim_end_matches('_').to_string();
        if name.is_empty() {
            name = "value".to_string();
        }
        return name;
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("{}{}", fallback_prefix, name);
    }

    if PYTHON_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    name
}

/// Convert an arbitrary string into a valid PascalCase class name.
///
/// Empty input maps to `"Class"`; digit-leading results are prefixed with
/// `"Class"`; reserved words (`none` → `None`, etc.) get a trailing
/// underscore.
pub fn to_class_name(raw: &str) -> String {
    let words = split_words(raw);
    if words.is_empty() {
        return "Class".to_string();
    }

    let mut name = String::new();
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("Class{}", name);
    }

    if PYTHON_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    name
}

/// Convert an arbitrary string into a valid snake_case module path segment.
pub fn to_module_segment(raw: &str) -> String {
    to_valid_identifier(raw, "module_")
}

/// Lowercase snake_case form of `raw`, with camelCase boundaries split and
/// non-alphanumeric runs collapsed. May be empty.
fn to_snake_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_lower_or_digit = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower_or_digit {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }

    out.trim_matches('_').to_string()
}

/// Split `raw` into alphanumeric words on symbol and camelCase boundaries.
fn split_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower_or_digit && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // Tests for to_valid_identifier
    // ==========================================

    #[test]
    fn test_identifier_basic() {
        assert_eq!(to_valid_identifier("My Input!", "input_"), "my_input");
        assert_eq!(to_valid_identifier("camelCaseKey", "input_"), "camel_case_key");
        assert_eq!(to_valid_identifier("already_valid", "input_"), "already_valid");
    }

    #[test]
    fn test_identifier_digit_leading() {
        assert_eq!(to_valid_identifier("9 lives", "input_"), "input_9_lives");
    }

    #[test]
    fn test_identifier_symbols_only() {
        assert_eq!(to_valid_identifier("!!!", "input_"), "input");
        assert_eq!(to_valid_identifier("", "port_"), "port");
    }

    #[test]
    fn test_identifier_reserved_word() {
        assert_eq!(to_valid_identifier("class", "input_"), "class_");
        assert_eq!(to_valid_identifier("lambda", "input_"), "lambda_");
    }

    #[test]
    fn test_identifier_unicode_stripped() {
        assert_eq!(to_valid_identifier("héllo wörld", "input_"), "h_llo_w_rld");
    }

    #[test]
    fn test_identifier_idempotent() {
        for raw in ["My Input!", "9 lives", "class", "", "!!!", "camelCase", "a_b_c"] {
            let once = to_valid_identifier(raw, "input_");
            let twice = to_valid_identifier(&once, "input_");
            assert_eq!(once, twice, "not idempotent for {:?}", raw);
            assert!(is_valid_identifier(&once), "invalid output for {:?}: {}", raw, once);
        }
    }

    // ==========================================
    // Tests for to_class_name
    // ==========================================

    #[test]
    fn test_class_name_basic() {
        assert_eq!(to_class_name("my prompt node"), "MyPromptNode");
        assert_eq!(to_class_name("Extract-Entities!"), "ExtractEntities");
    }

    #[test]
    fn test_class_name_empty() {
        assert_eq!(to_class_name(""), "Class");
        assert_eq!(to_class_name("???"), "Class");
    }

    #[test]
    fn test_class_name_digit_leading() {
        assert_eq!(to_class_name("2nd step"), "Class2ndStep");
    }

    #[test]
    fn test_class_name_reserved_word() {
        // PascalCasing a lowercase label can land exactly on a capitalized
        // keyword; `class None:` is a syntax error.
        assert_eq!(to_class_name("none"), "None_");
        assert_eq!(to_class_name("true"), "True_");
        assert_eq!(to_class_name("false"), "False_");
        assert!(is_valid_identifier(&to_class_name("none")));
    }

    #[test]
    fn test_class_name_idempotent() {
        for raw in ["my node", "MyNode", "2nd step", "", "API Caller", "none", "true", "false"] {
            let once = to_class_name(raw);
            assert_eq!(once, to_class_name(&once), "not idempotent for {:?}", raw);
            assert!(!PYTHON_KEYWORDS.contains(&once.as_str()), "keyword output for {:?}", raw);
        }
    }

    // ==========================================
    // Tests for to_module_segment
    // ==========================================

    #[test]
    fn test_module_segment() {
        assert_eq!(to_module_segment("MyPromptNode"), "my_prompt_node");
        assert_eq!(to_module_segment(""), "module");
        assert_eq!(to_module_segment("import"), "import_");
    }

    // ==========================================
    // Tests for is_valid_identifier
    // ==========================================

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("my_input"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("class_"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("9lives"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("has space"));
    }
}
