//! # Naming Module
//!
//! Converts identifiers taken from an OpenAPI document (`operationId`s,
//! parameter names, property names, file stems) into the canonical
//! `lower_snake_case` form used for generated tool and parameter names.
//!
//! ## Word Boundaries
//!
//! A boundary is inserted:
//!
//! - between a letter and a digit, in either direction (`v2Items` → `v_2_items`)
//! - before an uppercase letter that follows a lowercase letter (`listItems` → `list_items`)
//! - before the last letter of an uppercase run that is followed by a lowercase
//!   letter, so acronyms stay whole (`getAPIKey` → `get_api_key`)
//! - at every character that is neither a letter nor an ASCII digit
//!   (`create-Widget/Item` → `create_widget_item`, `area²` → `area`)
//!
//! Empty segments are dropped, so an already canonical name comes back unchanged.

/// Separator placed between the words of a canonical name.
pub const SEPARATOR: char = '_';

/// Python keywords that cannot be used as function or parameter names.
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Names the generated module binds at module level or calls inside tool bodies.
const GENERATED_MODULE_NAMES: &[&str] = &["httpx", "quote", "str"];

/// Convert an identifier to its canonical `snake_case` form.
///
/// # Example
///
/// ```rust
/// use openapi_toolgen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("getAPIKey"), "get_api_key");
/// assert_eq!(to_snake_case("get_api_key"), "get_api_key");
/// ```
#[must_use]
pub fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        if !is_word_char(c) {
            flush_word(&mut words, &mut current);
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            if is_word_boundary(p, c, chars.get(i + 1).copied()) {
                flush_word(&mut words, &mut current);
            }
        }
        current.extend(c.to_lowercase());
        prev = Some(c);
    }
    flush_word(&mut words, &mut current);

    let mut out = String::with_capacity(ident.len() + words.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(word);
    }
    out
}

/// Letters and ASCII digits; other numerics such as `²` or `①` are not valid
/// in Python identifiers.
fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit()
}

fn is_word_boundary(prev: char, cur: char, next: Option<char>) -> bool {
    let digit_edge = (prev.is_alphabetic() && cur.is_ascii_digit())
        || (prev.is_ascii_digit() && cur.is_alphabetic());
    let lower_to_upper = prev.is_lowercase() && cur.is_uppercase();
    let acronym_end =
        prev.is_uppercase() && cur.is_uppercase() && next.is_some_and(char::is_lowercase);
    digit_edge || lower_to_upper || acronym_end
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Turn a canonical name into an identifier Python accepts.
///
/// Keywords, and names that would shadow what a generated module uses, get a
/// trailing `_`; names not starting with a letter get a leading `_`. Canonical names
/// never start or end with `_`, so distinct canonical names stay distinct.
#[must_use]
pub fn python_identifier(canonical: &str) -> String {
    if canonical.is_empty() {
        return "_".to_string();
    }
    if PYTHON_KEYWORDS.contains(&canonical) || GENERATED_MODULE_NAMES.contains(&canonical) {
        return format!("{canonical}_");
    }
    if !canonical.starts_with(char::is_alphabetic) {
        return format!("_{canonical}");
    }
    canonical.to_string()
}
