//! General-purpose string helpers shared across Vize crates.

/// Uppercase the first character of `s`, leaving the rest untouched.
#[inline]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `s` is a plain JavaScript identifier (`[A-Za-z_$][A-Za-z0-9_$]*`).
#[inline]
pub fn is_simple_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

/// Whether `s` is a dotted member path such as `user.name` or `a.b.c`.
#[inline]
pub fn is_member_path(s: &str) -> bool {
    s.contains('.') && s.split('.').all(is_simple_identifier)
}

/// Strip separators and whitespace around a run of leading trivia,
/// keeping only comment text.
///
/// Trivia sliced between two declarations often starts with the `,` or `;`
/// that terminated the previous one.
pub fn comment_trivia(raw: &str) -> &str {
    raw.trim_start_matches(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .trim_end()
}
