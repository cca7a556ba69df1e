//! Common utility functions for lens modules
//!
//! Lenient value coercion used when operator-supplied strings have to be
//! turned into typed values.

/// Interpret a string as a boolean
///
/// Empty strings and the usual negative words (`0`, `false`, `no`, `off`,
/// `nein`, `disabled`) are false, case-insensitively. Everything else is true.
pub fn parse_boolean(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    !matches!(
        s.as_str(),
        "" | "0" | "false" | "no" | "off" | "nein" | "disabled"
    )
}

/// Interpret a string as an integer
///
/// Reads an optional sign followed by leading digits and ignores anything
/// after them, so `"42abc"` is 42. A string without leading digits is 0, and
/// so is a value too large for an `i64`.
pub fn parse_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: i64 = digits.parse().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}
