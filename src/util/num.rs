/// Returns `true` if `text` reads as a base-10 integer.
///
/// An optional leading sign is accepted, followed by at least one ASCII
/// digit. The tokenizer splits `+` and `-` off, so words coming from source
/// text never carry a sign; literal values built by hand may.
///
/// ## Example
/// ```
/// use arbor::util::num::is_integer_literal;
///
/// assert!(is_integer_literal("42"));
/// assert!(is_integer_literal("-7"));
/// assert!(!is_integer_literal("4x"));
/// assert!(!is_integer_literal("-"));
/// ```
#[must_use]
pub fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an integer literal into an `i64`.
///
/// ## Errors
/// Returns `Err(error)` if the text is not an integer literal or does not fit
/// into 64 bits.
///
/// ## Parameters
/// - `text`: The literal text.
/// - `error`: The error to return if the conversion fails.
///
/// ## Example
/// ```
/// use arbor::util::num::parse_integer_literal;
///
/// assert_eq!(parse_integer_literal("181", "bad"), Ok(181));
/// assert_eq!(parse_integer_literal("99999999999999999999", "bad"), Err("bad"));
/// ```
pub fn parse_integer_literal<E>(text: &str, error: E) -> Result<i64, E> {
    if !is_integer_literal(text) {
        return Err(error);
    }
    text.parse().map_err(|_| error)
}
