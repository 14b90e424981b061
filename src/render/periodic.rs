//! Repeating decimals: `0.1(6)`.

use crate::error::RenderError;

/// Format `"<int>.<frac>"` with its last `repeat` fraction digits as the
/// repeating group: `("1.2345", 2)` gives `1{,}23(45)`.
///
/// `repeat` is bounded by the width of the fractional field counting its
/// separator, so for `"1.2345"` lengths up to 5 are accepted and 4 or 5 both
/// make every digit repeat. Wider lengths fail instead of being truncated.
pub fn format_periodic(decimal: &str, repeat: usize) -> Result<String, RenderError> {
    let (int_part, digits) = decimal.split_once('.').unwrap_or((decimal, ""));
    let count = digits.chars().count();
    let width = count + 1;

    if repeat > width {
        return Err(RenderError::InvalidPeriodicLength {
            length: repeat,
            width,
        });
    }

    let repeat = repeat.min(count);
    let split = digits
        .char_indices()
        .nth(count - repeat)
        .map_or(digits.len(), |(i, _)| i);
    let (prefix, suffix) = digits.split_at(split);

    Ok(format!("{}{{,}}{}({})", int_part, prefix, suffix))
}
