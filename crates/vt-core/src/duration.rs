//! Lenient time-string parsing.
//!
//! Hosts pass offsets as `"ss"`, `"mm:ss"` or `"hh:mm:ss"`. Parsing never
//! fails: a segment that is not a number counts as zero, a negative segment
//! counts as zero, and anything beyond the hours segment is ignored.

/// Convert a time string into a whole number of seconds.
///
/// Segments are read right to left as seconds, minutes, hours.
///
/// ```
/// use vt_core::parse_duration;
///
/// assert_eq!(parse_duration("1:01:05"), 3665);
/// assert_eq!(parse_duration("1:05"), 65);
/// assert_eq!(parse_duration("30"), 30);
/// assert_eq!(parse_duration(""), 0);
/// ```
pub fn parse_duration(time: &str) -> u64 {
    const WEIGHTS: [u64; 3] = [1, 60, 3600];

    time.rsplit(':')
        .zip(WEIGHTS)
        .map(|(segment, weight)| leading_int(segment).saturating_mul(weight))
        .fold(0u64, u64::saturating_add)
}

/// Read the leading integer of `segment`, treating anything unparsable or
/// negative as zero. `" 12abc"` reads as 12.
fn leading_int(segment: &str) -> u64 {
    let trimmed = segment.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 0;
    }

    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}
