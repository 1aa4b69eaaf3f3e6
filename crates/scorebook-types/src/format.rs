/// Overs per innings when the format label carries no usable number.
pub const DEFAULT_OVERS: u32 = 40;

/// Derive the overs limit from a free-text format label.
///
/// `"T20"` yields 20, a numeric prefix (`"35 overs"`) yields that number,
/// and anything else falls back to [`DEFAULT_OVERS`]. A leading `T` is
/// accepted on any number, so `"T10"` yields 10.
pub fn overs_from_label(label: &str) -> u32 {
    let trimmed = label.trim();
    let digits_from = trimmed
        .strip_prefix('T')
        .or_else(|| trimmed.strip_prefix('t'))
        .unwrap_or(trimmed);
    let digits: String = digits_from
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u32>() {
        Ok(overs) if overs > 0 => overs,
        _ => DEFAULT_OVERS,
    }
}
