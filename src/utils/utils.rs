/// Formats `value` with `digits` decimals, rounding exact ties away from zero.
/// (`0.25` -> `"0.3"`). Exact ties are found on the full decimal expansion
/// and nudged to the next representable float before formatting.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    let rounded = if is_exact_tie(magnitude, digits) {
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    };
    let formatted = format!("{:.*}", digits, rounded);

    if value < 0.0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

fn is_exact_tie(magnitude: f64, digits: usize) -> bool {
    // f64 spacing keeps any non-tie value well away from a run of 30 zeros
    let expanded = format!("{:.*}", digits + 30, magnitude);
    let Some(dot) = expanded.find('.') else {
        return false;
    };
    let tail = &expanded[dot + 1 + digits..];
    let mut chars = tail.chars();
    chars.next() == Some('5') && chars.all(|c| c == '0')
}

/// Replaces every run of whitespace with a single `replacement` char.
pub fn collapse_whitespace(text: &str, replacement: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(replacement);
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
