/// Formats a count with comma thousands separators
///
/// # Examples
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(&n.to_string())
}

/// Signed integer variant of [`format_number`]
pub fn format_count(n: i64) -> String {
    if n < 0 {
        format!("-{}", group_digits(&n.unsigned_abs().to_string()))
    } else {
        group_digits(&n.to_string())
    }
}

/// Yen amount rounded to whole units, e.g. `¥1,234,568`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        format!("¥-{}", group_digits(&format!("{:.0}", -rounded)))
    } else {
        format!("¥{}", group_digits(&format!("{:.0}", rounded)))
    }
}

/// Percentage with one decimal, e.g. `24.3%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Plain number with one decimal and separators, e.g. `1,234.5`
pub fn format_decimal(value: f64) -> String {
    let text = format!("{:.1}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let sign = if value < 0.0 && text != "0.0" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(int_part), frac_part)
}

fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
