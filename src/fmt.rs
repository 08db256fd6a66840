/// Format an amount for console output: pound sign, thousands separators,
/// accounting-style parentheses for negatives: £1,234.56 / (£500.00)
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // Amounts that round to zero never show as negative.
    if val.is_sign_negative() && cents != "0.00" {
        format!("(\u{a3}{grouped}.{dec_part})")
    } else {
        format!("\u{a3}{grouped}.{dec_part}")
    }
}
