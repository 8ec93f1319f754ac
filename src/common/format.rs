/// Format a numeric value as a thousands-grouped integer, e.g. `1234567.8 -> "1,234,567"`.
pub(crate) fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{}", value.abs().round() as u64);

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative { format!("-{out}") } else { out }
}
