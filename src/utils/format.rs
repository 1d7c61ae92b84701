//! Number formatting for status output.

/// Formats a count with comma separators for thousands.
///
/// # Examples
///
/// ```
/// use space_audit_tools::utils::format::format_number;
///
/// assert_eq!(format_number(237), "237");
/// assert_eq!(format_number(12_500), "12,500");
/// ```
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
