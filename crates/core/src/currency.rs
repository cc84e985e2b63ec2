//! Rupee formatting with Indian digit grouping.
//!
//! The last three digits form one group and every two digits before that
//! form another: `1500000` renders as `₹15,00,000`. Amounts are rounded to
//! whole rupees.

pub const RUPEE_SIGN: &str = "₹";

/// Format an optional rupee amount; `None` renders as `₹0`.
pub fn format_rupees(value: Option<f64>) -> String {
    let amount = value.filter(|v| v.is_finite()).unwrap_or(0.0).round();
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{RUPEE_SIGN}{}", group_indian(amount.abs() as u64))
}

/// Insert Indian-style thousands separators into a whole number.
pub fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
