//! Amount formatting for the Congolese Franc.
//!
//! All amounts are stored as `u64` in the smallest unit (FC). Display
//! formatting groups thousands with a space, matching the fr-CD locale
//! convention ("450 000 FC").

/// Format an FC amount with fr-CD thousands grouping, without the unit.
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format an FC amount for display, e.g. `15 000 FC`.
pub fn format_fc(amount: u64) -> String {
    format!("{} FC", group_thousands(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts_ungrouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(group_thousands(1000), "1 000");
        assert_eq!(group_thousands(15000), "15 000");
        assert_eq!(group_thousands(450000), "450 000");
        assert_eq!(group_thousands(2450000000), "2 450 000 000");
    }

    #[test]
    fn test_format_fc() {
        assert_eq!(format_fc(15225), "15 225 FC");
    }
}
