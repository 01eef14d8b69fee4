//! Virtual card generation.
//!
//! Cards are Luhn-valid 16-digit Visa-range PANs with a random CVV and a
//! three-year expiry. Nothing here talks to a card network; the PAN is
//! display data for the virtual-cards screen.

use chrono::{Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualCard {
    pub card_number: String,
    pub cvv: String,
    /// `MM/YY`.
    pub expiry_date: String,
    pub card_holder: String,
}

/// Luhn check digit for a partial PAN.
fn luhn_check_digit(digits: &[u8]) -> u8 {
    let mut sum = 0u32;
    // Rightmost digit of the partial number gets doubled (the check digit
    // will occupy the even position).
    for (i, &d) in digits.iter().rev().enumerate() {
        let mut d = u32::from(d);
        if i % 2 == 0 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    ((10 - (sum % 10)) % 10) as u8
}

pub fn generate(card_holder: &str) -> VirtualCard {
    let mut rng = rand::thread_rng();

    let mut digits = Vec::with_capacity(16);
    digits.push(4u8);
    for _ in 0..14 {
        digits.push(rng.gen_range(0..10));
    }
    digits.push(luhn_check_digit(&digits));

    let now = Utc::now();
    VirtualCard {
        card_number: digits.iter().map(|d| d.to_string()).collect(),
        cvv: format!("{}", rng.gen_range(100..1000)),
        expiry_date: format!("{:02}/{:02}", rng.gen_range(1..=12), (now.year() + 3) % 100),
        card_holder: card_holder.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luhn_valid(pan: &str) -> bool {
        let digits: Vec<u32> = pan.chars().filter_map(|c| c.to_digit(10)).collect();
        let sum: u32 = digits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &d)| {
                if i % 2 == 1 {
                    let doubled = d * 2;
                    if doubled > 9 {
                        doubled - 9
                    } else {
                        doubled
                    }
                } else {
                    d
                }
            })
            .sum();
        sum % 10 == 0
    }

    #[test]
    fn test_generated_cards_are_visa_range_and_luhn_valid() {
        for _ in 0..50 {
            let card = generate("Jean-Pierre Kabongo");
            assert_eq!(card.card_number.len(), 16);
            assert!(card.card_number.starts_with('4'));
            assert!(luhn_valid(&card.card_number));
        }
    }

    #[test]
    fn test_card_fields_shape() {
        let card = generate("Jean-Pierre Kabongo");
        assert_eq!(card.card_holder, "JEAN-PIERRE KABONGO");
        assert_eq!(card.cvv.len(), 3);
        assert_eq!(card.expiry_date.len(), 5);
        assert_eq!(card.expiry_date.as_bytes()[2], b'/');
    }
}
