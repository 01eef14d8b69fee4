use std::fmt;

use serde::{Deserialize, Serialize};

/// Mobile-money rails a transaction can target. `Ketney` is the platform's
/// own rail; the other three are external operators reached through
/// inter-network clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Airtel,
    Orange,
    Vodacom,
    Ketney,
}

impl Network {
    pub fn all() -> &'static [Network] {
        &[
            Network::Airtel,
            Network::Orange,
            Network::Vodacom,
            Network::Ketney,
        ]
    }

    /// Marketing name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Airtel => "Airtel Money",
            Network::Orange => "Orange Money",
            Network::Vodacom => "Vodacom M-Pesa",
            Network::Ketney => "Ketney",
        }
    }

    /// True for the platform's own rail (intra-platform transfers are free).
    pub fn is_platform_rail(&self) -> bool {
        matches!(self, Network::Ketney)
    }

    /// Transfer fee in basis points for sends targeting this rail.
    pub fn transfer_bps(&self) -> u64 {
        match self {
            Network::Ketney => 0,
            // External operators all charge 1%.
            Network::Airtel | Network::Orange | Network::Vodacom => 100,
        }
    }

    /// Inter-network clearing fee in basis points, charged only when the
    /// destination rail differs from the platform's own.
    pub fn clearing_bps(&self) -> u64 {
        match self {
            Network::Ketney => 0,
            Network::Airtel | Network::Orange | Network::Vodacom => 50,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Airtel => write!(f, "Airtel"),
            Network::Orange => write!(f, "Orange"),
            Network::Vodacom => write!(f, "Vodacom"),
            Network::Ketney => write!(f, "Ketney"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_rail_is_free() {
        assert_eq!(Network::Ketney.transfer_bps(), 0);
        assert_eq!(Network::Ketney.clearing_bps(), 0);
        assert!(Network::Ketney.is_platform_rail());
    }

    #[test]
    fn test_external_rails_charge_both_fees() {
        for network in [Network::Airtel, Network::Orange, Network::Vodacom] {
            assert_eq!(network.transfer_bps(), 100);
            assert_eq!(network.clearing_bps(), 50);
            assert!(!network.is_platform_rail());
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Network::Orange).unwrap(), "\"orange\"");
        assert_eq!(
            serde_json::from_str::<Network>("\"ketney\"").unwrap(),
            Network::Ketney
        );
    }
}
