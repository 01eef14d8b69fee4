//! Static agent and merchant reference data.
//!
//! The directory is a lookup, not a live registry: records resolve
//! counterparties for cash-in/cash-out and merchant payments and feed the
//! locator screens. Coordinates cluster around the Kinshasa communes the
//! agents sit in.

use serde::{Deserialize, Serialize};

use crate::location::GeoPoint;
use crate::network::Network;
use crate::workflow::Counterparty;

/// A physical cash agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub network: Network,
    pub address: String,
    pub is_open: bool,
    pub hours: String,
    pub phone: String,
    pub position: GeoPoint,
}

impl AgentRecord {
    pub fn counterparty(&self) -> Counterparty {
        Counterparty::Agent {
            id: self.id.clone(),
            name: self.name.clone(),
            network: self.network,
        }
    }
}

/// A merchant accepting QR payments on the platform rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub rating: f64,
    pub position: GeoPoint,
}

impl MerchantRecord {
    pub fn counterparty(&self) -> Counterparty {
        Counterparty::Merchant {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// The static lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    agents: Vec<AgentRecord>,
    merchants: Vec<MerchantRecord>,
}

impl Directory {
    pub fn new(agents: Vec<AgentRecord>, merchants: Vec<MerchantRecord>) -> Self {
        Self { agents, merchants }
    }

    /// The Kinshasa reference data from the prototype.
    pub fn kinshasa() -> Self {
        Self::new(kinshasa_agents(), kinshasa_merchants())
    }

    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn merchants(&self) -> &[MerchantRecord] {
        &self.merchants
    }

    pub fn agent(&self, id: &str) -> Option<&AgentRecord> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn merchant(&self, id: &str) -> Option<&MerchantRecord> {
        self.merchants.iter().find(|m| m.id == id)
    }

    /// Agents sorted nearest-first from the caller's position.
    pub fn agents_near(&self, from: GeoPoint) -> Vec<&AgentRecord> {
        let mut agents: Vec<&AgentRecord> = self.agents.iter().collect();
        agents.sort_by(|a, b| {
            from.distance_km(&a.position)
                .total_cmp(&from.distance_km(&b.position))
        });
        agents
    }
}

fn agent(
    id: &str,
    name: &str,
    network: Network,
    address: &str,
    is_open: bool,
    hours: &str,
    phone: &str,
    lat: f64,
    lng: f64,
) -> AgentRecord {
    AgentRecord {
        id: id.to_string(),
        name: name.to_string(),
        network,
        address: address.to_string(),
        is_open,
        hours: hours.to_string(),
        phone: phone.to_string(),
        position: GeoPoint::new(lat, lng),
    }
}

fn kinshasa_agents() -> Vec<AgentRecord> {
    vec![
        agent(
            "1",
            "Agent Orange – Gombe",
            Network::Orange,
            "Avenue du Commerce, Gombe",
            true,
            "8h - 18h",
            "+243 999 000 111",
            -4.3030,
            15.3000,
        ),
        agent(
            "2",
            "Agent Airtel – Bandal",
            Network::Airtel,
            "Boulevard Lumumba, Bandal",
            false,
            "9h - 17h",
            "+243 999 000 222",
            -4.3510,
            15.2780,
        ),
        agent(
            "3",
            "Agent Vodacom – Limete",
            Network::Vodacom,
            "Avenue des Poids Lourds, Limete",
            true,
            "7h - 20h",
            "+243 999 000 333",
            -4.3620,
            15.3460,
        ),
        agent(
            "4",
            "Agent Orange – Matonge",
            Network::Orange,
            "Rue Kabinda, Matonge",
            true,
            "8h - 19h",
            "+243 999 000 444",
            -4.3380,
            15.3110,
        ),
    ]
}

fn merchant(
    id: &str,
    name: &str,
    category: &str,
    address: &str,
    rating: f64,
    lat: f64,
    lng: f64,
) -> MerchantRecord {
    MerchantRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        address: address.to_string(),
        rating,
        position: GeoPoint::new(lat, lng),
    }
}

fn kinshasa_merchants() -> Vec<MerchantRecord> {
    vec![
        merchant(
            "MRCH-001234",
            "Shoprite Gombe",
            "Supermarché",
            "Boulevard du 30 Juin, Gombe",
            4.5,
            -4.3050,
            15.2980,
        ),
        merchant(
            "MRCH-001235",
            "Pharmacie Centrale",
            "Pharmacie",
            "Avenue Kasa-Vubu, Barumbu",
            4.8,
            -4.3180,
            15.3050,
        ),
        merchant(
            "MRCH-001236",
            "Restaurant Le Flamboyant",
            "Restaurant",
            "Rue des Boulangeries, Gombe",
            4.3,
            -4.3070,
            15.2930,
        ),
        merchant(
            "MRCH-001237",
            "Station Total Limete",
            "Station-service",
            "Avenue des Poids Lourds, Limete",
            4.1,
            -4.3640,
            15.3420,
        ),
        merchant(
            "MRCH-001238",
            "Boutique Mode Africaine",
            "Mode",
            "Avenue de la Victoire, Matonge",
            4.6,
            -4.3400,
            15.3090,
        ),
        merchant(
            "MRCH-001239",
            "Électronique Plus",
            "Électronique",
            "Boulevard Lumumba, Bandal",
            4.2,
            -4.3530,
            15.2800,
        ),
        merchant(
            "MRCH-001240",
            "Boulangerie Le Pain Doré",
            "Boulangerie",
            "Rue Mongala, Lingwala",
            4.7,
            -4.3250,
            15.2890,
        ),
        merchant(
            "MRCH-001241",
            "Librairie Papeterie Moderne",
            "Librairie",
            "Avenue du Tchad, Gombe",
            4.4,
            -4.3090,
            15.2950,
        ),
    ]
}
