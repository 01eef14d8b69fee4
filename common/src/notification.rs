//! User-facing notifications, generated as a side effect of settlement.

use serde::{Deserialize, Serialize};

use crate::currency::format_fc;
use crate::transaction::{Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub date: String,
}

/// The active notification set, newest first. Entries live until the user
/// clears them; there is no automatic expiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Synchronous observer called once per settled transaction. Builds a
    /// success notification from the transaction's kind, amount, and
    /// counterparty and inserts it at the head, unread.
    pub fn on_transaction_settled(&mut self, tx: &Transaction) {
        let (title, message) = settlement_text(tx);
        self.next_id += 1;
        self.items.insert(
            0,
            Notification {
                id: format!("notif_{:03}", self.next_id),
                title,
                message,
                kind: NotificationKind::Success,
                read: false,
                date: "À l'instant".to_string(),
            },
        );
    }

    /// Mark one notification read. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn settlement_text(tx: &Transaction) -> (String, String) {
    let amount = format_fc(tx.amount);
    match tx.kind {
        TransactionKind::Sent => (
            "Transfert réussi".to_string(),
            format!("Vous avez envoyé {amount} à {}", tx.recipient),
        ),
        TransactionKind::Received => (
            "Argent reçu".to_string(),
            format!("Vous avez reçu {amount} de {}", tx.recipient),
        ),
        TransactionKind::CashIn => (
            "Dépôt réussi".to_string(),
            format!("Votre compte a été rechargé de {amount}"),
        ),
        TransactionKind::CashOut => (
            "Retrait réussi".to_string(),
            format!("Vous avez retiré {amount} chez {}", tx.recipient),
        ),
        TransactionKind::Bill => (
            "Facture payée".to_string(),
            format!("Vous avez payé {amount} à {}", tx.recipient),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;
    use crate::transaction::TransactionStatus;
    use chrono::Utc;

    fn sent_tx() -> Transaction {
        Transaction {
            id: "txn_001".into(),
            kind: TransactionKind::Sent,
            recipient: "Sarah Mbuyi".into(),
            recipient_phone: Some("0891234567".into()),
            network: Network::Orange,
            amount: 15000,
            fee: 225,
            status: TransactionStatus::Completed,
            date: "À l'instant".into(),
            timestamp: Utc::now(),
            transaction_ref: "KTN-2026-000001".into(),
        }
    }

    #[test]
    fn test_settlement_emits_unread_success_at_head() {
        let mut notifications = Notifications::new();
        notifications.on_transaction_settled(&sent_tx());
        let mut second = sent_tx();
        second.recipient = "Jean Kabongo".into();
        notifications.on_transaction_settled(&second);

        let items = notifications.items();
        assert_eq!(items.len(), 2);
        assert!(items[0].message.contains("Jean Kabongo"));
        assert_eq!(items[0].kind, NotificationKind::Success);
        assert!(!items[0].read);
        assert_eq!(notifications.unread_count(), 2);
    }

    #[test]
    fn test_transfer_message_template() {
        let mut notifications = Notifications::new();
        notifications.on_transaction_settled(&sent_tx());
        let n = &notifications.items()[0];
        assert_eq!(n.title, "Transfert réussi");
        assert_eq!(n.message, "Vous avez envoyé 15 000 FC à Sarah Mbuyi");
    }

    #[test]
    fn test_mark_read_and_clear() {
        let mut notifications = Notifications::new();
        notifications.on_transaction_settled(&sent_tx());
        let id = notifications.items()[0].id.clone();

        assert!(notifications.mark_read(&id));
        assert_eq!(notifications.unread_count(), 0);
        assert!(!notifications.mark_read("notif_999"));

        notifications.clear();
        assert!(notifications.items().is_empty());
    }
}
