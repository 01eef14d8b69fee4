//! Demo session fixtures: the seeded balance and transaction history the
//! prototype boots with. Kept out of the core types so a real deployment
//! can start from an empty ledger.

use chrono::{Duration, Utc};

use crate::ledger::Ledger;
use crate::network::Network;
use crate::transaction::{Transaction, TransactionKind, TransactionStatus};
use crate::wallet::WalletService;

/// Opening balance of the demo account, in FC.
pub const SEED_BALANCE: u64 = 450_000;

/// Receipt sequence continues from the last seeded reference.
const NEXT_SEQ: u64 = 1_235;

/// A wallet service pre-loaded with the demo history.
pub fn demo_wallet() -> WalletService {
    WalletService::with_ledger(SEED_BALANCE, seed_ledger())
}

/// The twelve-entry demo history, newest first.
pub fn seed_ledger() -> Ledger {
    let entries = seed_transactions();
    Ledger::from_entries(entries, NEXT_SEQ)
}

#[allow(clippy::too_many_arguments)]
fn seed(
    seq: u64,
    kind: TransactionKind,
    recipient: &str,
    phone: Option<&str>,
    network: Network,
    amount: u64,
    fee: u64,
    status: TransactionStatus,
    date: &str,
    hours_ago: i64,
) -> Transaction {
    Transaction {
        id: format!("txn_{:03}", 1_235 - seq),
        kind,
        recipient: recipient.to_string(),
        recipient_phone: phone.map(str::to_string),
        network,
        amount,
        fee,
        status,
        date: date.to_string(),
        timestamp: Utc::now() - Duration::hours(hours_ago),
        transaction_ref: format!("KTN-2024-{seq:06}"),
    }
}

fn seed_transactions() -> Vec<Transaction> {
    vec![
        seed(
            1_234,
            TransactionKind::Sent,
            "Sarah Mbuyi",
            Some("0891234567"),
            Network::Orange,
            15_000,
            150,
            TransactionStatus::Completed,
            "Aujourd'hui, 14:30",
            2,
        ),
        seed(
            1_233,
            TransactionKind::Received,
            "Jean Kabongo",
            Some("0897654321"),
            Network::Airtel,
            20_000,
            0,
            TransactionStatus::Completed,
            "Aujourd'hui, 10:15",
            6,
        ),
        seed(
            1_232,
            TransactionKind::CashIn,
            "Agent Gombe Central",
            None,
            Network::Vodacom,
            50_000,
            0,
            TransactionStatus::Completed,
            "Hier, 16:45",
            24,
        ),
        seed(
            1_231,
            TransactionKind::Sent,
            "Marie Lukusa",
            Some("0812345678"),
            Network::Ketney,
            8_000,
            0,
            TransactionStatus::Completed,
            "Hier, 09:20",
            30,
        ),
        seed(
            1_230,
            TransactionKind::Received,
            "Papa Kabongo",
            Some("0898765432"),
            Network::Orange,
            100_000,
            0,
            TransactionStatus::Completed,
            "20 Jan, 18:00",
            48,
        ),
        seed(
            1_229,
            TransactionKind::CashOut,
            "Agent Bandal Market",
            None,
            Network::Vodacom,
            30_000,
            300,
            TransactionStatus::Completed,
            "19 Jan, 14:30",
            72,
        ),
        seed(
            1_228,
            TransactionKind::Bill,
            "SNEL Électricité",
            None,
            Network::Ketney,
            25_000,
            250,
            TransactionStatus::Completed,
            "18 Jan, 11:00",
            96,
        ),
        seed(
            1_227,
            TransactionKind::Sent,
            "Patrick Mutombo",
            Some("0823456789"),
            Network::Airtel,
            5_000,
            50,
            TransactionStatus::Pending,
            "17 Jan, 15:45",
            120,
        ),
        seed(
            1_226,
            TransactionKind::Received,
            "Mama Thérèse",
            Some("0834567890"),
            Network::Ketney,
            75_000,
            0,
            TransactionStatus::Completed,
            "16 Jan, 09:30",
            144,
        ),
        seed(
            1_225,
            TransactionKind::Sent,
            "Eric Tshisekedi",
            Some("0845678901"),
            Network::Orange,
            12_000,
            120,
            TransactionStatus::Completed,
            "15 Jan, 20:15",
            168,
        ),
        seed(
            1_224,
            TransactionKind::CashIn,
            "Agent Masina",
            None,
            Network::Orange,
            200_000,
            0,
            TransactionStatus::Completed,
            "14 Jan, 08:00",
            192,
        ),
        seed(
            1_223,
            TransactionKind::Bill,
            "Canal+ Abonnement",
            None,
            Network::Ketney,
            15_000,
            0,
            TransactionStatus::Failed,
            "13 Jan, 14:20",
            216,
        ),
    ]
}
