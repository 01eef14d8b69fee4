//! Seams for the external collaborators the wallet core consumes.
//!
//! Each trait is a narrow surface over a networked service: step-up
//! verification, identity (KYC) checks, and the exchange-rate feed. The
//! gateway wires in mock implementations; a production deployment swaps
//! them for real clients without touching the core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure of an external verification or feed call. All of these are
/// user-retryable at the step that triggered the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceError {
    Unavailable(String),
    TimedOut,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "service unavailable: {msg}"),
            Self::TimedOut => write!(f, "verification timed out"),
        }
    }
}

/// Step-up (MFA) verification: PIN plus biometric confirmation, required
/// for high-value transactions.
#[allow(async_fn_in_trait)]
pub trait StepUpVerifier {
    /// Returns whether both factors verified.
    async fn verify(&self, pin: &str, biometric: bool) -> Result<bool, ServiceError>;
}

/// Outcome of an identity-document check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Rejected,
}

/// Identity/KYC verification service.
#[allow(async_fn_in_trait)]
pub trait IdentityVerifier {
    async fn verify_document(&self, document_type: &str)
        -> Result<VerificationStatus, ServiceError>;
}

/// Current USD→FC exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub usd_to_fc: u64,
    /// Day-over-day change, percent.
    pub change_pct: f64,
}

#[allow(async_fn_in_trait)]
pub trait RateFeed {
    async fn current(&self) -> Result<ExchangeRate, ServiceError>;
}
