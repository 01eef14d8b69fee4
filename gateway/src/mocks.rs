//! Mock implementations of the external service seams.
//!
//! All verdicts are computed locally after a simulated network delay.
//! Swap these for real clients (payment-network MFA, a KYC provider, a
//! rates API) in production.

use std::time::Duration;

use ketney_common::verify::{
    ExchangeRate, IdentityVerifier, RateFeed, ServiceError, StepUpVerifier, VerificationStatus,
};

async fn simulate_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Step-up verifier: verified iff the PIN is exactly 4 digits and the
/// biometric flag is set.
#[derive(Debug, Clone)]
pub struct MockStepUpVerifier {
    delay: Duration,
}

impl MockStepUpVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl StepUpVerifier for MockStepUpVerifier {
    async fn verify(&self, pin: &str, biometric: bool) -> Result<bool, ServiceError> {
        simulate_delay(self.delay).await;
        Ok(pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit()) && biometric)
    }
}

/// Identity verifier that accepts every document.
#[derive(Debug, Clone)]
pub struct MockIdentityVerifier {
    delay: Duration,
}

impl MockIdentityVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl IdentityVerifier for MockIdentityVerifier {
    async fn verify_document(
        &self,
        _document_type: &str,
    ) -> Result<VerificationStatus, ServiceError> {
        // KYC checks take noticeably longer than the other calls.
        simulate_delay(self.delay * 4).await;
        Ok(VerificationStatus::Verified)
    }
}

/// Fixed exchange-rate feed.
#[derive(Debug, Clone)]
pub struct StaticRateFeed {
    rate: ExchangeRate,
}

impl Default for StaticRateFeed {
    fn default() -> Self {
        Self {
            rate: ExchangeRate {
                usd_to_fc: 2_850,
                change_pct: 0.7,
            },
        }
    }
}

impl RateFeed for StaticRateFeed {
    async fn current(&self) -> Result<ExchangeRate, ServiceError> {
        Ok(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_step_up_requires_both_factors() {
        let verifier = MockStepUpVerifier::new(Duration::ZERO);
        assert!(verifier.verify("1234", true).await.unwrap());
        assert!(!verifier.verify("1234", false).await.unwrap());
        assert!(!verifier.verify("123", true).await.unwrap());
        assert!(!verifier.verify("12a4", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_identity_always_verifies() {
        let identity = MockIdentityVerifier::new(Duration::ZERO);
        assert_eq!(
            identity.verify_document("passport").await.unwrap(),
            VerificationStatus::Verified
        );
    }
}
