//! Single-use verification codes staged in the TTL cache.
//!
//! Three visit-confirmation flows share the same life cycle and differ only
//! in how the cache key is derived: leads (name + mobile), site visits (the
//! visit's lead), and channel partners (partner id). Triggering stores a
//! fresh 6-digit code under the subject's key; verifying compares the
//! candidate and consumes the entry on match.

use rand::Rng;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::TtlCache;

/// Generate a uniformly random 6-digit decimal code
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Key for codes sent directly against a lead's mobile number
pub fn lead_key(lead_name: &str, mobile_no: &str) -> String {
    format!("lead_otp:{}:{}", lead_name, mobile_no)
}

/// Key for codes confirming a site visit, scoped to the visit's lead
pub fn site_visit_key(lead: Uuid) -> String {
    format!("site_visit_otp:{}", lead)
}

/// Key for codes confirming a channel-partner visit
pub fn channel_partner_key(channel_partner: Uuid) -> String {
    format!("cp_visit_otp:{}", channel_partner)
}

pub struct OtpService<'a> {
    cache: &'a TtlCache,
    ttl: Duration,
}

impl<'a> OtpService<'a> {
    pub fn new(cache: &'a TtlCache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Service backed by the process-wide cache, TTL from config
    pub fn global() -> OtpService<'static> {
        OtpService {
            cache: TtlCache::global(),
            ttl: Duration::from_secs(crate::config::config().otp.ttl_secs),
        }
    }

    /// Generate a fresh code and stage it under `key`, replacing any
    /// outstanding code for the same subject
    pub async fn trigger(&self, key: &str) -> String {
        let code = generate_code();
        self.cache.set_value(key, &code, self.ttl).await;
        code
    }

    /// Compare `candidate` against the staged code. A match consumes the
    /// entry atomically, so the code cannot be used twice even by
    /// concurrent verifiers. Expired, absent, and mismatched codes all
    /// report plain failure.
    pub async fn verify(&self, key: &str, candidate: &str) -> bool {
        self.cache.remove_if_eq(key, candidate.trim()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(cache: &TtlCache) -> OtpService<'_> {
        OtpService::new(cache, Duration::from_secs(600))
    }

    #[test]
    fn generated_code_is_six_decimal_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().expect("numeric");
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn cache_keys_are_deterministic_and_disjoint() {
        let lead = Uuid::new_v4();
        let partner = Uuid::new_v4();

        assert_eq!(
            lead_key("Asha Rao", "9876543210"),
            lead_key("Asha Rao", "9876543210")
        );
        assert_eq!(site_visit_key(lead), site_visit_key(lead));

        assert!(lead_key("Asha Rao", "9876543210").starts_with("lead_otp:"));
        assert!(site_visit_key(lead).starts_with("site_visit_otp:"));
        assert!(channel_partner_key(partner).starts_with("cp_visit_otp:"));
    }

    #[tokio::test]
    async fn verify_succeeds_only_with_the_latest_code() {
        let cache = TtlCache::new();
        let otp = service(&cache);

        let first = otp.trigger("lead_otp:A:1").await;
        let second = otp.trigger("lead_otp:A:1").await;

        if first != second {
            assert!(!otp.verify("lead_otp:A:1", &first).await);
        }
        assert!(otp.verify("lead_otp:A:1", &second).await);
    }

    #[tokio::test]
    async fn successful_verification_is_single_use() {
        let cache = TtlCache::new();
        let otp = service(&cache);

        let code = otp.trigger("site_visit_otp:x").await;
        assert!(otp.verify("site_visit_otp:x", &code).await);
        assert!(!otp.verify("site_visit_otp:x", &code).await);
    }

    #[tokio::test]
    async fn concurrent_verifies_cannot_both_succeed() {
        let cache = TtlCache::new();
        let otp = service(&cache);

        let code = otp.trigger("site_visit_otp:race").await;
        let (a, b) = tokio::join!(
            otp.verify("site_visit_otp:race", &code),
            otp.verify("site_visit_otp:race", &code),
        );
        assert!(a ^ b, "exactly one verifier may consume the code");
    }

    #[tokio::test]
    async fn mismatch_does_not_consume_the_code() {
        let cache = TtlCache::new();
        let otp = service(&cache);

        let code = otp.trigger("cp_visit_otp:y").await;
        assert!(!otp.verify("cp_visit_otp:y", "000000").await);
        // The real code still works after a failed attempt
        assert!(otp.verify("cp_visit_otp:y", &code).await);
    }

    #[tokio::test]
    async fn expired_code_fails_verification() {
        let cache = TtlCache::new();
        let otp = OtpService::new(&cache, Duration::from_millis(10));

        let code = otp.trigger("lead_otp:B:2").await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!otp.verify("lead_otp:B:2", &code).await);
    }

    #[tokio::test]
    async fn candidate_is_compared_after_trimming() {
        let cache = TtlCache::new();
        let otp = service(&cache);

        let code = otp.trigger("lead_otp:C:3").await;
        assert!(otp.verify("lead_otp:C:3", &format!(" {} ", code)).await);
    }
}
