//! One-time passcodes for email verification and password reset.
//!
//! Codes are six digits, single-use, and expire after ten minutes. A code
//! issued for one purpose cannot be consumed for another.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::Rng;

/// TTL for issued codes (10 minutes).
const OTP_TTL: Duration = Duration::from_secs(600);

/// What an issued code is allowed to prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpPurpose {
    VerifyEmail,
    ResetPassword,
}

struct OtpEntry {
    code: String,
    created_at: Instant,
}

/// In-memory store for pending codes (keyed by email and purpose).
pub struct OtpStore {
    codes: DashMap<(String, OtpPurpose), OtpEntry>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self {
            codes: DashMap::new(),
        }
    }

    /// Issue a fresh code, replacing any previous one for the same
    /// email and purpose.
    pub fn issue(&self, email: &str, purpose: OtpPurpose) -> String {
        let code = generate_code();
        self.codes.insert(
            (email.to_owned(), purpose),
            OtpEntry {
                code: code.clone(),
                created_at: Instant::now(),
            },
        );
        code
    }

    /// Consume a code. Returns `true` and removes the entry only when the
    /// code matches and has not expired; a mismatch leaves the entry in
    /// place so the caller may retry.
    pub fn consume(&self, email: &str, purpose: OtpPurpose, code: &str) -> bool {
        // Match and removal happen under one shard lock, so concurrent
        // requests can redeem a code at most once.
        self.codes
            .remove_if(&(email.to_owned(), purpose), |_, entry| {
                entry.created_at.elapsed() <= OTP_TTL && entry.code == code
            })
            .is_some()
    }

    /// Evict expired entries.
    pub fn cleanup(&self) {
        self.codes
            .retain(|_, v| v.created_at.elapsed() <= OTP_TTL);
    }

    /// Spawn a periodic cleanup task.
    pub fn spawn_cleanup_task(self: &std::sync::Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = std::sync::Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                store.cleanup();
            }
        })
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a six-digit, zero-padded code.
fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}
