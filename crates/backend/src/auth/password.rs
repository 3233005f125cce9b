//! Password hashing and verification with bcrypt.
//!
//! Both operations are CPU-bound. Callers on the async runtime run
//! them through `spawn_blocking` (see `AuthService`).

use thiserror::Error;

/// Work factor used unless `BCRYPT_COST` says otherwise.
pub const DEFAULT_COST: u32 = 10;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Longest password bcrypt reads in full, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidCost(u32),

    #[error("password is {0} bytes, bcrypt reads at most 72")]
    TooLong(usize),

    #[error("password could not be hashed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Salted, adaptive one-way hash for account passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    ///
    /// Passwords longer than bcrypt's 72-byte input limit are refused rather
    /// than silently truncated.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(HashError::TooLong(plaintext.len()));
        }
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Never fails: a mismatch, an over-long password, or an unreadable stored
    /// hash all yield `false`.
    pub fn verify(&self, hash: &str, plaintext: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(plaintext, hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::debug!("Password check failed without a comparison: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
