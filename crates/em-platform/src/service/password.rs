//! Password Service
//!
//! Argon2id hashing plus the password policy applied on sign-up.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::OsRng;
use std::collections::HashMap;

use crate::error::{PlatformError, Result};

pub const GENERATED_PASSWORD_LENGTH: usize = 14;

/// Frequent leaked passwords of at least eight characters; shorter ones
/// already fail the length rule.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password12", "password123", "password1234", "passw0rd",
    "p@ssw0rd", "p@ssword", "pa$$word", "12345678", "123456789", "1234567890",
    "0123456789", "11111111", "00000000", "12341234", "87654321", "123123123",
    "qwertyui", "qwertyuiop", "qwerty12", "qwerty123", "qwerty1234", "1q2w3e4r",
    "1q2w3e4r5t", "zaq12wsx", "1qaz2wsx", "asdfghjk", "asdfghjkl", "zxcvbnm1",
    "iloveyou", "iloveyou1", "sunshine", "sunshine1", "princess", "princess1",
    "football", "football1", "baseball", "basketball", "superman", "batman123",
    "starwars", "whatever", "welcome1", "welcome123", "admin123", "administrator",
    "letmein1", "letmein123", "trustno1", "abc12345", "abcd1234", "abcdefgh",
    "monkey123", "dragon123", "changeme", "michelle", "jennifer", "jordan23",
    "computer", "internet", "mustang1", "shadow12", "master123", "whatever1",
    "charlie1", "freedom1", "liverpool", "chelsea1", "arsenal1", "midnight",
    "butterfly", "chocolate", "password!", "testtest", "test1234", "secret123",
    "letmeinnow", "loveyou1", "summer2024", "winter2024", "spring2024", "autumn2024",
];

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    /// Character-overlap ratio at which a password counts as too similar
    /// to a user attribute
    pub max_similarity: f64,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_similarity: 0.7,
        }
    }
}

/// Upper bound on the similarity of `a` and `b`: twice the size of their
/// character multiset intersection over the combined length.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }
    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(n) = available.get_mut(&c).filter(|n| **n > 0) {
            *n -= 1;
            matches += 1;
        }
    }
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total as f64
    }
}

impl PasswordPolicy {
    /// Check `password` against the policy. `attributes` are user values
    /// (email, names) the password must not resemble.
    pub fn validate(&self, password: &str, attributes: &[&str]) -> Result<()> {
        if password.chars().count() < self.min_length {
            return Err(PlatformError::invalid_field(
                "password",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    self.min_length
                ),
            ));
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(PlatformError::invalid_field(
                "password",
                "This password is entirely numeric.",
            ));
        }
        let lowered = password.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            return Err(PlatformError::invalid_field("password", "This password is too common."));
        }
        if self.too_similar(&lowered, attributes) {
            return Err(PlatformError::invalid_field(
                "password",
                "The password is too similar to your personal information.",
            ));
        }
        Ok(())
    }

    /// Values much shorter than the password cannot reach the ratio
    fn exceeds_length_ratio(&self, password: &str, value: &str) -> bool {
        let password_len = password.chars().count() as f64;
        let value_len = value.chars().count() as f64;
        password_len >= 10.0 * value_len && value_len < self.max_similarity / 2.0 * password_len
    }

    fn too_similar(&self, password: &str, attributes: &[&str]) -> bool {
        attributes.iter().filter(|v| !v.is_empty()).any(|value| {
            let value = value.to_lowercase();
            // Each word of the value counts, as does the whole value
            value
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .chain(std::iter::once(value.as_str()))
                .filter(|part| !self.exceeds_length_ratio(password, part))
                .any(|part| quick_ratio(password, part) >= self.max_similarity)
        })
    }
}

#[derive(Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl PasswordService {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            argon2: Argon2::default(),
            policy,
        }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PlatformError::internal(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| PlatformError::internal(format!("Invalid password hash: {}", e)))?;
        Ok(self.argon2.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// Random alphanumeric password for accounts created on a user's behalf
    pub fn generate_password(&self) -> String {
        Alphanumeric.sample_string(&mut OsRng, GENERATED_PASSWORD_LENGTH)
    }
}
