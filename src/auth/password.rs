// src/auth/password.rs

use anyhow::{Result, anyhow};
use bcrypt::{BcryptError, hash, verify};

pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    hash(password, cost).map_err(|e: BcryptError| anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify(password, hash).map_err(|e: BcryptError| anyhow!("Failed to verify password: {}", e))
}
