use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt work factor. Fixed so stored digests stay comparable in cost.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Returns `Ok(false)` on mismatch. A digest bcrypt cannot parse is an internal error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {}", e)))
}
