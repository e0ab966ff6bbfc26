//! Password hashing.
//!
//! New hashes are Argon2id. Accounts migrated from the legacy user table keep
//! their bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) and still verify.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// PHC-formatted hash including salt and parameters.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| format!("failed to hash password: {e}"))
}

/// Constant-time check of `password` against a stored bcrypt or PHC hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    if is_bcrypt(hash) {
        return bcrypt::verify(password, hash).map_err(|e| format!("invalid bcrypt hash: {e}"));
    }
    let parsed = PasswordHash::new(hash).map_err(|e| format!("invalid password hash format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}
