//! Credential hashing.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{HrError, HrResult};

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> HrResult<String> {
    if password.is_empty() {
        return Err(HrError::validation("password", "must not be empty"));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HrError::Persistence {
            message: format!("password hashing failed: {}", e),
        })?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string. Unparseable hashes never
/// verify.
///
/// This crate does not authenticate requests itself; this is the check an
/// external login service runs against [`Credential::password_hash`].
///
/// [`Credential::password_hash`]: crate::models::Credential::password_hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(
            hash_password(""),
            Err(HrError::Validation { ref field, .. }) if field == "password"
        ));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
