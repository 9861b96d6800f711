use bcrypt::{hash, verify, DEFAULT_COST};

use crate::Result;

pub fn hash_password(password: &str) -> Result<String> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Malformed stored hashes count as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "password123";
        let hashed_password = hash_password(password).unwrap();
        assert!(verify_password(password, &hashed_password));
        assert!(!verify_password("password124", &hashed_password));
        assert!(!verify_password(password, "not-a-real-hash"));
    }
}
