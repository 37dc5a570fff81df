use anyhow::{Context, Result};

/// bcrypt work factor used for generated password hashes
pub const HASH_COST: u32 = 12;

/// Hash a plaintext password for htpasswd-style users files
pub fn create_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).context("Failed to hash password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_plaintext() {
        let hash = create_password("hunter2").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(bcrypt::verify("hunter2", &hash).unwrap());
        assert!(!bcrypt::verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(
            create_password("same").unwrap(),
            create_password("same").unwrap()
        );
    }
}
