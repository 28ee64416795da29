use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub fn hash_password(password: String) -> String {
    let salt = SaltString::generate(&mut OsRng);

    // Argon2 with default params (Argon2id v19)
    let argon2 = Argon2::default();

    // Hash password to PHC string ($argon2id$v=19$...)
    argon2
        .hash_password(password.as_bytes(), &salt)
        .expect("hashes password")
        .to_string()
}

pub fn check_passwords(password: String, hash: &str) -> bool {
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
    fn hash_verifies_and_rejects() {
        let hash = hash_password("hunter2".to_string());

        assert!(check_passwords("hunter2".to_string(), &hash));
        assert!(!check_passwords("hunter3".to_string(), &hash));
        assert!(!check_passwords("hunter2".to_string(), "not a phc string"));
    }
}
