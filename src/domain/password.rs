//! Password value object and password policy.
//!
//! Hashing uses Argon2 with a per-password random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::ValidationError;

use crate::config::{MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARS};
use crate::errors::{AppError, AppResult};

/// Check the password policy, returning the first rule the password breaks.
///
/// Requires at least 8 characters and at least one uppercase letter,
/// lowercase letter, digit and special character from `@$!%*?&`.
pub fn check_password_policy(plain_text: &str) -> Result<(), &'static str> {
    if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters long");
    }
    if !plain_text.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase character");
    }
    if !plain_text.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase character");
    }
    if !plain_text.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number character");
    }
    if !plain_text.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err("Password must contain at least one special character");
    }
    Ok(())
}

/// `validator` adapter for [`check_password_policy`].
pub fn validate_password_policy(plain_text: &str) -> Result<(), ValidationError> {
    check_password_policy(plain_text)
        .map_err(|message| ValidationError::new("password_policy").with_message(message.into()))
}

/// Argon2 PHC string of a staff password. Never printed.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(..)")
    }
}

impl Password {
    /// Enforce the policy, then hash with a fresh salt.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        check_password_policy(plain_text).map_err(AppError::validation)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?
            .to_string();
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from the users table.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// A stored hash that does not parse never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123!"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123$";
        let hash = Password::new(plain).unwrap().into_string();
        assert!(hash.starts_with("$argon2"));

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123&";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
        assert_ne!(pass1.into_string(), pass2.into_string());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("anything"));
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("Sh0rt!");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_policy_messages() {
        assert_eq!(
            check_password_policy("alllowercase1!"),
            Err("Password must contain at least one uppercase character")
        );
        assert_eq!(
            check_password_policy("ALLUPPERCASE1!"),
            Err("Password must contain at least one lowercase character")
        );
        assert_eq!(
            check_password_policy("NoDigitsHere!"),
            Err("Password must contain at least one number character")
        );
        assert_eq!(
            check_password_policy("NoSpecial123"),
            Err("Password must contain at least one special character")
        );
        assert_eq!(check_password_policy("Valid123!"), Ok(()));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("Valid123!").unwrap();
        assert_eq!(format!("{:?}", password), "Password(..)");
    }
}
