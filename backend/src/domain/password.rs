//! Admin password hashing and generation.
//!
//! Passwords are stored as argon2id PHC strings. Verification goes through
//! `argon2`'s constant-time comparison; callers never compare secrets
//! themselves.

use std::fmt;
use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::distributions::Alphanumeric;
use rand::Rng;
use zeroize::Zeroizing;

use super::TenantSlug;

/// Number of random characters appended to generated passwords.
pub const GENERATED_SUFFIX_LEN: usize = 6;

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The hasher rejected its input or parameters.
    #[error("password hashing failed: {0}")]
    Hash(String),
    /// The stored hash is not a valid PHC string.
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Argon2id PHC string for a stored credential.
///
/// `Debug` is redacted so hashes never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string loaded from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Hash `password` with a fresh random salt.
    ///
    /// # Errors
    /// [`PasswordError::Hash`] when argon2 rejects the input.
    pub fn generate(password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordError::Hash(err.to_string()))
    }

    /// Check `password` against this hash.
    ///
    /// # Errors
    /// [`PasswordError::MalformedHash`] when the stored value cannot be
    /// parsed; a mismatch is `Ok(false)`.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordError> {
        let parsed = argon2::PasswordHash::new(&self.0)
            .map_err(|err| PasswordError::MalformedHash(err.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordError::MalformedHash(err.to_string())),
        }
    }

    /// PHC string for storage.
    #[must_use]
    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

/// Run a hashing job on the blocking pool so argon2 does not stall the
/// async workers.
///
/// # Errors
/// Propagates the job's error; a panicked job becomes [`PasswordError::Hash`].
pub async fn run_blocking<T, F>(job: F) -> Result<T, PasswordError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| PasswordError::Hash(format!("hashing task failed: {err}")))?
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

static DUMMY_HASH: OnceLock<Option<PasswordHash>> = OnceLock::new();

/// Burn the same verification cost as a real login when the username is
/// unknown, so response timing does not reveal which usernames exist.
pub fn verify_against_dummy(password: &str) {
    let dummy = DUMMY_HASH.get_or_init(|| PasswordHash::generate("dummy-password").ok());
    if let Some(hash) = dummy {
        let _outcome = hash.verify(password);
    }
}

/// Generate an admin password of the form `<slug>-<6 alphanumerics>`.
///
/// # Examples
/// ```
/// use scratch_backend::domain::{generate_admin_password, TenantSlug};
///
/// let slug = TenantSlug::new("acme").unwrap();
/// let password = generate_admin_password(&slug);
/// assert!(password.starts_with("acme-"));
/// assert_eq!(password.len(), "acme-".len() + 6);
/// ```
#[must_use]
pub fn generate_admin_password(slug: &TenantSlug) -> Zeroizing<String> {
    Zeroizing::new(format!("{slug}-{}", random_suffix()))
}

/// [`GENERATED_SUFFIX_LEN`] alphanumeric characters from the OS RNG.
pub(crate) fn random_suffix() -> String {
    rand::rngs::OsRng
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_verifies_original_password_only() {
        let hash = PasswordHash::generate("acme-Ab12Cd").expect("hash");
        assert!(hash.as_phc().starts_with("$argon2id$"));
        assert_eq!(hash.verify("acme-Ab12Cd"), Ok(true));
        assert_eq!(hash.verify("acme-ab12cd"), Ok(false));
    }

    #[rstest]
    fn hashing_salts_each_call() {
        let first = PasswordHash::generate("same").expect("hash");
        let second = PasswordHash::generate("same").expect("hash");
        assert_ne!(first.as_phc(), second.as_phc());
    }

    #[rstest]
    fn malformed_hash_is_an_error() {
        let hash = PasswordHash::from_stored("plaintext-from-legacy-row");
        assert!(matches!(
            hash.verify("plaintext-from-legacy-row"),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::generate("secret").expect("hash");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[rstest]
    fn generated_password_has_slug_prefix_and_alphanumeric_suffix() {
        let slug = TenantSlug::new("cifuentes").expect("slug");
        let password = generate_admin_password(&slug);
        let suffix = password
            .strip_prefix("cifuentes-")
            .expect("slug prefix present");
        assert_eq!(suffix.len(), GENERATED_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
