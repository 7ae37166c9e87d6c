//! Validation, hashing policy, and orchestration between transport and store.

use crate::store::{StoreError, User, UserStore};
use sha2::{Digest, Sha256};

pub mod error;
pub use self::error::AuthError;

/// Minimum password length, counted in characters of the raw input.
const MIN_PASSWORD_CHARS: usize = 6;

/// The subset of a user record safe to return to clients.
#[derive(Debug, Clone)]
pub struct PublicUser {
    pub id: i64,
    pub identifier: String,
    pub created_at: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            identifier: user.identifier,
            created_at: user.created_at,
        }
    }
}

/// Digest a password for storage comparison: SHA-256 over the UTF-8 bytes,
/// rendered as lowercase hex. Deterministic and one-way; this is the single
/// policy point a stronger key-derivation function would replace.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
}

impl AuthService {
    #[must_use]
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Register a new identifier with a hashed password.
    ///
    /// Validation runs before the store is touched. The duplicate pre-check
    /// gives the common case a friendly answer; the UNIQUE constraint still
    /// decides any race, so a conflicting concurrent insert reports
    /// [`AuthError::UserExists`] as well.
    ///
    /// # Errors
    ///
    /// Return a validation error for empty or short input, `UserExists` for a
    /// taken identifier, or a store error on database failure
    pub async fn register(&self, identifier: &str, password: &str) -> Result<PublicUser, AuthError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort);
        }

        let password_hash = hash_password(password);

        if self.store.exists(identifier).await? {
            return Err(AuthError::UserExists);
        }

        match self.store.insert(identifier, &password_hash).await {
            Ok(user) => Ok(user.into()),
            Err(StoreError::Conflict) => Err(AuthError::UserExists),
            Err(err) => Err(err.into()),
        }
    }

    /// Verify credentials against the stored record.
    ///
    /// A missing record and a digest mismatch take the same path and produce
    /// the identical [`AuthError::InvalidCredentials`], so callers cannot
    /// probe which identifiers are registered.
    ///
    /// # Errors
    ///
    /// Return `MissingCredentials` for empty input, `InvalidCredentials` when
    /// the pair does not match, or a store error on database failure
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<PublicUser, AuthError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let password_hash = hash_password(password);

        match self.store.find_by_identifier(identifier).await? {
            Some(user) if user.password_hash == password_hash => Ok(user.into()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    async fn service(dir: &TempDir) -> Result<AuthService> {
        let dsn = format!("sqlite://{}/users.db", dir.path().display());
        Ok(AuthService::new(UserStore::open(&dsn).await?))
    }

    #[test]
    fn hash_password_matches_known_vectors() {
        // NIST SHA-256 test vectors
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hash_password_is_deterministic_lowercase_hex() {
        let digest = hash_password("secret1");
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(digest, hash_password("secret1"));
        assert_ne!(digest, hash_password("secret2"));
        assert_ne!(digest, "secret1");
    }

    #[tokio::test]
    async fn register_then_authenticate_round_trips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let auth = service(&dir).await?;

        let registered = auth.register("alice", "secret1").await?;
        let authenticated = auth.authenticate("alice", "secret1").await?;

        assert_eq!(registered.id, authenticated.id);
        assert_eq!(authenticated.identifier, "alice");
        assert_eq!(registered.created_at, authenticated.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_register_reports_user_exists() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let auth = service(&dir).await?;

        auth.register("alice", "secret1").await?;

        let err = auth
            .register("alice", "other12")
            .await
            .expect_err("duplicate must fail");
        assert!(matches!(err, AuthError::UserExists));

        // The first credentials still authenticate, the new ones never took
        auth.authenticate("alice", "secret1").await?;
        let err = auth
            .authenticate("alice", "other12")
            .await
            .expect_err("second password never stored");
        assert!(matches!(err, AuthError::InvalidCredentials));

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_identifier_are_indistinguishable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let auth = service(&dir).await?;

        auth.register("alice", "secret1").await?;

        let wrong_password = auth
            .authenticate("alice", "wrong1")
            .await
            .expect_err("wrong password");
        let unknown_user = auth
            .authenticate("bob", "secret1")
            .await
            .expect_err("unknown identifier");

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn password_length_boundary_is_six_characters() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let auth = service(&dir).await?;

        let err = auth
            .register("alice", "abcde")
            .await
            .expect_err("five characters is too short");
        assert!(matches!(err, AuthError::PasswordTooShort));

        auth.register("alice", "abcdef").await?;

        // Length is counted in characters, not bytes
        auth.register("señora", "señor1").await?;

        Ok(())
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_before_storage() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let auth = service(&dir).await?;

        // A closed store would turn any storage access into a store error,
        // so getting a validation error proves the input check runs first.
        auth.store().close().await;

        let err = auth
            .register("", "secret1")
            .await
            .expect_err("empty identifier");
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = auth.register("alice", "").await.expect_err("empty password");
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = auth
            .authenticate("", "")
            .await
            .expect_err("empty credentials");
        assert!(matches!(err, AuthError::MissingCredentials));

        Ok(())
    }
}
