//! Admin authentication service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::domain::password::{run_blocking, verify_against_dummy};
use crate::domain::ports::{AdminAuth, AdminRepository, CredentialChange};
use crate::domain::{AdminId, AdminUser, CredentialUpdate, Error, LoginCredentials, PasswordHash};

const INVALID_LOGIN: &str = "Invalid username or password";

/// Admin authentication service implementing [`AdminAuth`].
#[derive(Clone)]
pub struct AdminAuthService<A> {
    admins: Arc<A>,
}

impl<A> AdminAuthService<A> {
    /// Create a service over the admin repository.
    pub fn new(admins: Arc<A>) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl<A> AdminAuth for AdminAuthService<A>
where
    A: AdminRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminUser, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let Some(admin) = self
            .admins
            .find_by_username(credentials.username())
            .await?
        else {
            run_blocking(move || {
                verify_against_dummy(&password);
                Ok(())
            })
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
            debug!(username = %credentials.username(), "login rejected: unknown username");
            return Err(Error::unauthorized(INVALID_LOGIN));
        };

        let hash = admin.password_hash.clone();
        let verified = run_blocking(move || hash.verify(&password))
            .await
            .map_err(|err| {
                error!(admin_id = %admin.id, error = %err, "stored password hash unusable");
                Error::internal(format!("password verification failed: {err}"))
            })?;
        if verified {
            Ok(admin)
        } else {
            debug!(username = %credentials.username(), "login rejected: wrong password");
            Err(Error::unauthorized(INVALID_LOGIN))
        }
    }

    async fn current(&self, id: AdminId) -> Result<Option<AdminUser>, Error> {
        Ok(self.admins.find_by_id(id).await?)
    }

    async fn update_credentials(
        &self,
        id: AdminId,
        update: CredentialUpdate,
    ) -> Result<AdminUser, Error> {
        let password_hash = match update.password() {
            Some(password) => {
                let password = Zeroizing::new(password.to_owned());
                Some(
                    run_blocking(move || PasswordHash::generate(&password))
                        .await
                        .map_err(|err| Error::internal(err.to_string()))?,
                )
            }
            None => None,
        };
        let change = CredentialChange {
            username: update.username().cloned(),
            password_hash,
        };
        self.admins
            .update_credentials(id, &change)
            .await?
            .ok_or_else(|| Error::unauthorized("Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AdminRepositoryError, MockAdminRepository};
    use crate::domain::{AdminRole, AdminUsername, ErrorCode, TenantId};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn stored_admin() -> AdminUser {
        AdminUser {
            id: AdminId::new(3),
            tenant_id: TenantId::new(1),
            username: AdminUsername::new("admin@acme.com").expect("valid username"),
            password_hash: PasswordHash::generate("acme-Ab12Cd").expect("hash"),
            role: AdminRole::Admin,
            created_at: Utc::now(),
        }
    }

    fn creds(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("credential shape")
    }

    #[rstest]
    #[tokio::test]
    async fn login_accepts_the_right_password(stored_admin: AdminUser) {
        let mut admins = MockAdminRepository::new();
        let found = stored_admin.clone();
        admins
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(found)));

        let admin = AdminAuthService::new(Arc::new(admins))
            .login(&creds("admin@acme.com", "acme-Ab12Cd"))
            .await
            .expect("login succeeds");
        assert_eq!(admin.id, stored_admin.id);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically(stored_admin: AdminUser) {
        let mut known = MockAdminRepository::new();
        known
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(stored_admin)));
        let mut unknown = MockAdminRepository::new();
        unknown.expect_find_by_username().return_once(|_| Ok(None));

        let wrong_password = AdminAuthService::new(Arc::new(known))
            .login(&creds("admin@acme.com", "nope"))
            .await
            .expect_err("wrong password");
        let unknown_user = AdminAuthService::new(Arc::new(unknown))
            .login(&creds("ghost@acme.com", "acme-Ab12Cd"))
            .await
            .expect_err("unknown user");

        for error in [&wrong_password, &unknown_user] {
            assert_eq!(error.code(), ErrorCode::Unauthorized);
            assert_eq!(error.message(), "Invalid username or password");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_stored_hash_is_an_internal_error(mut stored_admin: AdminUser) {
        stored_admin.password_hash = PasswordHash::from_stored("plaintext");
        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(stored_admin)));

        let error = AdminAuthService::new(Arc::new(admins))
            .login(&creds("admin@acme.com", "plaintext"))
            .await
            .expect_err("unusable hash");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn update_hashes_the_new_password(stored_admin: AdminUser) {
        let mut admins = MockAdminRepository::new();
        admins
            .expect_update_credentials()
            .withf(|_, change| {
                change.username.is_none()
                    && change
                        .password_hash
                        .as_ref()
                        .is_some_and(|hash| hash.verify("brand-new-secret") == Ok(true))
            })
            .times(1)
            .return_once(move |_, _| Ok(Some(stored_admin)));
        let update =
            CredentialUpdate::try_from_parts(None, Some("brand-new-secret")).expect("valid update");

        AdminAuthService::new(Arc::new(admins))
            .update_credentials(AdminId::new(3), update)
            .await
            .expect("update succeeds");
    }

    #[rstest]
    #[case(Ok(None), ErrorCode::Unauthorized)]
    #[case(Err(AdminRepositoryError::username_taken("taken@acme.com")), ErrorCode::Conflict)]
    #[tokio::test]
    async fn update_maps_missing_admin_and_taken_username(
        #[case] outcome: Result<Option<AdminUser>, AdminRepositoryError>,
        #[case] expected: ErrorCode,
    ) {
        let mut admins = MockAdminRepository::new();
        admins
            .expect_update_credentials()
            .return_once(move |_, _| outcome);
        let update =
            CredentialUpdate::try_from_parts(Some("taken@acme.com"), None).expect("valid update");

        let error = AdminAuthService::new(Arc::new(admins))
            .update_credentials(AdminId::new(3), update)
            .await
            .expect_err("update fails");
        assert_eq!(error.code(), expected);
        if expected == ErrorCode::Conflict {
            assert_eq!(error.message(), "Username already taken");
        }
    }
}
