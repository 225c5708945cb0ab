//! Account service: registration, token authentication and direct edits.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use inkpost_common::{AppError, AppResult, IdGenerator};
use inkpost_db::{
    entities::user::{self, ReviewStatus, UserRole, UserStatus},
    repositories::UserRepository,
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::authorization::Identity;
use super::profile_review::non_blank;

/// Length of the random suffix in generated display names.
const GENERATED_NAME_LEN: usize = 6;

/// User service for account business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Input for direct profile edits.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    /// Administrators only.
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,

    /// Administrators only.
    #[validate(length(max = 1024))]
    pub avatar: Option<String>,
}

/// Input for changing the account password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account with a generated display name.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.user_repo.email_exists(&email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            password: Set(password_hash),
            token: Set(self.id_gen.generate_token()),
            name: Set(generated_name()),
            avatar: Set(None),
            bio: Set(None),
            role: Set(UserRole::User),
            status: Set(UserStatus::Active),
            pending_name: Set(None),
            pending_avatar: Set(None),
            review_status: Set(ReviewStatus::None),
            review_notes: Set(None),
            review_submitted_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Resolve a bearer token to an active account.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active() {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        Ok(user)
    }

    /// Apply direct profile edits for the caller.
    ///
    /// `bio` is applied for everyone; an empty bio clears it. `name` and
    /// `avatar` are applied only for administrators.
    pub async fn update_profile(
        &self,
        caller: &Identity,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        self.update_account(caller, input, None).await
    }

    /// Replace the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        caller: &Identity,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        self.update_account(caller, UpdateProfileInput::default(), Some(input))
            .await?;
        Ok(())
    }

    /// Apply profile edits and an optional password change as one write.
    ///
    /// Every check (role, input validation, current password) runs before
    /// the record is touched, so a rejected request changes nothing.
    pub async fn update_account(
        &self,
        caller: &Identity,
        profile: UpdateProfileInput,
        password: Option<ChangePasswordInput>,
    ) -> AppResult<user::Model> {
        let name = non_blank(profile.name);
        let avatar = non_blank(profile.avatar);
        if (name.is_some() || avatar.is_some()) && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Name and avatar changes must be submitted for review".to_string(),
            ));
        }

        let profile = UpdateProfileInput {
            bio: profile.bio.map(|b| b.trim().to_string()),
            name,
            avatar,
        };
        profile.validate()?;
        if let Some(password) = &password {
            password.validate()?;
        }

        let user = self.user_repo.get_by_id(caller.user_id()).await?;

        let new_password_hash = match password {
            Some(password) => {
                if !verify_password(&password.current_password, &user.password)? {
                    return Err(AppError::Validation(
                        "Current password is incorrect".to_string(),
                    ));
                }
                Some(hash_password(&password.new_password)?)
            }
            None => None,
        };

        let mut model: user::ActiveModel = user.into();
        if let Some(bio) = profile.bio {
            model.bio = Set((!bio.is_empty()).then_some(bio));
        }
        if let Some(name) = profile.name {
            model.name = Set(name);
        }
        if let Some(avatar) = profile.avatar {
            model.avatar = Set(Some(avatar));
        }
        let password_changed = new_password_hash.is_some();
        if let Some(hash) = new_password_hash {
            model.password = Set(hash);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        let user = self.user_repo.update(model).await?;
        if password_changed {
            info!(user_id = %caller.user_id(), "Password changed");
        }
        Ok(user)
    }
}

/// Display name given to new accounts, e.g. `user-k3x9qa`.
fn generated_name() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_NAME_LEN)
        .map(char::from)
        .collect();
    format!("user-{}", suffix.to_lowercase())
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::user_fixture;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db)))
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("secret1", "not-a-hash").is_err());
    }

    #[test]
    fn test_generated_name_shape() {
        let name = generated_name();
        let suffix = name.strip_prefix("user-").unwrap();
        assert_eq!(suffix.len(), GENERATED_NAME_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_signup_input_validation() {
        let bad_email = SignupInput {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupInput {
            email: "a@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(short_password.validate().is_err());

        let ok = SignupInput {
            email: "a@example.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[tokio::test]
    async fn test_signup_creates_user() {
        let created = user_fixture("u1", UserRole::User);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([[created]])
            .into_connection();

        let user = service(db)
            .signup(SignupInput {
                email: "U1@Example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let existing = user_fixture("u1", UserRole::User);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let result = service(db)
            .signup(SignupInput {
                email: "u1@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(db).authenticate_by_token("invalid").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_banned() {
        let mut user = user_fixture("u1", UserRole::User);
        user.status = UserStatus::Banned;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let result = service(db).authenticate_by_token("token-u1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_profile_name_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let caller = Identity::new("u1", UserRole::User);

        let result = service(db)
            .update_profile(
                &caller,
                UpdateProfileInput {
                    name: Some("Bob".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_profile_bio() {
        let user = user_fixture("u1", UserRole::User);
        let mut updated = user.clone();
        updated.bio = Some("hello".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .append_query_results([[updated]])
            .into_connection();
        let caller = Identity::new("u1", UserRole::User);

        let result = service(db)
            .update_profile(
                &caller,
                UpdateProfileInput {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(result.bio.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let mut user = user_fixture("u1", UserRole::User);
        user.password = hash_password("secret1").unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();
        let caller = Identity::new("u1", UserRole::User);

        let result = service(db)
            .change_password(
                &caller,
                ChangePasswordInput {
                    current_password: "wrong1".to_string(),
                    new_password: "secret2".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_profile_untouched() {
        let mut user = user_fixture("u1", UserRole::User);
        user.password = hash_password("secret1").unwrap();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(Arc::clone(&db)));
        let caller = Identity::new("u1", UserRole::User);

        let result = service
            .update_account(
                &caller,
                UpdateProfileInput {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
                Some(ChangePasswordInput {
                    current_password: "wrong1".to_string(),
                    new_password: "secret2".to_string(),
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        drop(service);
        let Ok(conn) = Arc::try_unwrap(db) else {
            panic!("connection still shared");
        };
        let log = conn.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(!format!("{:?}", log[0]).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_update_account_bio_and_password_in_one_write() {
        let mut user = user_fixture("u1", UserRole::User);
        user.password = hash_password("secret1").unwrap();
        let mut updated = user.clone();
        updated.bio = Some("hello".to_string());
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(Arc::clone(&db)));
        let caller = Identity::new("u1", UserRole::User);

        let result = service
            .update_account(
                &caller,
                UpdateProfileInput {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
                Some(ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "secret2".to_string(),
                }),
            )
            .await
            .unwrap();
        assert_eq!(result.bio.as_deref(), Some("hello"));

        drop(service);
        let Ok(conn) = Arc::try_unwrap(db) else {
            panic!("connection still shared");
        };
        let log = conn.into_transaction_log();
        assert_eq!(log.len(), 2);
        let update = format!("{:?}", log[1]);
        assert!(update.contains("UPDATE") && update.contains("bio"));
        assert!(update.contains("password"));
    }

    #[tokio::test]
    async fn test_change_password_too_short() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let caller = Identity::new("u1", UserRole::User);

        let result = service(db)
            .change_password(
                &caller,
                ChangePasswordInput {
                    current_password: "secret1".to_string(),
                    new_password: "123".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
