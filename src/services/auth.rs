//! Authentication and user profile service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use super::non_blank;
use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        AuthResponse, LoginRequest, Profile, ProfileUpdated, RegisterUser, UpdateProfile, User,
        UserClaims, UserFields,
    },
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, data: &RegisterUser) -> AppResult<AuthResponse> {
        data.validate()?;

        let (Some(name), Some(email), Some(password)) = (
            non_blank(&data.name),
            non_blank(&data.email),
            data.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::Validation(
                "Please provide name, email and password".to_string(),
            ));
        };
        let email = email.to_lowercase();

        if self.repository.users.get_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = self
            .repository
            .users
            .create(&UserFields {
                name,
                email,
                password_hash: self.hash_password(password)?,
                university: None,
                address: None,
            })
            .await?;
        tracing::info!(user_id = user.id, "User registered");

        self.sign_in(user)
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, credentials: &LoginRequest) -> AppResult<AuthResponse> {
        let email = credentials.email.trim().to_lowercase();
        let user = self
            .repository
            .users
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !self.verify_password(&user, &credentials.password)? {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        self.sign_in(user)
    }

    pub async fn profile(&self, user_id: i32) -> AppResult<Profile> {
        Ok(self.repository.users.get_by_id(user_id).await?.into())
    }

    /// Merge profile fields; a new password is re-hashed
    pub async fn update_profile(
        &self,
        user_id: i32,
        data: &UpdateProfile,
    ) -> AppResult<ProfileUpdated> {
        data.validate()?;

        let current = self.repository.users.get_by_id(user_id).await?;
        let mut fields = UserFields::from(&current);

        if let Some(name) = non_blank(&data.name) {
            fields.name = name;
        }
        if let Some(email) = non_blank(&data.email).map(|e| e.to_lowercase()) {
            if email != current.email {
                let taken = self.repository.users.get_by_email(&email).await?;
                if taken.is_some_and(|other| other.id != user_id) {
                    return Err(AppError::Conflict("Email is already in use".to_string()));
                }
                fields.email = email;
            }
        }
        if let Some(university) = non_blank(&data.university) {
            fields.university = Some(university);
        }
        if let Some(address) = non_blank(&data.address) {
            fields.address = Some(address);
        }
        if let Some(password) = data.password.as_deref().filter(|p| !p.is_empty()) {
            fields.password_hash = self.hash_password(password)?;
        }

        let user = self.repository.users.update(user_id, &fields).await?;
        tracing::info!(user_id, "Profile updated");

        let token = self.create_token(&user)?;
        Ok(ProfileUpdated {
            profile: user.into(),
            token,
        })
    }

    /// All users; the password hash is never serialized
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    fn sign_in(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.create_token(&user)?;
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        })
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn service() -> AuthService {
        AuthService::new(
            Repository::in_memory(),
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_hours: 1,
            },
        )
    }

    fn alice() -> RegisterUser {
        RegisterUser {
            name: Some("Alice".to_string()),
            email: Some("a@x.com".to_string()),
            password: Some("pw1".to_string()),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let registered = service.register(&alice()).await.unwrap();
        assert_eq!(registered.name, "Alice");

        let err = service.authenticate(&login("a@x.com", "wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));

        let session = service.authenticate(&login("a@x.com", "pw1")).await.unwrap();
        let claims = UserClaims::from_token(&session.token, "test-secret").unwrap();
        assert_eq!(claims.user_id, registered.id);
    }

    #[tokio::test]
    async fn test_unknown_email_is_an_auth_error() {
        let err = service()
            .authenticate(&login("ghost@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let service = service();
        let registered = service.register(&alice()).await.unwrap();
        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_ne!(users[0].password_hash, "pw1");
        assert!(users[0].password_hash.starts_with("$argon2"));
        assert_eq!(users[0].id, registered.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_case_insensitively() {
        let service = service();
        service.register(&alice()).await.unwrap();

        let mut again = alice();
        again.email = Some("A@X.com".to_string());
        let err = service.register(&again).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let service = service();

        let mut data = alice();
        data.email = Some("not-an-email".to_string());
        let err = service.register(&data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut data = alice();
        data.password = None;
        let err = service.register(&data).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_profile_merges_and_rehashes() {
        let service = service();
        let registered = service.register(&alice()).await.unwrap();

        let updated = service
            .update_profile(
                registered.id,
                &UpdateProfile {
                    name: None,
                    email: None,
                    university: Some("MIT".to_string()),
                    address: None,
                    password: Some("pw2".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.name, "Alice");
        assert_eq!(updated.profile.university.as_deref(), Some("MIT"));
        assert_ok!(UserClaims::from_token(&updated.token, "test-secret"));

        assert!(service.authenticate(&login("a@x.com", "pw1")).await.is_err());
        assert_ok!(service.authenticate(&login("a@x.com", "pw2")).await);
    }

    #[tokio::test]
    async fn test_update_profile_ignores_blank_fields() {
        let service = service();
        let registered = service.register(&alice()).await.unwrap();
        let filled = UpdateProfile {
            name: None,
            email: None,
            university: Some("MIT".to_string()),
            address: Some("1 Main St".to_string()),
            password: None,
        };
        service.update_profile(registered.id, &filled).await.unwrap();

        let updated = service
            .update_profile(
                registered.id,
                &UpdateProfile {
                    name: Some("   ".to_string()),
                    email: None,
                    university: Some(String::new()),
                    address: Some("  ".to_string()),
                    password: Some(String::new()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.profile.name, "Alice");
        assert_eq!(updated.profile.university.as_deref(), Some("MIT"));
        assert_eq!(updated.profile.address.as_deref(), Some("1 Main St"));
        assert_ok!(service.authenticate(&login("a@x.com", "pw1")).await);
    }

    #[tokio::test]
    async fn test_update_profile_email_must_stay_unique() {
        let service = service();
        service.register(&alice()).await.unwrap();
        let bob = service
            .register(&RegisterUser {
                name: Some("Bob".to_string()),
                email: Some("b@x.com".to_string()),
                password: Some("pw".to_string()),
            })
            .await
            .unwrap();

        let err = service
            .update_profile(
                bob.id,
                &UpdateProfile {
                    name: None,
                    email: Some("a@x.com".to_string()),
                    university: None,
                    address: None,
                    password: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let profile = service.profile(bob.id).await.unwrap();
        assert_eq!(profile.email, "b@x.com");
    }
}
