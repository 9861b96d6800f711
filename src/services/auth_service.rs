use crate::{
    auth::{
        models::{AuthResponse, LoginPayload, RegisterPayload},
        password_service,
        token_service::{AuthConfig, TokenService},
    },
    error::{Error, Result},
    helpers::record_helpers::{record_key, USER_TABLE},
    models::user::{NewUser, UserRecord},
    validators::user_validator::{normalize_email, validate_registration},
};
use surrealdb::{engine::any::Any, Surreal};

pub struct AuthService;

impl AuthService {
    fn issue(user: UserRecord, config: &AuthConfig) -> Result<AuthResponse> {
        let token = TokenService::create_token(record_key(&user.id), user.role, config)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn register_user(
        db: &Surreal<Any>,
        config: &AuthConfig,
        payload: RegisterPayload,
    ) -> Result<AuthResponse> {
        let username = payload.username.trim().to_string();
        let email = normalize_email(&payload.email);
        validate_registration(&username, &email, &payload.password)?;

        let sql = "SELECT VALUE username FROM user WHERE username = $username LIMIT 1;
            SELECT VALUE email FROM user WHERE email = $email LIMIT 1;";
        let mut result = db
            .query(sql)
            .bind(("username", username.clone()))
            .bind(("email", email.clone()))
            .await?;
        let same_username: Option<String> = result.take(0)?;
        let same_email: Option<String> = result.take(1)?;

        if same_username.is_some() {
            return Err(Error::UserAlreadyExists {
                field: "username".to_string(),
            });
        }
        if same_email.is_some() {
            return Err(Error::UserAlreadyExists {
                field: "email".to_string(),
            });
        }

        let hashed_password = password_service::hash_password(&payload.password)?;
        let user: UserRecord = db
            .create(USER_TABLE)
            .content(NewUser::listener(username, email, hashed_password))
            .await?
            .ok_or(Error::DbError("Could not create user".into()))?;

        tracing::info!(user = %user.id, "user registered");
        Self::issue(user, config)
    }

    /// Unknown accounts and wrong passwords fail the same way.
    pub async fn login_user(
        db: &Surreal<Any>,
        config: &AuthConfig,
        payload: LoginPayload,
    ) -> Result<AuthResponse> {
        let (sql, value) = match (payload.email, payload.username) {
            (Some(email), _) if !email.trim().is_empty() => (
                "SELECT * FROM user WHERE email = $identifier LIMIT 1;",
                normalize_email(&email),
            ),
            (_, Some(username)) if !username.trim().is_empty() => (
                "SELECT * FROM user WHERE username = $identifier LIMIT 1;",
                username.trim().to_string(),
            ),
            _ => {
                return Err(Error::InvalidInput {
                    reason: "Email or username is required".to_string(),
                })
            }
        };

        let user: Option<UserRecord> = db
            .query(sql)
            .bind(("identifier", value))
            .await?
            .take(0)?;

        let user = user.ok_or(Error::LoginFail)?;
        if !password_service::verify_password(&payload.password, &user.password) {
            return Err(Error::LoginFail);
        }

        Self::issue(user, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::models::user::Role;

    fn register(username: &str, email: &str) -> RegisterPayload {
        RegisterPayload {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_by_email_or_username() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();

        let registered =
            AuthService::register_user(&db, &config, register("alice", "Alice@Example.com"))
                .await
                .unwrap();
        assert_eq!(registered.user.role, Role::Listener);
        assert_eq!(registered.user.email, "alice@example.com");
        assert_eq!(registered.user.id.table(), USER_TABLE);
        let claims = TokenService::validate_token(&registered.token, &config).unwrap();
        assert_eq!(claims.sub, record_key(&registered.user.id));

        let by_email = AuthService::login_user(
            &db,
            &config,
            LoginPayload {
                email: Some("ALICE@example.com".into()),
                username: None,
                password: "hunter22".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_email.user.id, registered.user.id);

        let by_username = AuthService::login_user(
            &db,
            &config,
            LoginPayload {
                email: None,
                username: Some("alice".into()),
                password: "hunter22".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(by_username.user.username, "alice");
    }

    #[tokio::test]
    async fn test_duplicates_are_rejected() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();
        AuthService::register_user(&db, &config, register("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = AuthService::register_user(&db, &config, register("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "A user with this username already exists");

        let err = AuthService::register_user(&db, &config, register("alicia", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "A user with this email already exists");
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_alike() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();
        AuthService::register_user(&db, &config, register("alice", "alice@example.com"))
            .await
            .unwrap();

        for (username, password) in [("alice", "wrong-pass"), ("nobody", "hunter22")] {
            let err = AuthService::login_user(
                &db,
                &config,
                LoginPayload {
                    email: None,
                    username: Some(username.into()),
                    password: password.into(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, Error::LoginFail));
        }
    }

    #[tokio::test]
    async fn test_invalid_registration_is_reported() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();

        let err = AuthService::register_user(&db, &config, register("a b", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
