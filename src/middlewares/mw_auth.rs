use axum::body::Body;
use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::{header, request::Parts, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use surrealdb::{engine::any::Any, Surreal};

use crate::auth::token_service::{AuthConfig, TokenService};
use crate::error::{Error, Result};
use crate::helpers::record_helpers::create_user_id;
use crate::models::user::{Role, UserRecord};
use crate::services::user_service::UserService;
use crate::AppState;

/// The authenticated caller, re-read from the database on every request.
#[derive(Debug, Clone)]
pub struct Ctx {
    pub user_id: String,
    pub exp: usize,
    pub user: UserRecord,
}

/// What the resolver leaves in the request extensions.
pub type CtxResult = Result<Ctx>;

impl Ctx {
    pub fn new(user_id: String, exp: usize, user: UserRecord) -> Self {
        Self { user_id, exp, user }
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<()> {
        if allowed.contains(&self.user.role) {
            Ok(())
        } else {
            Err(Error::Forbidden {
                reason: format!("This action requires one of the roles: {}", role_list(allowed)),
            })
        }
    }

    pub fn require_admin(&self) -> Result<()> {
        self.require_role(&[Role::Admin])
    }
}

fn role_list(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves the bearer token, if any, for every request. Routes decide
/// whether they need it through the `Ctx` / `Option<Ctx>` extractors.
pub async fn mw_ctx_resolver(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let result = resolve_ctx(&app_state.db, &app_state.auth_config, req.headers()).await;

    if let Err(err) = &result {
        if !matches!(err, Error::AuthFailNoAuthToken) {
            tracing::debug!(error = ?err, "ctx resolution failed");
        }
    }

    req.extensions_mut().insert(result);
    next.run(req).await
}

pub async fn resolve_ctx(
    db: &Surreal<Any>,
    config: &AuthConfig,
    headers: &HeaderMap,
) -> CtxResult {
    let token = headers
        .get(header::AUTHORIZATION)
        .ok_or(Error::AuthFailNoAuthToken)?
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::AuthFailTokenWrongFormat)?;

    let claims = TokenService::validate_token(token, config)?;

    let user = match UserService::get_user(db, &create_user_id(&claims.sub)).await {
        Ok(user) => user,
        // Token for an account that no longer exists.
        Err(Error::UserNotFound { .. }) => return Err(Error::InvalidToken),
        Err(err) => return Err(err),
    };

    Ok(Ctx::new(claims.sub, claims.exp, user))
}

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<CtxResult>()
            .ok_or(Error::AuthFailCtxNotInRequestExt)?
            .clone()
    }
}

/// Anonymous callers get `None`; a present but bad token is still rejected.
impl<S: Send + Sync> OptionalFromRequestParts<S> for Ctx {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>> {
        match parts.extensions.get::<CtxResult>() {
            Some(Ok(ctx)) => Ok(Some(ctx.clone())),
            Some(Err(Error::AuthFailNoAuthToken)) | None => Ok(None),
            Some(Err(err)) => Err(err.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::helpers::record_helpers::record_key;
    use crate::test_utils::seed_user_with;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_resolves_valid_token() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();
        let user = seed_user_with(&db, "alice", Role::Artist, Some("Ali")).await;
        let token = TokenService::create_token(record_key(&user.id), user.role, &config).unwrap();

        let ctx = resolve_ctx(&db, &config, &bearer(&token)).await.unwrap();

        assert_eq!(ctx.user.username, "alice");
        assert!(ctx.require_role(&[Role::Artist, Role::Admin]).is_ok());
        assert!(matches!(ctx.require_admin(), Err(Error::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_missing_and_malformed_tokens() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();

        let err = resolve_ctx(&db, &config, &HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, Error::AuthFailNoAuthToken));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let err = resolve_ctx(&db, &config, &headers).await.unwrap_err();
        assert!(matches!(err, Error::AuthFailTokenWrongFormat));

        let err = resolve_ctx(&db, &config, &bearer("garbage")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidToken));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_invalid() {
        let db = test_db().await;
        let config = AuthConfig::for_tests();
        let token = TokenService::create_token("ghost".into(), Role::Listener, &config).unwrap();

        let err = resolve_ctx(&db, &config, &bearer(&token)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidToken));
    }
}
