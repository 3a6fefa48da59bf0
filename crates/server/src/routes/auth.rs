use axum::{
    async_trait,
    extract::{multipart::Multipart, FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterCustomerInput, ROLE_CUSTOMER, ROLE_MANAGER};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::profile;

use crate::errors::JsonApiError;
use crate::uploads;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct UploadSettings {
    pub dir: String,
    pub max_bytes: usize,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub uploads: UploadSettings,
}

impl ServerState {
    /// Per-request auth service over the SeaORM repository.
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: Some(self.auth.jwt_secret.clone()),
                token_ttl_hours: self.auth.token_ttl_hours,
                password_algorithm: "argon2".into(),
            },
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// 从请求中取出 bearer token；缺失时回退从 Cookie 中解析 auth_token
fn extract_token(parts: &Parts) -> Result<String, JsonApiError> {
    let authz = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Some(h) = authz {
        let prefix = "Bearer ";
        if !h.starts_with(prefix) {
            warn!(authz = %h, "invalid Authorization format (expect Bearer)");
            return Err(JsonApiError::unauthorized("Invalid token"));
        }
        return Ok(h[prefix.len()..].to_string());
    }

    let cookie_header = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some(rest) = kv.strip_prefix("auth_token=") {
            if !rest.is_empty() {
                return Ok(rest.to_string());
            }
        }
    }

    Err(JsonApiError::unauthorized("No token, authorization denied"))
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, JsonApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            Err(JsonApiError::unauthorized("Token has expired"))
        }
        Err(e) => {
            warn!(err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("Invalid token"))
        }
    }
}

/// Validated token claims; no account lookup.
pub struct AuthClaims {
    pub account_id: Uuid,
    pub role: String,
}

#[async_trait]
impl FromRequestParts<ServerState> for AuthClaims {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let claims = decode_claims(&token, &state.auth.jwt_secret)?;
        let account_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| JsonApiError::unauthorized("Invalid token"))?;
        Ok(AuthClaims { account_id, role: claims.role })
    }
}

impl AuthClaims {
    pub fn actor(&self) -> service::booking::Actor {
        service::booking::Actor { id: self.account_id, is_manager: self.role == ROLE_MANAGER }
    }
}

/// Authenticated customer; refreshes `last_active` on every request.
pub struct CustomerAuth(pub models::customer::Model);

#[async_trait]
impl FromRequestParts<ServerState> for CustomerAuth {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let claims = AuthClaims::from_request_parts(parts, state).await?;
        if claims.role != ROLE_CUSTOMER {
            return Err(JsonApiError::unauthorized("Customer not found"));
        }
        let customer = profile::get_customer(&state.db, claims.account_id)
            .await
            .map_err(JsonApiError::from)?
            .ok_or_else(|| JsonApiError::unauthorized("Customer not found"))?;
        if let Err(e) = models::customer::touch_last_active(&state.db, customer.id).await {
            warn!(err = %e, "failed to refresh last_active");
        }
        Ok(CustomerAuth(customer))
    }
}

/// Authenticated, active manager; refreshes `last_login` on every request.
pub struct ManagerAuth(pub models::manager::Model);

#[async_trait]
impl FromRequestParts<ServerState> for ManagerAuth {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let claims = AuthClaims::from_request_parts(parts, state).await?;
        if claims.role != ROLE_MANAGER {
            return Err(JsonApiError::forbidden("Not authorized"));
        }
        let manager = profile::get_manager(&state.db, claims.account_id)
            .await
            .map_err(JsonApiError::from)?
            .ok_or_else(|| JsonApiError::unauthorized("Manager not found"))?;
        if !manager.is_active {
            return Err(JsonApiError::unauthorized("Manager account is deactivated"));
        }
        if let Err(e) = models::manager::touch_last_login(&state.db, manager.id).await {
            warn!(err = %e, "failed to refresh last_login");
        }
        Ok(ManagerAuth(manager))
    }
}

pub(crate) fn session_cookie(token: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new("auth_token", token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

// ---- customer-facing handlers under /api/auth ----

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), JsonApiError> {
    let (Some(name), Some(email), Some(password)) = (payload.name, payload.email, payload.password) else {
        return Err(JsonApiError::bad_request("Please provide all required fields"));
    };
    models::customer::validate_email(&email).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    models::customer::validate_name(&name).map_err(|e| JsonApiError::bad_request(e.to_string()))?;

    let svc = state.auth_service();
    svc.register_customer(RegisterCustomerInput { name, email, password })
        .await
        .map_err(|e| match e {
            AuthError::Conflict => JsonApiError::bad_request("Customer already exists"),
            AuthError::Validation(msg) => JsonApiError::bad_request(msg),
            other => JsonApiError::internal(other.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(MessageResponse { msg: "Customer registered successfully".into() })))
}

#[derive(Serialize)]
pub struct CustomerLoginResponse {
    pub token: String,
    pub customer: models::customer::Model,
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<CustomerLoginResponse>), JsonApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(JsonApiError::bad_request("Please provide both email and password"));
    };

    let svc = state.auth_service();
    let session = svc
        .login_customer(LoginInput { email, password })
        .await
        .map_err(|e| match e {
            AuthError::Unauthorized => JsonApiError::bad_request("Invalid credentials"),
            other => JsonApiError::internal(other.to_string()),
        })?;

    let token = session
        .token
        .ok_or_else(|| JsonApiError::internal("token generation failed".into()))?;
    let customer = profile::get_customer(&state.db, session.account.id)
        .await
        .map_err(JsonApiError::from)?
        .ok_or_else(|| JsonApiError::internal("account vanished after login".into()))?;

    let jar = jar.add(session_cookie(&token));
    Ok((jar, Json(CustomerLoginResponse { token, customer })))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordPayload {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub msg: String,
    /// Returned directly; there is no mailer in this system.
    pub reset_token: String,
}

pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<ForgotPasswordResponse>, JsonApiError> {
    let Some(email) = payload.email else {
        return Err(JsonApiError::bad_request("Please provide an email"));
    };
    let svc = state.auth_service();
    let reset_token = svc.forgot_password(&email).await.map_err(|e| match e {
        AuthError::NotFound => JsonApiError::not_found("Customer not found"),
        other => JsonApiError::internal(other.to_string()),
    })?;
    Ok(Json(ForgotPasswordResponse {
        msg: "Password reset link sent to email".into(),
        reset_token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordPayload {
    pub token: Option<String>,
    pub password: Option<String>,
}

pub async fn reset_password(
    State(state): State<ServerState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let (Some(token), Some(password)) = (payload.token, payload.password) else {
        return Err(JsonApiError::bad_request("Please provide token and password"));
    };
    let svc = state.auth_service();
    svc.reset_password(&token, &password).await.map_err(|e| match e {
        AuthError::Validation(msg) => JsonApiError::bad_request(msg),
        other => JsonApiError::internal(other.to_string()),
    })?;
    Ok(Json(MessageResponse { msg: "Password has been reset successfully".into() }))
}

pub async fn get_profile(CustomerAuth(customer): CustomerAuth) -> Json<models::customer::Model> {
    Json(customer)
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_profile(
    State(state): State<ServerState>,
    CustomerAuth(customer): CustomerAuth,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<models::customer::Model>, JsonApiError> {
    let updated = profile::update_customer_profile(
        &state.db,
        customer.id,
        payload.name.as_deref(),
        payload.email.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordPayload {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password(
    State(state): State<ServerState>,
    CustomerAuth(customer): CustomerAuth,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let (Some(current), Some(new)) = (payload.current_password, payload.new_password) else {
        return Err(JsonApiError::bad_request("Please provide both current and new password"));
    };
    let svc = state.auth_service();
    svc.change_password(customer.id, &current, &new).await.map_err(|e| match e {
        AuthError::Validation(msg) => JsonApiError::bad_request(msg),
        AuthError::Unauthorized => JsonApiError::bad_request("Invalid credentials"),
        other => JsonApiError::internal(other.to_string()),
    })?;
    Ok(Json(MessageResponse { msg: "Password updated successfully".into() }))
}

#[derive(Serialize)]
pub struct ProfileImageResponse {
    pub msg: String,
    pub profile_image: String,
    pub customer: models::customer::Model,
}

pub async fn upload_profile_image(
    State(state): State<ServerState>,
    CustomerAuth(customer): CustomerAuth,
    mut multipart: Multipart,
) -> Result<Json<ProfileImageResponse>, JsonApiError> {
    let path = uploads::save_image(
        &mut multipart,
        &state.uploads.dir,
        "profile-images",
        state.uploads.max_bytes,
    )
    .await?;
    let updated = profile::set_customer_profile_image(&state.db, customer.id, &path).await?;
    Ok(Json(ProfileImageResponse {
        msg: "Profile image updated".into(),
        profile_image: path,
        customer: updated,
    }))
}
