use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use goalie_core::users::{SocialProfile, User};
use goalie_core::{Error as CoreError, Result as CoreResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// Identity of the caller, inserted into request extensions by [`require_jwt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginRequest {
    pub access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.jwt_secret);
        let decoding_key = DecodingKey::from_secret(&config.jwt_secret);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key,
            decoding_key,
            validation,
            token_ttl: config.access_token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Returns the user id carried by a valid token.
    pub fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => AuthError::Unauthorized,
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// Exchanges a social provider access token for the provider's profile.
#[async_trait]
pub trait SocialLoginProvider: Send + Sync {
    async fn fetch_profile(&self, access_token: &str) -> CoreResult<SocialProfile>;
}

/// Calls a Kakao-compatible "current user" endpoint.
pub struct HttpSocialLoginProvider {
    client: reqwest::Client,
    profile_url: String,
    provider: String,
}

impl HttpSocialLoginProvider {
    pub fn new(profile_url: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            profile_url: profile_url.into(),
            provider: provider.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KakaoUser {
    id: serde_json::Value,
    #[serde(default)]
    properties: Option<KakaoProperties>,
    #[serde(default)]
    kakao_account: Option<KakaoAccount>,
}

#[derive(Debug, Deserialize)]
struct KakaoProperties {
    nickname: Option<String>,
    profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    email: Option<String>,
}

/// Maps the provider's JSON body onto a [`SocialProfile`].
pub fn parse_kakao_profile(provider: &str, body: &str) -> CoreResult<SocialProfile> {
    let user: KakaoUser = serde_json::from_str(body)?;
    let provider_user_id = match user.id {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) if !s.trim().is_empty() => s,
        _ => {
            return Err(CoreError::Unauthorized(
                "Social profile has no user id".to_string(),
            ))
        }
    };
    let (nickname, photo_url) = match user.properties {
        Some(props) => (props.nickname, props.profile_image),
        None => (None, None),
    };
    Ok(SocialProfile {
        provider: provider.to_string(),
        provider_user_id,
        nickname,
        email: user.kakao_account.and_then(|account| account.email),
        photo_url: photo_url.filter(|url| !url.trim().is_empty()),
    })
}

#[async_trait]
impl SocialLoginProvider for HttpSocialLoginProvider {
    async fn fetch_profile(&self, access_token: &str) -> CoreResult<SocialProfile> {
        let response = self
            .client
            .get(&self.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| CoreError::Unexpected(format!("Social profile request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Social provider rejected access token: {}", status);
            return Err(CoreError::Unauthorized(format!(
                "Social provider returned {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Unexpected(format!("Social profile read failed: {e}")))?;
        parse_kakao_profile(&self.provider, &body)
    }
}

pub async fn social_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SocialLoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let access_token = payload.access_token.trim();
    if access_token.is_empty() {
        return Err(ApiError::BadRequest("accessToken is required".to_string()));
    }

    let profile = state.social_login.fetch_profile(access_token).await?;
    let user = state.user_service.sign_in(profile, Utc::now()).await?;
    let token = state.auth.issue_token(&user.id)?;
    tracing::info!("User {} signed in", user.id);

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
        user,
    }))
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let user_id = state.auth.validate_token(token)?;
    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}
