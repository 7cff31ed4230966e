use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use goalie_core::utils::time_utils::{parse_tz, DEFAULT_TZ};

use crate::auth::decode_secret_key;

const DEFAULT_SOCIAL_PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";
const DEFAULT_MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub photo_dir: PathBuf,
    pub public_url: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub social_profile_url: String,
    pub social_provider: String,
    pub push_url: Option<String>,
    pub timezone: Tz,
    pub max_photo_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("GOALIE_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid GOALIE_LISTEN_ADDR")?;
        let db_path = var("GOALIE_DB_PATH", "./db/app.db");
        let photo_dir = PathBuf::from(var("GOALIE_PHOTO_DIR", "./photos"));
        let public_url = var("GOALIE_PUBLIC_URL", "http://localhost:8080")
            .trim_end_matches('/')
            .to_string();
        let cors_allow = var("GOALIE_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("GOALIE_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid GOALIE_REQUEST_TIMEOUT_MS")?;

        let raw_secret =
            lookup("GOALIE_JWT_SECRET").context("GOALIE_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&raw_secret).context("Invalid GOALIE_JWT_SECRET")?;
        let token_ttl_secs: u64 = var("GOALIE_TOKEN_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())
            .parse()
            .context("Invalid GOALIE_TOKEN_TTL_SECS")?;

        let push_url = lookup("GOALIE_PUSH_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let timezone = parse_tz(&var("GOALIE_TIMEZONE", DEFAULT_TZ.name()))
            .context("Invalid GOALIE_TIMEZONE")?;
        let max_photo_bytes: usize =
            var("GOALIE_MAX_PHOTO_BYTES", &DEFAULT_MAX_PHOTO_BYTES.to_string())
                .parse()
                .context("Invalid GOALIE_MAX_PHOTO_BYTES")?;

        Ok(Self {
            listen_addr,
            db_path,
            photo_dir,
            public_url,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            social_profile_url: var("GOALIE_SOCIAL_PROFILE_URL", DEFAULT_SOCIAL_PROFILE_URL),
            social_provider: var("GOALIE_SOCIAL_PROVIDER", "kakao"),
            push_url,
            timezone,
            max_photo_bytes,
        })
    }
}
