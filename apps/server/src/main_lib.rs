use std::sync::Arc;

use chrono_tz::Tz;
use goalie_core::{
    certifications::{CertificationService, CertificationServiceTrait},
    challenges::{ChallengeService, ChallengeServiceTrait},
    events::DomainEventSink,
    goals::{GoalService, GoalServiceTrait},
    groups::{GroupService, GroupServiceTrait},
    photos::PhotoStoreTrait,
    users::{UserRepositoryTrait, UserService, UserServiceTrait},
};
use goalie_storage_sqlite::{
    certifications::CertificationRepository,
    challenges::ChallengeRepository,
    db::{self, write_actor},
    goals::GoalRepository,
    groups::GroupRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    auth::{AuthConfig, AuthManager, HttpSocialLoginProvider, SocialLoginProvider},
    config::Config,
    domain_events::{HttpPushGateway, LogPushGateway, PushGateway, WebDomainEventSink},
    events::EventBus,
    photos::FsPhotoStore,
};

/// Capacity of the realtime broadcast channel.
const EVENT_BUS_CAPACITY: usize = 256;

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub group_service: Arc<dyn GroupServiceTrait + Send + Sync>,
    pub goal_service: Arc<dyn GoalServiceTrait + Send + Sync>,
    pub certification_service: Arc<dyn CertificationServiceTrait + Send + Sync>,
    pub challenge_service: Arc<dyn ChallengeServiceTrait + Send + Sync>,
    pub social_login: Arc<dyn SocialLoginProvider>,
    pub auth: Arc<AuthManager>,
    pub event_bus: EventBus,
    pub timezone: Tz,
    pub max_photo_bytes: usize,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("GOALIE_LOG_FORMAT").unwrap_or_else(|_| "text".into());
    let registry = tracing_subscriber::registry().with(filter);
    if log_format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(HttpSocialLoginProvider::new(
        config.social_profile_url.clone(),
        config.social_provider.clone(),
    ));
    build_state_with_provider(config, provider).await
}

/// Builds the application state around a given social login provider.
pub async fn build_state_with_provider(
    config: &Config,
    social_login: Arc<dyn SocialLoginProvider>,
) -> anyhow::Result<Arc<AppState>> {
    tracing::info!("Using database at {}", config.db_path);
    let db_path = db::init(&config.db_path)?;
    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    tokio::fs::create_dir_all(&config.photo_dir).await?;
    let photo_store: Arc<dyn PhotoStoreTrait> = Arc::new(FsPhotoStore::new(
        config.photo_dir.clone(),
        &config.public_url,
        config.max_photo_bytes,
    ));

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let group_repo = Arc::new(GroupRepository::new(pool.clone(), writer.clone()));
    let goal_repo = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let certification_repo = Arc::new(CertificationRepository::new(pool.clone(), writer.clone()));
    let challenge_repo = Arc::new(ChallengeRepository::new(pool.clone(), writer.clone()));

    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    let sink: Arc<dyn DomainEventSink> = domain_event_sink.clone();
    let tz = config.timezone;

    let user_service = Arc::new(UserService::new(user_repo.clone(), photo_store.clone()));
    let group_service = Arc::new(GroupService::new(group_repo, user_repo.clone()));
    let goal_service = Arc::new(GoalService::new(goal_repo.clone(), sink.clone(), tz));
    let certification_service = Arc::new(CertificationService::new(
        goal_repo.clone(),
        certification_repo,
        user_repo.clone(),
        photo_store,
        sink.clone(),
        tz,
    ));
    let challenge_service = Arc::new(ChallengeService::new(
        challenge_repo,
        user_repo.clone(),
        goal_repo,
        sink,
        tz,
    ));

    let push: Arc<dyn PushGateway> = match &config.push_url {
        Some(url) => {
            tracing::info!("Push notifications go to {}", url);
            Arc::new(HttpPushGateway::new(url.clone()))
        }
        None => {
            tracing::info!("GOALIE_PUSH_URL not set; push notifications are only logged");
            Arc::new(LogPushGateway)
        }
    };
    let members: Arc<dyn UserRepositoryTrait> = user_repo;
    domain_event_sink.start_worker(event_bus.clone(), members, push);

    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        access_token_ttl: config.token_ttl,
    }));

    Ok(Arc::new(AppState {
        user_service,
        group_service,
        goal_service,
        certification_service,
        challenge_service,
        social_login,
        auth,
        event_bus,
        timezone: tz,
        max_photo_bytes: config.max_photo_bytes,
    }))
}
