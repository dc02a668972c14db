use crate::{
    application::{
        admin::use_case::AdminUseCase, auth::use_case::AuthUseCase,
        clustering::service::ClusterEngine, manage_complaints::use_case::ManageComplaintsUseCase,
        notes::use_case::NotesUseCase, social::use_case::SocialUseCase,
        submit_complaint::use_case::SubmitComplaintUseCase,
    },
    config::Config,
    domain::{
        cluster::repository::ClusterRepository, complaint::repository::ComplaintRepository,
        moderation::repository::AbuseLogRepository, notes::repository::NotesRepository,
        social::repository::SocialRepository, user::repository::UserRepository,
    },
    infrastructure::{
        ml::traits::ComplaintAnalyzer,
        repositories::{
            in_memory::InMemoryStore, sqlx_abuse_log_repository::SqlxAbuseLogRepository,
            sqlx_cluster_repository::SqlxClusterRepository,
            sqlx_complaint_repository::SqlxComplaintRepository,
            sqlx_notes_repository::SqlxNotesRepository,
            sqlx_social_repository::SqlxSocialRepository,
            sqlx_user_repository::SqlxUserRepository,
        },
        security::{abuse_detector::AbuseDetector, rate_limiter::RateLimiter},
    },
};
use sqlx::PgPool;
use std::sync::Arc;

/// One handle per aggregate, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub complaints: Arc<dyn ComplaintRepository>,
    pub clusters: Arc<dyn ClusterRepository>,
    pub abuse_logs: Arc<dyn AbuseLogRepository>,
    pub social: Arc<dyn SocialRepository>,
    pub notes: Arc<dyn NotesRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(SqlxUserRepository::new(pool.clone())),
            complaints: Arc::new(SqlxComplaintRepository::new(pool.clone())),
            clusters: Arc::new(SqlxClusterRepository::new(pool.clone())),
            abuse_logs: Arc::new(SqlxAbuseLogRepository::new(pool.clone())),
            social: Arc::new(SqlxSocialRepository::new(pool.clone())),
            notes: Arc::new(SqlxNotesRepository::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            complaints: store.clone(),
            clusters: store.clone(),
            abuse_logs: store.clone(),
            social: store.clone(),
            notes: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// `None` on the in-memory backend
    pub db: Option<PgPool>,
    pub config: Config,
    pub repos: Repositories,
    pub detector: AbuseDetector,
    pub analyzer: Arc<dyn ComplaintAnalyzer>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn cluster_engine(&self) -> ClusterEngine {
        ClusterEngine::new(self.repos.clusters.clone(), self.repos.complaints.clone())
    }

    pub fn submit_complaint(&self) -> SubmitComplaintUseCase {
        SubmitComplaintUseCase::new(
            self.repos.users.clone(),
            self.repos.complaints.clone(),
            self.repos.abuse_logs.clone(),
            self.cluster_engine(),
            self.detector.clone(),
            self.analyzer.clone(),
            self.config.abuse_ban_hours,
        )
    }

    pub fn manage_complaints(&self) -> ManageComplaintsUseCase {
        ManageComplaintsUseCase::new(self.repos.complaints.clone(), self.cluster_engine())
    }

    pub fn social(&self) -> SocialUseCase {
        SocialUseCase::new(self.repos.social.clone(), self.repos.complaints.clone())
    }

    pub fn auth(&self) -> AuthUseCase {
        AuthUseCase::new(self.repos.users.clone())
    }

    pub fn admin(&self) -> AdminUseCase {
        AdminUseCase::new(
            self.repos.users.clone(),
            self.repos.complaints.clone(),
            self.repos.abuse_logs.clone(),
            self.cluster_engine(),
        )
    }

    pub fn notes(&self) -> NotesUseCase {
        NotesUseCase::new(self.repos.notes.clone())
    }
}
