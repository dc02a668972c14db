use super::dto::{SubmissionError, SubmitComplaintRequest};
use crate::{
    application::clustering::service::ClusterEngine,
    domain::{
        complaint::{
            entity::{Complaint, NewComplaint},
            repository::ComplaintRepository,
            value_objects::ComplaintText,
        },
        moderation::{abuse_log::NewAbuseLog, repository::AbuseLogRepository},
        shared::{
            errors::{DomainError, first_validation_message},
            urgency::Urgency,
        },
        user::repository::UserRepository,
    },
    infrastructure::{
        ml::traits::{AnalysisSource, ComplaintAnalyzer},
        security::abuse_detector::{AbuseDetector, ban_expiration},
    },
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Runs a complaint through ban check, abuse screening, analysis and
/// clustering before persisting it.
pub struct SubmitComplaintUseCase {
    users: Arc<dyn UserRepository>,
    complaints: Arc<dyn ComplaintRepository>,
    abuse_logs: Arc<dyn AbuseLogRepository>,
    engine: ClusterEngine,
    detector: AbuseDetector,
    analyzer: Arc<dyn ComplaintAnalyzer>,
    ban_hours: i64,
}

impl SubmitComplaintUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        complaints: Arc<dyn ComplaintRepository>,
        abuse_logs: Arc<dyn AbuseLogRepository>,
        engine: ClusterEngine,
        detector: AbuseDetector,
        analyzer: Arc<dyn ComplaintAnalyzer>,
        ban_hours: i64,
    ) -> Self {
        Self {
            users,
            complaints,
            abuse_logs,
            engine,
            detector,
            analyzer,
            ban_hours,
        }
    }

    /// Returns the stored complaint as it reads after its cluster has been
    /// recomputed.
    ///
    /// # Errors
    /// - `AlreadyBanned` while the author's ban is still running
    /// - `Abusive` after banning the author and writing an abuse log; the
    ///   complaint itself is not stored
    /// - `Validation` for empty or oversized text
    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: Uuid,
        request: SubmitComplaintRequest,
    ) -> Result<Complaint, SubmissionError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let now = Utc::now();
        if let Some(banned_until) = user.banned_until.filter(|until| *until > now) {
            return Err(SubmissionError::AlreadyBanned { banned_until });
        }

        let text = ComplaintText::new(request.original_text)
            .map_err(|e| SubmissionError::Validation(first_validation_message(&e)))?
            .value;

        let report = self.detector.detect(&text).await;
        if report.is_abusive {
            let banned_until = ban_expiration(now, self.ban_hours)?;
            self.users.update_ban(user.id, Some(banned_until)).await?;
            self.abuse_logs
                .create(&NewAbuseLog {
                    user_id: user.id,
                    username: user.username.clone(),
                    flagged_text: text,
                    detected_words: report.detected_words.clone(),
                })
                .await?;

            warn!(
                username = %user.username,
                method = ?report.detected_by,
                %banned_until,
                "Rejected abusive complaint and banned author"
            );
            return Err(SubmissionError::Abusive {
                banned_until,
                ban_hours: self.ban_hours,
                detected_words: report.detected_words,
            });
        }

        let analysis = self.analyzer.analyze(&text).await;
        if let AnalysisSource::Heuristic { reason } = &analysis.source {
            info!(%reason, "Complaint analysed with local heuristic");
        }

        let cluster = self
            .engine
            .get_or_create_cluster(Some(analysis.keywords.as_slice()))
            .await?;

        let created = self
            .complaints
            .create(&NewComplaint {
                user_id: user.id,
                username: user.username,
                original_text: text,
                summary: Some(analysis.summary),
                severity: analysis.severity,
                keywords: analysis.keywords,
                cluster_id: cluster.as_ref().map(|c| c.id),
                similar_complaints_count: if cluster.is_some() { 1 } else { 0 },
                urgency: Urgency::Normal,
            })
            .await?;

        let Some(cluster) = cluster else {
            return Ok(created);
        };
        self.engine.update_cluster_count(cluster.id).await?;

        info!(complaint_id = %created.id, cluster_id = %cluster.id, "Complaint submitted");
        Ok(self
            .complaints
            .find_by_id(created.id)
            .await?
            .unwrap_or(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            cluster::repository::ClusterRepository,
            complaint::entity::Severity,
            user::entity::{NewUser, Role, User, UserType},
        },
        infrastructure::{
            ml::traits::{AbuseVerdict, Analysis, MockAbuseClassifier, MockComplaintAnalyzer},
            repositories::in_memory::InMemoryStore,
            security::abuse_detector::FallbackOutcome,
        },
    };

    fn analyzer_with(keywords: &'static [&'static str]) -> Arc<dyn ComplaintAnalyzer> {
        let mut analyzer = MockComplaintAnalyzer::new();
        analyzer.expect_analyze().returning(move |text| Analysis {
            summary: text.chars().take(40).collect(),
            severity: Severity::Poor,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            source: AnalysisSource::Model,
        });
        Arc::new(analyzer)
    }

    fn use_case(
        store: &InMemoryStore,
        analyzer: Arc<dyn ComplaintAnalyzer>,
        detector: AbuseDetector,
    ) -> SubmitComplaintUseCase {
        let shared = Arc::new(store.clone());
        SubmitComplaintUseCase::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            ClusterEngine::new(shared.clone(), shared),
            detector,
            analyzer,
            48,
        )
    }

    async fn student(store: &InMemoryStore) -> User {
        UserRepository::create(
            store,
            &NewUser {
                username: "nisha".into(),
                email: "nisha@campus.edu".into(),
                password_hash: "hash".into(),
                role: Role::Student,
                roll_number: Some("23CS07".into()),
                user_type: UserType::Student,
            },
        )
        .await
        .unwrap()
    }

    fn request(text: &str) -> SubmitComplaintRequest {
        SubmitComplaintRequest {
            original_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn abusive_text_bans_logs_and_stores_nothing() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let mut analyzer = MockComplaintAnalyzer::new();
        analyzer.expect_analyze().never();
        let submit = use_case(&store, Arc::new(analyzer), AbuseDetector::new(None));

        let before = Utc::now();
        let err = submit
            .execute(user.id, request("this mess food is shit"))
            .await
            .unwrap_err();

        let SubmissionError::Abusive {
            banned_until,
            detected_words,
            ..
        } = err
        else {
            panic!("expected abusive rejection, got {:?}", err);
        };
        assert!(detected_words.contains(&"shit".to_string()));
        let minutes = (banned_until - before).num_minutes();
        assert!((47 * 60..=48 * 60).contains(&minutes));

        let stored = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        assert_eq!(stored.banned_until, Some(banned_until));
        let logs = AbuseLogRepository::find_all(&store).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].flagged_text, "this mess food is shit");
        assert!(ComplaintRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn banned_author_is_turned_away_before_screening() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let until = Utc::now() + chrono::Duration::hours(5);
        store.update_ban(user.id, Some(until)).await.unwrap();

        let mut classifier = MockAbuseClassifier::new();
        classifier.expect_classify().never();
        let submit = use_case(
            &store,
            analyzer_with(&["wifi"]),
            AbuseDetector::new(Some(Arc::new(classifier))),
        );

        let err = submit
            .execute(user.id, request("Library wifi disconnects during exams"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::AlreadyBanned { banned_until } if banned_until == until));
        assert_eq!(err.banned_until(), Some(until));
    }

    #[tokio::test]
    async fn expired_ban_does_not_block() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        store
            .update_ban(user.id, Some(Utc::now() - chrono::Duration::hours(1)))
            .await
            .unwrap();
        let submit = use_case(&store, analyzer_with(&["wifi"]), AbuseDetector::new(None));

        assert!(
            submit
                .execute(user.id, request("Library wifi disconnects during exams"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn empty_text_is_a_validation_error() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let submit = use_case(&store, analyzer_with(&["wifi"]), AbuseDetector::new(None));

        let err = submit.execute(user.id, request("")).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(message) if message == "Complaint text is required"));
    }

    #[tokio::test]
    async fn classifier_flag_rejects_submission() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let mut classifier = MockAbuseClassifier::new();
        classifier.expect_classify().returning(|_| {
            Ok(AbuseVerdict {
                is_abusive: true,
                detected_words: vec!["veiled threat".into()],
            })
        });
        let detector = AbuseDetector::new(Some(Arc::new(classifier)));
        assert_eq!(
            detector.detect("Library wifi disconnects during exams").await.fallback,
            FallbackOutcome::Flagged
        );
        let submit = use_case(&store, analyzer_with(&["wifi"]), detector);

        let err = submit
            .execute(user.id, request("Library wifi disconnects during exams"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::Abusive { .. }));
    }

    #[tokio::test]
    async fn first_complaint_opens_a_cluster() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let submit = use_case(
            &store,
            analyzer_with(&["library", "wifi", "exams"]),
            AbuseDetector::new(None),
        );

        let complaint = submit
            .execute(user.id, request("Library wifi disconnects during exams"))
            .await
            .unwrap();

        let cluster_id = complaint.cluster_id.expect("clustered");
        let cluster = ClusterRepository::find_by_id(&store, cluster_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cluster.keywords, vec!["library", "wifi", "exams"]);
        assert_eq!(cluster.problem_count, 1);
        assert_eq!(complaint.similar_complaints_count, 1);
        assert_eq!(complaint.urgency, Urgency::Normal);
        assert_eq!(complaint.username, "nisha");
        assert_eq!(complaint.severity, Severity::Poor);
    }

    #[tokio::test]
    async fn no_keywords_means_no_cluster() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let submit = use_case(&store, analyzer_with(&[]), AbuseDetector::new(None));

        let complaint = submit
            .execute(user.id, request("Hostel water cooler broken"))
            .await
            .unwrap();
        assert!(complaint.cluster_id.is_none());
        assert_eq!(complaint.similar_complaints_count, 0);
        assert!(ClusterRepository::find_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tenth_similar_complaint_turns_cluster_urgent() {
        let store = InMemoryStore::new();
        let user = student(&store).await;
        let submit = use_case(
            &store,
            analyzer_with(&["hostel", "water", "cooler"]),
            AbuseDetector::new(None),
        );

        let mut last = None;
        for _ in 0..10 {
            last = Some(
                submit
                    .execute(user.id, request("Hostel water cooler broken"))
                    .await
                    .unwrap(),
            );
        }
        let last = last.unwrap();
        assert_eq!(last.similar_complaints_count, 10);
        assert_eq!(last.urgency, Urgency::Urgent);

        for complaint in ComplaintRepository::find_all(&store).await.unwrap() {
            assert_eq!(complaint.urgency, Urgency::Urgent);
        }
    }
}
