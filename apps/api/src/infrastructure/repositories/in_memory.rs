//! Process-local store implementing every repository trait.
//!
//! Used for development without Postgres and by the integration tests. All
//! aggregates live behind one lock so that multi-table operations (cluster
//! fan-out, vote counters, cascading deletes) are atomic, matching what the
//! Postgres repositories do inside a transaction.

use crate::domain::{
    cluster::{entity::ClusterGroup, repository::ClusterRepository},
    complaint::{
        entity::{Complaint, ComplaintStats, ComplaintStatus, NewComplaint},
        repository::ComplaintRepository,
    },
    moderation::{
        abuse_log::{AbuseLog, NewAbuseLog},
        repository::AbuseLogRepository,
    },
    notes::{
        entity::{
            BundlePurchase, NewNotesBundle, NewNotesCategory, NewNotesFile, NotesBundle,
            NotesCategory, NotesFile, NotesPurchase, PaymentStatus, PurchaseList,
        },
        repository::NotesRepository,
    },
    shared::{errors::DomainError, urgency::Urgency},
    social::{
        reaction::{EMOJI_REACTIONS, Reaction, ReactionCount, Vote, VoteOutcome},
        repository::SocialRepository,
    },
    user::{
        entity::{NewUser, Role, User, UserStats},
        repository::UserRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{collections::HashSet, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    complaints: Vec<Complaint>,
    clusters: Vec<ClusterGroup>,
    abuse_logs: Vec<AbuseLog>,
    // (complaint, user) -> is_like
    likes: Vec<(Uuid, Uuid, bool)>,
    reactions: Vec<(Uuid, Uuid, Reaction)>,
    categories: Vec<NotesCategory>,
    files: Vec<NotesFile>,
    bundles: Vec<NotesBundle>,
    file_purchases: Vec<NotesPurchase>,
    bundle_purchases: Vec<BundlePurchase>,
}

impl MemoryState {
    fn remove_complaints(&mut self, ids: &HashSet<Uuid>) -> Vec<Complaint> {
        self.likes.retain(|(c, _, _)| !ids.contains(c));
        self.reactions.retain(|(c, _, _)| !ids.contains(c));
        let (removed, kept) = std::mem::take(&mut self.complaints)
            .into_iter()
            .partition(|c| ids.contains(&c.id));
        self.complaints = kept;
        removed
    }
}

/// Cheap to clone; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict("username already taken".into()));
        }
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("email already registered".into()));
        }
        if user.roll_number.is_some()
            && state.users.iter().any(|u| u.roll_number == user.roll_number)
        {
            return Err(DomainError::Conflict("roll number already registered".into()));
        }
        let created = User {
            id: Uuid::now_v7(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            roll_number: user.roll_number.clone(),
            user_type: user.user_type,
            banned_until: None,
            created_at: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut users = self.state.read().await.users.clone();
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(users)
    }

    async fn update_ban(
        &self,
        id: Uuid,
        banned_until: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
        user.banned_until = banned_until;
        Ok(())
    }

    async fn update_role(&self, id: Uuid, role: Role) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", id)))?;
        user.role = role;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<UserStats, DomainError> {
        let state = self.state.read().await;
        Ok(UserStats {
            total: state.users.len() as i64,
            banned: state.users.iter().filter(|u| u.is_banned_at(now)).count() as i64,
        })
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, DomainError> {
        let created = Complaint {
            id: Uuid::now_v7(),
            user_id: complaint.user_id,
            username: complaint.username.clone(),
            original_text: complaint.original_text.clone(),
            summary: complaint.summary.clone(),
            severity: complaint.severity,
            keywords: complaint.keywords.clone(),
            status: ComplaintStatus::Pending,
            solved: false,
            solved_by: None,
            solved_at: None,
            urgency: complaint.urgency,
            similar_complaints_count: complaint.similar_complaints_count,
            cluster_id: complaint.cluster_id,
            likes_count: 0,
            dislikes_count: 0,
            created_at: Utc::now(),
        };
        self.state.write().await.complaints.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Complaint>, DomainError> {
        let state = self.state.read().await;
        Ok(state.complaints.iter().find(|c| c.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Complaint>, DomainError> {
        let mut complaints = self.state.read().await.complaints.clone();
        newest_first(&mut complaints, |c| (c.created_at, c.id));
        Ok(complaints)
    }

    async fn leaderboard(&self, limit: i64, offset: i64) -> Result<Vec<Complaint>, DomainError> {
        let mut complaints = self.state.read().await.complaints.clone();
        complaints.sort_by(|a, b| {
            b.similar_complaints_count
                .cmp(&a.similar_complaints_count)
                .then(b.likes_count.cmp(&a.likes_count))
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(complaints
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update(&self, complaint: &Complaint) -> Result<Complaint, DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .complaints
            .iter_mut()
            .find(|c| c.id == complaint.id)
            .ok_or_else(|| DomainError::NotFound(format!("Complaint {} not found", complaint.id)))?;
        stored.original_text = complaint.original_text.clone();
        stored.status = complaint.status;
        stored.solved = complaint.solved;
        stored.solved_by = complaint.solved_by;
        stored.solved_at = complaint.solved_at;
        stored.urgency = complaint.urgency;
        stored.similar_complaints_count = complaint.similar_complaints_count;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Complaint>, DomainError> {
        let mut state = self.state.write().await;
        let ids = HashSet::from([id]);
        Ok(state.remove_complaints(&ids).into_iter().next())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Complaint>, DomainError> {
        let mut state = self.state.write().await;
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        Ok(state.remove_complaints(&ids))
    }

    async fn count_active_in_cluster(&self, cluster_id: Uuid) -> Result<i64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .complaints
            .iter()
            .filter(|c| c.cluster_id == Some(cluster_id) && !c.solved)
            .count() as i64)
    }

    async fn stats(&self) -> Result<ComplaintStats, DomainError> {
        let state = self.state.read().await;
        let count = |f: &dyn Fn(&Complaint) -> bool| state.complaints.iter().filter(|c| f(c)).count() as i64;
        Ok(ComplaintStats {
            total: state.complaints.len() as i64,
            pending: count(&|c| c.status == ComplaintStatus::Pending),
            solved: count(&|c| c.solved),
            urgent: count(&|c| c.urgency == Urgency::Urgent),
            critical: count(&|c| matches!(c.urgency, Urgency::Critical | Urgency::TopPriority)),
            emergency: count(&|c| c.urgency == Urgency::Emergency),
        })
    }
}

#[async_trait]
impl ClusterRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<ClusterGroup>, DomainError> {
        Ok(self.state.read().await.clusters.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClusterGroup>, DomainError> {
        let state = self.state.read().await;
        Ok(state.clusters.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, keywords: &[String]) -> Result<ClusterGroup, DomainError> {
        let cluster = ClusterGroup {
            id: Uuid::now_v7(),
            keywords: keywords.to_vec(),
            problem_count: 1,
            urgency: Urgency::Normal,
            last_updated: Utc::now(),
        };
        self.state.write().await.clusters.push(cluster.clone());
        Ok(cluster)
    }

    async fn apply_active_count(
        &self,
        cluster_id: Uuid,
        active_count: i64,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let count = i32::try_from(active_count)
            .map_err(|_| DomainError::InfrastructureError("Cluster count overflow".into()))?;
        let mut state = self.state.write().await;
        if let Some(cluster) = state.clusters.iter_mut().find(|c| c.id == cluster_id) {
            cluster.problem_count = count;
            cluster.urgency = urgency;
            cluster.last_updated = at;
        }
        for complaint in state
            .complaints
            .iter_mut()
            .filter(|c| c.cluster_id == Some(cluster_id) && !c.solved)
        {
            complaint.similar_complaints_count = count;
            complaint.urgency = urgency;
        }
        Ok(())
    }
}

#[async_trait]
impl AbuseLogRepository for InMemoryStore {
    async fn create(&self, log: &NewAbuseLog) -> Result<AbuseLog, DomainError> {
        let created = AbuseLog {
            id: Uuid::now_v7(),
            user_id: log.user_id,
            username: log.username.clone(),
            flagged_text: log.flagged_text.clone(),
            detected_words: log.detected_words.clone(),
            created_at: Utc::now(),
        };
        self.state.write().await.abuse_logs.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<AbuseLog>, DomainError> {
        let mut logs = self.state.read().await.abuse_logs.clone();
        newest_first(&mut logs, |l| (l.created_at, l.id));
        Ok(logs)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.state.read().await.abuse_logs.len() as i64)
    }
}

#[async_trait]
impl SocialRepository for InMemoryStore {
    async fn toggle_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        vote: Vote,
    ) -> Result<VoteOutcome, DomainError> {
        let mut state = self.state.write().await;
        if !state.complaints.iter().any(|c| c.id == complaint_id) {
            return Err(DomainError::NotFound(format!(
                "Complaint {} not found",
                complaint_id
            )));
        }

        let is_like = vote.is_like();
        let existing = state
            .likes
            .iter()
            .position(|(c, u, _)| *c == complaint_id && *u == user_id);
        let (like_delta, dislike_delta, current) = match existing {
            Some(idx) if state.likes[idx].2 == is_like => {
                state.likes.remove(idx);
                if is_like { (-1, 0, None) } else { (0, -1, None) }
            }
            Some(idx) => {
                state.likes[idx].2 = is_like;
                if is_like { (1, -1, Some(vote)) } else { (-1, 1, Some(vote)) }
            }
            None => {
                state.likes.push((complaint_id, user_id, is_like));
                if is_like { (1, 0, Some(vote)) } else { (0, 1, Some(vote)) }
            }
        };

        let complaint = state
            .complaints
            .iter_mut()
            .find(|c| c.id == complaint_id)
            .ok_or_else(|| DomainError::NotFound(format!("Complaint {} not found", complaint_id)))?;
        complaint.likes_count = (complaint.likes_count + like_delta).max(0);
        complaint.dislikes_count = (complaint.dislikes_count + dislike_delta).max(0);

        Ok(VoteOutcome {
            current,
            likes_count: complaint.likes_count,
            dislikes_count: complaint.dislikes_count,
        })
    }

    async fn user_vote(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Vote>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .likes
            .iter()
            .find(|(c, u, _)| *c == complaint_id && *u == user_id)
            .map(|(_, _, is_like)| if *is_like { Vote::Like } else { Vote::Dislike }))
    }

    async fn toggle_reaction(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
        reaction: Reaction,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let key = (complaint_id, user_id, reaction);
        if let Some(idx) = state.reactions.iter().position(|r| *r == key) {
            state.reactions.remove(idx);
            Ok(false)
        } else {
            state.reactions.push(key);
            Ok(true)
        }
    }

    async fn reaction_counts(&self, complaint_id: Uuid) -> Result<Vec<ReactionCount>, DomainError> {
        let state = self.state.read().await;
        let mut counts: Vec<ReactionCount> = EMOJI_REACTIONS
            .iter()
            .map(|emoji| ReactionCount {
                emoji: emoji.as_str().to_string(),
                count: state
                    .reactions
                    .iter()
                    .filter(|(c, _, r)| *c == complaint_id && r == emoji)
                    .count() as i64,
            })
            .filter(|rc| rc.count > 0)
            .collect();
        counts.sort_by(|a, b| a.emoji.cmp(&b.emoji));
        Ok(counts)
    }

    async fn user_reactions(
        &self,
        complaint_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Reaction>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .reactions
            .iter()
            .filter(|(c, u, _)| *c == complaint_id && *u == user_id)
            .map(|(_, _, r)| *r)
            .collect())
    }
}

#[async_trait]
impl NotesRepository for InMemoryStore {
    async fn list_categories(&self) -> Result<Vec<NotesCategory>, DomainError> {
        let mut categories = self.state.read().await.categories.clone();
        categories.sort_by(|a, b| {
            (&a.branch, a.semester, &a.subject).cmp(&(&b.branch, b.semester, &b.subject))
        });
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<NotesCategory>, DomainError> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(
        &self,
        category: &NewNotesCategory,
    ) -> Result<NotesCategory, DomainError> {
        let created = NotesCategory {
            id: Uuid::now_v7(),
            branch: category.branch.clone(),
            semester: category.semester,
            subject: category.subject.clone(),
            created_at: Utc::now(),
        };
        self.state.write().await.categories.push(created.clone());
        Ok(created)
    }

    async fn files_in_category(&self, category_id: Uuid) -> Result<Vec<NotesFile>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .files
            .iter()
            .filter(|f| f.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<NotesFile>, DomainError> {
        let state = self.state.read().await;
        Ok(state.files.iter().find(|f| f.id == id).cloned())
    }

    async fn create_file(&self, file: &NewNotesFile) -> Result<NotesFile, DomainError> {
        let mut state = self.state.write().await;
        if !state.categories.iter().any(|c| c.id == file.category_id) {
            return Err(DomainError::NotFound("Category not found".into()));
        }
        let created = NotesFile {
            id: Uuid::now_v7(),
            category_id: file.category_id,
            title: file.title.clone(),
            description: file.description.clone(),
            file_url: file.file_url.clone(),
            price: file.price,
            is_free: file.is_free,
            uploaded_by: file.uploaded_by,
            created_at: Utc::now(),
        };
        state.files.push(created.clone());
        Ok(created)
    }

    async fn bundles_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<NotesBundle>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .bundles
            .iter()
            .filter(|b| b.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_bundle(&self, id: Uuid) -> Result<Option<NotesBundle>, DomainError> {
        let state = self.state.read().await;
        Ok(state.bundles.iter().find(|b| b.id == id).cloned())
    }

    async fn create_bundle(&self, bundle: &NewNotesBundle) -> Result<NotesBundle, DomainError> {
        let mut state = self.state.write().await;
        if !state.categories.iter().any(|c| c.id == bundle.category_id) {
            return Err(DomainError::NotFound("Category not found".into()));
        }
        let created = NotesBundle {
            id: Uuid::now_v7(),
            category_id: bundle.category_id,
            name: bundle.name.clone(),
            description: bundle.description.clone(),
            price: bundle.price,
            discount_percentage: bundle.discount_percentage,
            file_ids: bundle.file_ids.clone(),
            created_at: Utc::now(),
        };
        state.bundles.push(created.clone());
        Ok(created)
    }

    async fn create_file_purchase(
        &self,
        file_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<NotesPurchase, DomainError> {
        let purchase = NotesPurchase {
            id: Uuid::now_v7(),
            file_id,
            buyer_id,
            payment_proof: payment_proof.to_string(),
            payment_status: PaymentStatus::Pending,
            verified_by: None,
            verified_at: None,
            created_at: Utc::now(),
        };
        self.state.write().await.file_purchases.push(purchase.clone());
        Ok(purchase)
    }

    async fn create_bundle_purchase(
        &self,
        bundle_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<BundlePurchase, DomainError> {
        let purchase = BundlePurchase {
            id: Uuid::now_v7(),
            bundle_id,
            buyer_id,
            payment_proof: payment_proof.to_string(),
            payment_status: PaymentStatus::Pending,
            verified_by: None,
            verified_at: None,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .bundle_purchases
            .push(purchase.clone());
        Ok(purchase)
    }

    async fn set_file_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<NotesPurchase>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.file_purchases.iter_mut().find(|p| p.id == id).map(|p| {
            p.payment_status = status;
            p.verified_by = Some(verified_by);
            p.verified_at = Some(at);
            p.clone()
        }))
    }

    async fn set_bundle_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<BundlePurchase>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state
            .bundle_purchases
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| {
                p.payment_status = status;
                p.verified_by = Some(verified_by);
                p.verified_at = Some(at);
                p.clone()
            }))
    }

    async fn purchases_by_buyer(&self, buyer_id: Uuid) -> Result<PurchaseList, DomainError> {
        let state = self.state.read().await;
        let mut files: Vec<NotesPurchase> = state
            .file_purchases
            .iter()
            .filter(|p| p.buyer_id == buyer_id)
            .cloned()
            .collect();
        let mut bundles: Vec<BundlePurchase> = state
            .bundle_purchases
            .iter()
            .filter(|p| p.buyer_id == buyer_id)
            .cloned()
            .collect();
        newest_first(&mut files, |p| (p.created_at, p.id));
        newest_first(&mut bundles, |p| (p.created_at, p.id));
        Ok(PurchaseList { files, bundles })
    }

    async fn pending_purchases(&self) -> Result<PurchaseList, DomainError> {
        let state = self.state.read().await;
        Ok(PurchaseList {
            files: state
                .file_purchases
                .iter()
                .filter(|p| p.payment_status == PaymentStatus::Pending)
                .cloned()
                .collect(),
            bundles: state
                .bundle_purchases
                .iter()
                .filter(|p| p.payment_status == PaymentStatus::Pending)
                .cloned()
                .collect(),
        })
    }

    async fn has_verified_access(&self, file_id: Uuid, buyer_id: Uuid) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        let direct = state.file_purchases.iter().any(|p| {
            p.file_id == file_id
                && p.buyer_id == buyer_id
                && p.payment_status == PaymentStatus::Verified
        });
        let via_bundle = state.bundle_purchases.iter().any(|p| {
            p.buyer_id == buyer_id
                && p.payment_status == PaymentStatus::Verified
                && state
                    .bundles
                    .iter()
                    .any(|b| b.id == p.bundle_id && b.file_ids.contains(&file_id))
        });
        Ok(direct || via_bundle)
    }
}
