use crate::domain::{
    notes::{
        entity::{
            BundlePurchase, NewNotesBundle, NewNotesCategory, NewNotesFile, NotesBundle,
            NotesCategory, NotesFile, NotesPurchase, PaymentStatus, PurchaseList,
        },
        repository::NotesRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

const FILE_COLUMNS: &str =
    "id, category_id, title, description, file_url, price, is_free, uploaded_by, created_at";
const BUNDLE_COLUMNS: &str =
    "id, category_id, name, description, price, discount_percentage, file_ids, created_at";
const FILE_PURCHASE_COLUMNS: &str = "id, file_id, buyer_id, payment_proof, payment_status, \
                                     verified_by, verified_at, created_at";
const BUNDLE_PURCHASE_COLUMNS: &str = "id, bundle_id, buyer_id, payment_proof, payment_status, \
                                       verified_by, verified_at, created_at";

pub struct SqlxNotesRepository {
    pub pool: PgPool,
}

impl SqlxNotesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotesRepository for SqlxNotesRepository {
    async fn list_categories(&self) -> Result<Vec<NotesCategory>, DomainError> {
        let categories = sqlx::query_as::<_, NotesCategory>(
            "SELECT id, branch, semester, subject, created_at FROM notes_categories \
             ORDER BY branch, semester, subject",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<NotesCategory>, DomainError> {
        let category = sqlx::query_as::<_, NotesCategory>(
            "SELECT id, branch, semester, subject, created_at FROM notes_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    #[instrument(skip(self, category), fields(branch = %category.branch, semester = category.semester))]
    async fn create_category(
        &self,
        category: &NewNotesCategory,
    ) -> Result<NotesCategory, DomainError> {
        let created = sqlx::query_as::<_, NotesCategory>(
            "INSERT INTO notes_categories (id, branch, semester, subject) VALUES ($1, $2, $3, $4) \
             RETURNING id, branch, semester, subject, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(&category.branch)
        .bind(category.semester)
        .bind(&category.subject)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn files_in_category(&self, category_id: Uuid) -> Result<Vec<NotesFile>, DomainError> {
        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM notes_files WHERE category_id = $1 ORDER BY created_at"
        );
        let files = sqlx::query_as::<_, NotesFile>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(files)
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<NotesFile>, DomainError> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM notes_files WHERE id = $1");
        let file = sqlx::query_as::<_, NotesFile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }

    #[instrument(skip(self, file), fields(category_id = %file.category_id))]
    async fn create_file(&self, file: &NewNotesFile) -> Result<NotesFile, DomainError> {
        let sql = format!(
            "INSERT INTO notes_files (id, category_id, title, description, file_url, price, \
             is_free, uploaded_by) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {FILE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, NotesFile>(&sql)
            .bind(Uuid::now_v7())
            .bind(file.category_id)
            .bind(&file.title)
            .bind(&file.description)
            .bind(&file.file_url)
            .bind(file.price)
            .bind(file.is_free)
            .bind(file.uploaded_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn bundles_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<NotesBundle>, DomainError> {
        let sql = format!(
            "SELECT {BUNDLE_COLUMNS} FROM notes_bundles WHERE category_id = $1 ORDER BY created_at"
        );
        let bundles = sqlx::query_as::<_, NotesBundle>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(bundles)
    }

    async fn find_bundle(&self, id: Uuid) -> Result<Option<NotesBundle>, DomainError> {
        let sql = format!("SELECT {BUNDLE_COLUMNS} FROM notes_bundles WHERE id = $1");
        let bundle = sqlx::query_as::<_, NotesBundle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(bundle)
    }

    #[instrument(skip(self, bundle), fields(category_id = %bundle.category_id))]
    async fn create_bundle(&self, bundle: &NewNotesBundle) -> Result<NotesBundle, DomainError> {
        let sql = format!(
            "INSERT INTO notes_bundles (id, category_id, name, description, price, \
             discount_percentage, file_ids) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {BUNDLE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, NotesBundle>(&sql)
            .bind(Uuid::now_v7())
            .bind(bundle.category_id)
            .bind(&bundle.name)
            .bind(&bundle.description)
            .bind(bundle.price)
            .bind(bundle.discount_percentage)
            .bind(&bundle.file_ids)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    #[instrument(skip(self, payment_proof))]
    async fn create_file_purchase(
        &self,
        file_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<NotesPurchase, DomainError> {
        let sql = format!(
            "INSERT INTO notes_purchases (id, file_id, buyer_id, payment_proof) \
             VALUES ($1, $2, $3, $4) RETURNING {FILE_PURCHASE_COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, NotesPurchase>(&sql)
            .bind(Uuid::now_v7())
            .bind(file_id)
            .bind(buyer_id)
            .bind(payment_proof)
            .fetch_one(&self.pool)
            .await?;
        Ok(purchase)
    }

    #[instrument(skip(self, payment_proof))]
    async fn create_bundle_purchase(
        &self,
        bundle_id: Uuid,
        buyer_id: Uuid,
        payment_proof: &str,
    ) -> Result<BundlePurchase, DomainError> {
        let sql = format!(
            "INSERT INTO bundle_purchases (id, bundle_id, buyer_id, payment_proof) \
             VALUES ($1, $2, $3, $4) RETURNING {BUNDLE_PURCHASE_COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, BundlePurchase>(&sql)
            .bind(Uuid::now_v7())
            .bind(bundle_id)
            .bind(buyer_id)
            .bind(payment_proof)
            .fetch_one(&self.pool)
            .await?;
        Ok(purchase)
    }

    #[instrument(skip(self))]
    async fn set_file_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<NotesPurchase>, DomainError> {
        let sql = format!(
            "UPDATE notes_purchases SET payment_status = $2, verified_by = $3, verified_at = $4 \
             WHERE id = $1 RETURNING {FILE_PURCHASE_COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, NotesPurchase>(&sql)
            .bind(id)
            .bind(status)
            .bind(verified_by)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(purchase)
    }

    #[instrument(skip(self))]
    async fn set_bundle_purchase_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<BundlePurchase>, DomainError> {
        let sql = format!(
            "UPDATE bundle_purchases SET payment_status = $2, verified_by = $3, verified_at = $4 \
             WHERE id = $1 RETURNING {BUNDLE_PURCHASE_COLUMNS}"
        );
        let purchase = sqlx::query_as::<_, BundlePurchase>(&sql)
            .bind(id)
            .bind(status)
            .bind(verified_by)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(purchase)
    }

    async fn purchases_by_buyer(&self, buyer_id: Uuid) -> Result<PurchaseList, DomainError> {
        let files_sql = format!(
            "SELECT {FILE_PURCHASE_COLUMNS} FROM notes_purchases WHERE buyer_id = $1 \
             ORDER BY created_at DESC"
        );
        let bundles_sql = format!(
            "SELECT {BUNDLE_PURCHASE_COLUMNS} FROM bundle_purchases WHERE buyer_id = $1 \
             ORDER BY created_at DESC"
        );
        let files = sqlx::query_as::<_, NotesPurchase>(&files_sql)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await?;
        let bundles = sqlx::query_as::<_, BundlePurchase>(&bundles_sql)
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(PurchaseList { files, bundles })
    }

    async fn pending_purchases(&self) -> Result<PurchaseList, DomainError> {
        let files_sql = format!(
            "SELECT {FILE_PURCHASE_COLUMNS} FROM notes_purchases \
             WHERE payment_status = 'pending' ORDER BY created_at"
        );
        let bundles_sql = format!(
            "SELECT {BUNDLE_PURCHASE_COLUMNS} FROM bundle_purchases \
             WHERE payment_status = 'pending' ORDER BY created_at"
        );
        let files = sqlx::query_as::<_, NotesPurchase>(&files_sql)
            .fetch_all(&self.pool)
            .await?;
        let bundles = sqlx::query_as::<_, BundlePurchase>(&bundles_sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(PurchaseList { files, bundles })
    }

    async fn has_verified_access(&self, file_id: Uuid, buyer_id: Uuid) -> Result<bool, DomainError> {
        let allowed = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                SELECT 1 FROM notes_purchases \
                WHERE file_id = $1 AND buyer_id = $2 AND payment_status = 'verified' \
             ) OR EXISTS( \
                SELECT 1 FROM bundle_purchases bp \
                JOIN notes_bundles b ON b.id = bp.bundle_id \
                WHERE $1 = ANY(b.file_ids) AND bp.buyer_id = $2 \
                  AND bp.payment_status = 'verified' \
             )",
        )
        .bind(file_id)
        .bind(buyer_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(allowed)
    }
}
