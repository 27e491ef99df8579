//! Guest repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::base::{changed_columns, fetch_page, search_any};
use super::entities::guest::{self, ActiveModel, Entity as GuestEntity};
use super::entities::json::StringList;
use crate::domain::{detach_documents, DocumentOwner, Guest, GuestDetails, GuestId};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const UNIQUE_FIELDS: &[(&str, &str)] = &[("phone", "Mobile number already taken.")];

const SEARCH_COLUMNS: [guest::Column; 4] = [
    guest::Column::Name,
    guest::Column::Email,
    guest::Column::Phone,
    guest::Column::Address,
];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn find_by_id(&self, id: GuestId) -> AppResult<Option<Guest>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Guest>>;

    /// Newest first, optionally narrowed by a free-text search
    async fn list(&self, search: Option<String>, page: PageRequest) -> AppResult<(Vec<Guest>, u64)>;

    async fn create(&self, guest: Guest) -> AppResult<Guest>;

    /// Replace the details and drop `removed_files` on the locked row,
    /// writing only changed columns. Returns the guest and the keys actually
    /// released; `None` when the guest does not exist.
    async fn edit(
        &self,
        id: GuestId,
        details: GuestDetails,
        removed_files: Vec<String>,
    ) -> AppResult<Option<(Guest, Vec<String>)>>;

    /// Append confirmed upload keys; `None` when the guest does not exist
    async fn append_documents(&self, id: GuestId, keys: Vec<String>) -> AppResult<Option<Guest>>;

    /// Deletes the guest; bookings follow through the foreign key
    async fn delete(&self, id: GuestId) -> AppResult<bool>;

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>>;
}

pub struct GuestStore {
    db: DatabaseConnection,
}

impl GuestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuestRepository for GuestStore {
    async fn find_by_id(&self, id: GuestId) -> AppResult<Option<Guest>> {
        let model = GuestEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Guest::from))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Guest>> {
        let model = GuestEntity::find()
            .filter(guest::Column::Phone.eq(phone.trim()))
            .one(&self.db)
            .await?;
        Ok(model.map(Guest::from))
    }

    async fn list(&self, search: Option<String>, page: PageRequest) -> AppResult<(Vec<Guest>, u64)> {
        let mut select = GuestEntity::find().order_by_desc(guest::Column::CreatedAt);
        if let Some(cond) = search_any(search.as_deref(), &SEARCH_COLUMNS) {
            select = select.filter(cond);
        }

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(Guest::from).collect(), total))
    }

    async fn create(&self, guest: Guest) -> AppResult<Guest> {
        let model = ActiveModel::from(guest)
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;
        Ok(Guest::from(model))
    }

    async fn edit(
        &self,
        id: GuestId,
        details: GuestDetails,
        removed_files: Vec<String>,
    ) -> AppResult<Option<(Guest, Vec<String>)>> {
        let txn = self.db.begin().await?;

        let Some(model) = GuestEntity::find_by_id(id.into_uuid())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut guest = Guest::from(model.clone());
        let removed = detach_documents(&mut guest.documents, &removed_files);
        guest.apply(details);
        let model = changed_columns(model, ActiveModel::from(guest))
            .update(&txn)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;

        txn.commit().await?;
        Ok(Some((Guest::from(model), removed)))
    }

    async fn append_documents(&self, id: GuestId, keys: Vec<String>) -> AppResult<Option<Guest>> {
        let txn = self.db.begin().await?;

        let Some(model) = GuestEntity::find_by_id(id.into_uuid())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut documents = model.documents.0.clone();
        documents.extend(keys);
        let mut active: ActiveModel = model.into();
        active.documents = Set(StringList(documents));
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(Guest::from(model)))
    }

    async fn delete(&self, id: GuestId) -> AppResult<bool> {
        let result = GuestEntity::delete_by_id(id.into_uuid()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>> {
        let rows: Vec<(StringList, DateTime<Utc>)> = GuestEntity::find()
            .select_only()
            .column(guest::Column::Documents)
            .column(guest::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(documents, created_at)| DocumentOwner {
                documents: documents.0,
                created_at,
            })
            .collect())
    }
}
