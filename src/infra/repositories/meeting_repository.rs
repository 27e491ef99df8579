//! Meeting repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::base::fetch_page;
use super::entities::meeting::{self, ActiveModel, Entity as MeetingEntity};
use crate::domain::{Meeting, MeetingId, ProspectiveGuestId};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Meetings with one prospect, latest date first
    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<(Vec<Meeting>, u64)>;

    async fn find_by_id(&self, id: MeetingId) -> AppResult<Option<Meeting>>;

    async fn create(&self, meeting: Meeting) -> AppResult<Meeting>;

    async fn update(&self, meeting: Meeting) -> AppResult<Meeting>;

    async fn delete(&self, id: MeetingId) -> AppResult<bool>;
}

pub struct MeetingStore {
    db: DatabaseConnection,
}

impl MeetingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MeetingRepository for MeetingStore {
    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<(Vec<Meeting>, u64)> {
        let select = MeetingEntity::find()
            .filter(meeting::Column::ProspectiveGuestId.eq(prospect_id.into_uuid()))
            .order_by_desc(meeting::Column::Date)
            .order_by_desc(meeting::Column::CreatedAt);

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(Meeting::from).collect(), total))
    }

    async fn find_by_id(&self, id: MeetingId) -> AppResult<Option<Meeting>> {
        let model = MeetingEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Meeting::from))
    }

    async fn create(&self, meeting: Meeting) -> AppResult<Meeting> {
        let model = ActiveModel::from(meeting)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Meeting::from(model))
    }

    async fn update(&self, meeting: Meeting) -> AppResult<Meeting> {
        let model = ActiveModel::from(meeting)
            .update(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Meeting::from(model))
    }

    async fn delete(&self, id: MeetingId) -> AppResult<bool> {
        let result = MeetingEntity::delete_by_id(id.into_uuid()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
