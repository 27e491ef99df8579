//! Prospective guest repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use super::base::{fetch_page, search_any};
use super::entities::booking::{self, Entity as BookingEntity};
use super::entities::meeting::{self, Entity as MeetingEntity};
use super::entities::prospective_guest::{self, ActiveModel, Entity as ProspectiveGuestEntity};
use crate::domain::{ProspectName, ProspectiveGuest, ProspectiveGuestId};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const UNIQUE_FIELDS: &[(&str, &str)] = &[("phone", "Mobile number already taken.")];

const SEARCH_COLUMNS: [prospective_guest::Column; 4] = [
    prospective_guest::Column::Name,
    prospective_guest::Column::Email,
    prospective_guest::Column::Phone,
    prospective_guest::Column::Company,
];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProspectiveGuestRepository: Send + Sync {
    async fn find_by_id(&self, id: ProspectiveGuestId) -> AppResult<Option<ProspectiveGuest>>;

    /// Newest first, optionally narrowed by a free-text search
    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<(Vec<ProspectiveGuest>, u64)>;

    async fn create(&self, prospect: ProspectiveGuest) -> AppResult<ProspectiveGuest>;

    /// Save the prospect and refresh the name snapshot on linked bookings
    async fn update(&self, prospect: ProspectiveGuest) -> AppResult<ProspectiveGuest>;

    /// Unlink bookings, drop meetings and delete the prospect
    async fn delete(&self, id: ProspectiveGuestId) -> AppResult<bool>;

    /// `{id, name}` of every prospect, alphabetical
    async fn names(&self) -> AppResult<Vec<ProspectName>>;
}

pub struct ProspectiveGuestStore {
    db: DatabaseConnection,
}

impl ProspectiveGuestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProspectiveGuestRepository for ProspectiveGuestStore {
    async fn find_by_id(&self, id: ProspectiveGuestId) -> AppResult<Option<ProspectiveGuest>> {
        let model = ProspectiveGuestEntity::find_by_id(id.into_uuid())
            .one(&self.db)
            .await?;
        Ok(model.map(ProspectiveGuest::from))
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<(Vec<ProspectiveGuest>, u64)> {
        let mut select =
            ProspectiveGuestEntity::find().order_by_desc(prospective_guest::Column::CreatedAt);
        if let Some(cond) = search_any(search.as_deref(), &SEARCH_COLUMNS) {
            select = select.filter(cond);
        }

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(ProspectiveGuest::from).collect(), total))
    }

    async fn create(&self, prospect: ProspectiveGuest) -> AppResult<ProspectiveGuest> {
        let model = ActiveModel::from(prospect)
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;
        Ok(ProspectiveGuest::from(model))
    }

    async fn update(&self, prospect: ProspectiveGuest) -> AppResult<ProspectiveGuest> {
        let txn = self.db.begin().await?;

        let model = ActiveModel::from(prospect)
            .update(&txn)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;

        BookingEntity::update_many()
            .col_expr(
                booking::Column::ProspectiveGuestName,
                Expr::value(model.name.clone()),
            )
            .filter(booking::Column::ProspectiveGuestId.eq(model.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(ProspectiveGuest::from(model))
    }

    async fn delete(&self, id: ProspectiveGuestId) -> AppResult<bool> {
        let txn = self.db.begin().await?;
        let id = id.into_uuid();

        BookingEntity::update_many()
            .col_expr(booking::Column::ProspectiveGuestId, Expr::value(None::<Uuid>))
            .col_expr(booking::Column::ProspectiveGuestName, Expr::value(None::<String>))
            .filter(booking::Column::ProspectiveGuestId.eq(id))
            .exec(&txn)
            .await?;
        MeetingEntity::delete_many()
            .filter(meeting::Column::ProspectiveGuestId.eq(id))
            .exec(&txn)
            .await?;
        let result = ProspectiveGuestEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn names(&self) -> AppResult<Vec<ProspectName>> {
        let rows: Vec<(Uuid, String)> = ProspectiveGuestEntity::find()
            .select_only()
            .column(prospective_guest::Column::Id)
            .column(prospective_guest::Column::Name)
            .order_by_asc(prospective_guest::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| ProspectName {
                id: ProspectiveGuestId::from_uuid(id),
                name,
            })
            .collect())
    }
}
