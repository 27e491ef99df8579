//! Vendor repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::base::{fetch_page, search_any};
use super::entities::vendor::{self, ActiveModel, Entity as VendorEntity};
use crate::domain::{Vendor, VendorId};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const UNIQUE_FIELDS: &[(&str, &str)] = &[("phone", "Mobile number already taken.")];

const SEARCH_COLUMNS: [vendor::Column; 6] = [
    vendor::Column::Name,
    vendor::Column::Email,
    vendor::Column::Phone,
    vendor::Column::Address,
    vendor::Column::Gstin,
    vendor::Column::ContactPerson,
];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VendorRepository: Send + Sync {
    async fn find_by_id(&self, id: VendorId) -> AppResult<Option<Vendor>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Vendor>>;

    /// Newest first, optionally narrowed by a free-text search
    async fn list(&self, search: Option<String>, page: PageRequest) -> AppResult<(Vec<Vendor>, u64)>;

    async fn create(&self, vendor: Vendor) -> AppResult<Vendor>;

    async fn update(&self, vendor: Vendor) -> AppResult<Vendor>;

    /// Deletes the vendor; purchases follow through the foreign key
    async fn delete(&self, id: VendorId) -> AppResult<bool>;
}

pub struct VendorStore {
    db: DatabaseConnection,
}

impl VendorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VendorRepository for VendorStore {
    async fn find_by_id(&self, id: VendorId) -> AppResult<Option<Vendor>> {
        let model = VendorEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Vendor::from))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Vendor>> {
        let model = VendorEntity::find()
            .filter(vendor::Column::Phone.eq(phone.trim()))
            .one(&self.db)
            .await?;
        Ok(model.map(Vendor::from))
    }

    async fn list(&self, search: Option<String>, page: PageRequest) -> AppResult<(Vec<Vendor>, u64)> {
        let mut select = VendorEntity::find().order_by_desc(vendor::Column::CreatedAt);
        if let Some(cond) = search_any(search.as_deref(), &SEARCH_COLUMNS) {
            select = select.filter(cond);
        }

        let (models, total) = fetch_page(&self.db, select, page).await?;
        Ok((models.into_iter().map(Vendor::from).collect(), total))
    }

    async fn create(&self, vendor: Vendor) -> AppResult<Vendor> {
        let model = ActiveModel::from(vendor)
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;
        Ok(Vendor::from(model))
    }

    async fn update(&self, vendor: Vendor) -> AppResult<Vendor> {
        let model = ActiveModel::from(vendor)
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;
        Ok(Vendor::from(model))
    }

    async fn delete(&self, id: VendorId) -> AppResult<bool> {
        let result = VendorEntity::delete_by_id(id.into_uuid()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
