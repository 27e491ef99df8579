//! Purchase repository. Listings join the vendor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::base::{changed_columns, day_range, fetch_joined_page, search_any};
use super::entities::json::StringList;
use super::entities::purchase::{self, ActiveModel, Entity as PurchaseEntity};
use super::entities::vendor::{self, Entity as VendorEntity};
use crate::domain::{
    detach_documents, DocumentOwner, Purchase, PurchaseFilter, PurchaseId, PurchaseInput,
    PurchaseWithVendor, VendorId, VendorSnapshot,
};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Purchase date descending, then creation descending
    async fn list(
        &self,
        filter: PurchaseFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<PurchaseWithVendor>, u64)>;

    async fn find_by_id(&self, id: PurchaseId) -> AppResult<Option<Purchase>>;

    async fn create(&self, purchase: Purchase) -> AppResult<Purchase>;

    /// Apply `input` and drop `removed_files` on the locked row, writing only
    /// changed columns. Returns the purchase and the keys actually released.
    async fn edit(
        &self,
        id: PurchaseId,
        input: PurchaseInput,
        removed_files: Vec<String>,
    ) -> AppResult<Option<(Purchase, Vec<String>)>>;

    async fn append_documents(
        &self,
        id: PurchaseId,
        keys: Vec<String>,
    ) -> AppResult<Option<Purchase>>;

    async fn delete(&self, id: PurchaseId) -> AppResult<bool>;

    /// Every document key across one vendor's purchases
    async fn documents_for_vendor(&self, vendor_id: VendorId) -> AppResult<Vec<String>>;

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>>;
}

pub struct PurchaseStore {
    db: DatabaseConnection,
}

impl PurchaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn listing_condition(filter: &PurchaseFilter) -> Condition {
    let mut cond = Condition::all();

    let vendor_match = search_any(
        filter.search.as_deref(),
        &[
            vendor::Column::Name,
            vendor::Column::Email,
            vendor::Column::Phone,
            vendor::Column::Address,
            vendor::Column::Gstin,
        ],
    );
    let purchase_match = search_any(
        filter.search.as_deref(),
        &[purchase::Column::Item, purchase::Column::InvoiceNumber],
    );
    if let (Some(vendor_match), Some(purchase_match)) = (vendor_match, purchase_match) {
        cond = cond.add(Condition::any().add(vendor_match).add(purchase_match));
    }

    // Both bounds cover their whole day
    if let Some(day) = filter.start_day {
        let (start, _) = day_range(day);
        cond = cond.add(purchase::Column::PurchaseDate.gte(start));
    }
    if let Some(day) = filter.end_day {
        let (_, end) = day_range(day);
        cond = cond.add(purchase::Column::PurchaseDate.lt(end));
    }
    cond
}

#[async_trait]
impl PurchaseRepository for PurchaseStore {
    async fn list(
        &self,
        filter: PurchaseFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<PurchaseWithVendor>, u64)> {
        let select = PurchaseEntity::find()
            .find_also_related(VendorEntity)
            .filter(listing_condition(&filter))
            .order_by_desc(purchase::Column::PurchaseDate)
            .order_by_desc(purchase::Column::CreatedAt);

        let (rows, total) = fetch_joined_page(&self.db, select, page).await?;

        let purchases = rows
            .into_iter()
            .filter_map(|(purchase, vendor)| {
                vendor.map(|vendor| PurchaseWithVendor {
                    purchase: Purchase::from(purchase),
                    vendor: VendorSnapshot::from(vendor),
                })
            })
            .collect();
        Ok((purchases, total))
    }

    async fn find_by_id(&self, id: PurchaseId) -> AppResult<Option<Purchase>> {
        let model = PurchaseEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Purchase::from))
    }

    async fn create(&self, purchase: Purchase) -> AppResult<Purchase> {
        let model = ActiveModel::from(purchase)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Purchase::from(model))
    }

    async fn edit(
        &self,
        id: PurchaseId,
        input: PurchaseInput,
        removed_files: Vec<String>,
    ) -> AppResult<Option<(Purchase, Vec<String>)>> {
        let txn = self.db.begin().await?;

        let Some(model) = PurchaseEntity::find_by_id(id.into_uuid())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut purchase = Purchase::from(model.clone());
        let removed = detach_documents(&mut purchase.documents, &removed_files);
        purchase.apply(&input);
        let model = changed_columns(model, ActiveModel::from(purchase))
            .update(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some((Purchase::from(model), removed)))
    }

    async fn append_documents(
        &self,
        id: PurchaseId,
        keys: Vec<String>,
    ) -> AppResult<Option<Purchase>> {
        let txn = self.db.begin().await?;

        let Some(model) = PurchaseEntity::find_by_id(id.into_uuid())
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
        Ok(Some(Purchase::from(model)))
    }

    async fn delete(&self, id: PurchaseId) -> AppResult<bool> {
        let result = PurchaseEntity::delete_by_id(id.into_uuid()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn documents_for_vendor(&self, vendor_id: VendorId) -> AppResult<Vec<String>> {
        let lists: Vec<StringList> = PurchaseEntity::find()
            .select_only()
            .column(purchase::Column::Documents)
            .filter(purchase::Column::VendorId.eq(vendor_id.into_uuid()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(lists.into_iter().flat_map(|list| list.0).collect())
    }

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>> {
        let rows: Vec<(StringList, DateTime<Utc>)> = PurchaseEntity::find()
            .select_only()
            .column(purchase::Column::Documents)
            .column(purchase::Column::CreatedAt)
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_end_day_is_inclusive() {
        let filter = PurchaseFilter {
            start_day: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_day: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..Default::default()
        };
        let sql = PurchaseEntity::find()
            .find_also_related(VendorEntity)
            .filter(listing_condition(&filter))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""purchases"."purchase_date" >= '2024-03-01"#));
        assert!(sql.contains(r#""purchases"."purchase_date" < '2024-04-01"#));
    }
}
