//! Purchase database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::json::StringList;
use crate::domain::{Purchase, PurchaseId, VendorId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub item: String,
    pub quantity: String,
    pub invoice_number: String,
    pub warranty_period: String,
    pub value: String,
    pub purchase_date: DateTimeUtc,
    #[sea_orm(column_type = "JsonBinary")]
    pub documents: StringList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id",
        on_delete = "Cascade"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Purchase {
    fn from(model: Model) -> Self {
        Purchase {
            id: PurchaseId::from_uuid(model.id),
            vendor_id: VendorId::from_uuid(model.vendor_id),
            item: model.item,
            quantity: model.quantity,
            invoice_number: model.invoice_number,
            warranty_period: model.warranty_period,
            value: model.value,
            purchase_date: model.purchase_date,
            documents: model.documents.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Purchase> for ActiveModel {
    fn from(purchase: Purchase) -> Self {
        ActiveModel {
            id: Set(purchase.id.into_uuid()),
            vendor_id: Set(purchase.vendor_id.into_uuid()),
            item: Set(purchase.item),
            quantity: Set(purchase.quantity),
            invoice_number: Set(purchase.invoice_number),
            warranty_period: Set(purchase.warranty_period),
            value: Set(purchase.value),
            purchase_date: Set(purchase.purchase_date),
            documents: Set(StringList(purchase.documents)),
            created_at: Set(purchase.created_at),
            updated_at: Set(purchase.updated_at),
        }
    }
}
