//! Vendor database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Vendor, VendorId, VendorSnapshot};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub contact_person: String,
    pub gstin: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vendor {
    fn from(model: Model) -> Self {
        Vendor {
            id: VendorId::from_uuid(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            contact_person: model.contact_person,
            gstin: model.gstin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for VendorSnapshot {
    fn from(model: Model) -> Self {
        VendorSnapshot {
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            gstin: model.gstin,
        }
    }
}

impl From<Vendor> for ActiveModel {
    fn from(vendor: Vendor) -> Self {
        ActiveModel {
            id: Set(vendor.id.into_uuid()),
            name: Set(vendor.name),
            email: Set(vendor.email),
            phone: Set(vendor.phone),
            address: Set(vendor.address),
            contact_person: Set(vendor.contact_person),
            gstin: Set(vendor.gstin),
            created_at: Set(vendor.created_at),
            updated_at: Set(vendor.updated_at),
        }
    }
}
