//! Guest database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::json::StringList;
use crate::domain::{Guest, GuestId, GuestSnapshot};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub dob: Date,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub documents: StringList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Guest {
    fn from(model: Model) -> Self {
        Guest {
            id: GuestId::from_uuid(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            dob: model.dob,
            address: model.address,
            documents: model.documents.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Model> for GuestSnapshot {
    fn from(model: Model) -> Self {
        GuestSnapshot {
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            dob: model.dob,
        }
    }
}

impl From<Guest> for ActiveModel {
    fn from(guest: Guest) -> Self {
        ActiveModel {
            id: Set(guest.id.into_uuid()),
            name: Set(guest.name),
            email: Set(guest.email),
            phone: Set(guest.phone),
            dob: Set(guest.dob),
            address: Set(guest.address),
            documents: Set(StringList(guest.documents)),
            created_at: Set(guest.created_at),
            updated_at: Set(guest.updated_at),
        }
    }
}
