//! Prospective guest database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{ProspectiveGuest, ProspectiveGuestId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prospective_guests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    #[sea_orm(unique)]
    pub phone: String,
    pub company: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meeting::Entity")]
    Meeting,
}

impl Related<super::meeting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meeting.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProspectiveGuest {
    fn from(model: Model) -> Self {
        ProspectiveGuest {
            id: ProspectiveGuestId::from_uuid(model.id),
            name: model.name,
            email: model.email,
            phone: model.phone,
            company: model.company,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ProspectiveGuest> for ActiveModel {
    fn from(prospect: ProspectiveGuest) -> Self {
        ActiveModel {
            id: Set(prospect.id.into_uuid()),
            name: Set(prospect.name),
            email: Set(prospect.email),
            phone: Set(prospect.phone),
            company: Set(prospect.company),
            description: Set(prospect.description),
            created_at: Set(prospect.created_at),
            updated_at: Set(prospect.updated_at),
        }
    }
}
