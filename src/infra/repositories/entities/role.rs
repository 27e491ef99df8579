//! Role database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::json::PermissionList;
use crate::domain::{Role, RoleId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub role_name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: PermissionList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRole,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Role {
    fn from(model: Model) -> Self {
        Role {
            id: RoleId::from_uuid(model.id),
            role_name: model.role_name,
            permissions: model.permissions.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
