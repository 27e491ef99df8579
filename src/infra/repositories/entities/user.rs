//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{RoleId, User, UserId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub password_hash: String,
    pub is_admin: bool,
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

impl Model {
    /// Convert to the domain entity; role links live in `user_roles`.
    pub fn into_user(self, role_ids: Vec<RoleId>) -> User {
        User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            role_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
