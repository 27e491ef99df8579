//! Meeting database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::json::StringList;
use crate::domain::{Meeting, MeetingId, ProspectiveGuestId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "meetings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prospective_guest_id: Uuid,
    pub date: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub attendees: StringList,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prospective_guest::Entity",
        from = "Column::ProspectiveGuestId",
        to = "super::prospective_guest::Column::Id",
        on_delete = "Cascade"
    )]
    ProspectiveGuest,
}

impl Related<super::prospective_guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProspectiveGuest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Meeting {
    fn from(model: Model) -> Self {
        Meeting {
            id: MeetingId::from_uuid(model.id),
            prospective_guest_id: ProspectiveGuestId::from_uuid(model.prospective_guest_id),
            date: model.date,
            remarks: model.remarks,
            attendees: model.attendees.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Meeting> for ActiveModel {
    fn from(meeting: Meeting) -> Self {
        ActiveModel {
            id: Set(meeting.id.into_uuid()),
            prospective_guest_id: Set(meeting.prospective_guest_id.into_uuid()),
            date: Set(meeting.date),
            remarks: Set(meeting.remarks),
            attendees: Set(StringList(meeting.attendees)),
            created_at: Set(meeting.created_at),
            updated_at: Set(meeting.updated_at),
        }
    }
}
