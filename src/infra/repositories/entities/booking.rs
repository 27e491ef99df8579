//! Booking database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::json::{CoStayerList, CostList, StringList};
use crate::domain::{Booking, BookingId, GuestId, ProspectiveGuestId, ProspectiveGuestRef};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub guest_id: Uuid,
    pub check_in_date: DateTimeUtc,
    pub check_out_date: DateTimeUtc,
    pub grc_number: String,
    pub room_number: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub co_stayers: CoStayerList,
    #[sea_orm(column_type = "JsonBinary")]
    pub additional_purchase: CostList,
    #[sea_orm(column_type = "JsonBinary")]
    pub damage_cost: CostList,
    #[sea_orm(column_type = "JsonBinary")]
    pub documents: StringList,
    pub prospective_guest_id: Option<Uuid>,
    pub prospective_guest_name: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::guest::Entity",
        from = "Column::GuestId",
        to = "super::guest::Column::Id",
        on_delete = "Cascade"
    )]
    Guest,
}

impl Related<super::guest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Booking {
    fn from(model: Model) -> Self {
        let prospective_guest = model
            .prospective_guest_id
            .map(|id| ProspectiveGuestRef {
                id: ProspectiveGuestId::from_uuid(id),
                name: model.prospective_guest_name.unwrap_or_default(),
            });
        Booking {
            id: BookingId::from_uuid(model.id),
            guest_id: GuestId::from_uuid(model.guest_id),
            check_in_date: model.check_in_date,
            check_out_date: model.check_out_date,
            grc_number: model.grc_number,
            room_number: model.room_number,
            co_stayers: model.co_stayers.0,
            additional_purchase: model.additional_purchase.0,
            damage_cost: model.damage_cost.0,
            documents: model.documents.0,
            prospective_guest,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Booking> for ActiveModel {
    fn from(booking: Booking) -> Self {
        let (prospect_id, prospect_name) = match booking.prospective_guest {
            Some(prospect) => (Some(prospect.id.into_uuid()), Some(prospect.name)),
            None => (None, None),
        };
        ActiveModel {
            id: Set(booking.id.into_uuid()),
            guest_id: Set(booking.guest_id.into_uuid()),
            check_in_date: Set(booking.check_in_date),
            check_out_date: Set(booking.check_out_date),
            grc_number: Set(booking.grc_number),
            room_number: Set(booking.room_number),
            co_stayers: Set(CoStayerList(booking.co_stayers)),
            additional_purchase: Set(CostList(booking.additional_purchase)),
            damage_cost: Set(CostList(booking.damage_cost)),
            documents: Set(StringList(booking.documents)),
            prospective_guest_id: Set(prospect_id),
            prospective_guest_name: Set(prospect_name),
            created_at: Set(booking.created_at),
            updated_at: Set(booking.updated_at),
        }
    }
}
