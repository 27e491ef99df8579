//! Booking repository. Listings join the owning guest.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::base::{changed_columns, fetch_joined_page, on_day, search_any};
use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use super::entities::guest::{self, Entity as GuestEntity};
use super::entities::json::StringList;
use crate::domain::{
    Booking, BookingChange, BookingFilter, BookingId, BookingWithGuest, DocumentOwner, GuestId,
    GuestSnapshot, ProspectiveGuestId,
};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Check-in descending, then creation descending
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<BookingWithGuest>, u64)>;

    /// Bookings that came from one prospective guest, with their guest
    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<(Vec<BookingWithGuest>, u64)>;

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>>;

    async fn create(&self, booking: Booking) -> AppResult<Booking>;

    /// Apply `change` to the locked row, writing only the columns it
    /// touched. Returns the booking and the document keys it released;
    /// `None` when the booking does not exist.
    async fn edit(
        &self,
        id: BookingId,
        change: BookingChange,
    ) -> AppResult<Option<(Booking, Vec<String>)>>;

    async fn append_documents(
        &self,
        id: BookingId,
        keys: Vec<String>,
    ) -> AppResult<Option<Booking>>;

    async fn delete(&self, id: BookingId) -> AppResult<bool>;

    /// Every document key across one guest's bookings
    async fn documents_for_guest(&self, guest_id: GuestId) -> AppResult<Vec<String>>;

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>>;
}

pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Bookings joined with their guest, check-in descending
    async fn joined_page(
        &self,
        cond: Condition,
        page: PageRequest,
    ) -> AppResult<(Vec<BookingWithGuest>, u64)> {
        let select = BookingEntity::find()
            .find_also_related(GuestEntity)
            .filter(cond)
            .order_by_desc(booking::Column::CheckInDate)
            .order_by_desc(booking::Column::CreatedAt);

        let (rows, total) = fetch_joined_page(&self.db, select, page).await?;

        let bookings = rows
            .into_iter()
            .filter_map(|(booking, guest)| {
                guest.map(|guest| BookingWithGuest {
                    booking: Booking::from(booking),
                    guest: GuestSnapshot::from(guest),
                })
            })
            .collect();
        Ok((bookings, total))
    }
}

fn listing_condition(filter: &BookingFilter) -> Condition {
    let mut cond = Condition::all();

    let guest_match = search_any(
        filter.search.as_deref(),
        &[
            guest::Column::Name,
            guest::Column::Email,
            guest::Column::Phone,
            guest::Column::Address,
        ],
    );
    let booking_match = search_any(filter.search.as_deref(), &[booking::Column::GrcNumber]);
    if let (Some(guest_match), Some(booking_match)) = (guest_match, booking_match) {
        cond = cond.add(Condition::any().add(guest_match).add(booking_match));
    }

    if let Some(day) = filter.check_in_day {
        cond = cond.add(on_day(booking::Column::CheckInDate, day));
    }
    if let Some(day) = filter.check_out_day {
        cond = cond.add(on_day(booking::Column::CheckOutDate, day));
    }
    if let Some(dob) = filter.guest_dob {
        cond = cond.add(guest::Column::Dob.eq(dob));
    }
    cond
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<BookingWithGuest>, u64)> {
        self.joined_page(listing_condition(&filter), page).await
    }

    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<(Vec<BookingWithGuest>, u64)> {
        let cond = Condition::all()
            .add(booking::Column::ProspectiveGuestId.eq(prospect_id.into_uuid()));
        self.joined_page(cond, page).await
    }

    async fn find_by_id(&self, id: BookingId) -> AppResult<Option<Booking>> {
        let model = BookingEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Booking::from))
    }

    async fn create(&self, booking: Booking) -> AppResult<Booking> {
        let model = ActiveModel::from(booking)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(Booking::from(model))
    }

    async fn edit(
        &self,
        id: BookingId,
        change: BookingChange,
    ) -> AppResult<Option<(Booking, Vec<String>)>> {
        let txn = self.db.begin().await?;

        let Some(model) = BookingEntity::find_by_id(id.into_uuid())
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut booking = Booking::from(model.clone());
        let removed = change.apply_to(&mut booking)?;
        let model = changed_columns(model, ActiveModel::from(booking))
            .update(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some((Booking::from(model), removed)))
    }

    async fn append_documents(
        &self,
        id: BookingId,
        keys: Vec<String>,
    ) -> AppResult<Option<Booking>> {
        let txn = self.db.begin().await?;

        let Some(model) = BookingEntity::find_by_id(id.into_uuid())
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
        Ok(Some(Booking::from(model)))
    }

    async fn delete(&self, id: BookingId) -> AppResult<bool> {
        let result = BookingEntity::delete_by_id(id.into_uuid()).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn documents_for_guest(&self, guest_id: GuestId) -> AppResult<Vec<String>> {
        let lists: Vec<StringList> = BookingEntity::find()
            .select_only()
            .column(booking::Column::Documents)
            .filter(booking::Column::GuestId.eq(guest_id.into_uuid()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(lists.into_iter().flat_map(|list| list.0).collect())
    }

    async fn document_owners(&self) -> AppResult<Vec<DocumentOwner>> {
        let rows: Vec<(StringList, DateTime<Utc>)> = BookingEntity::find()
            .select_only()
            .column(booking::Column::Documents)
            .column(booking::Column::CreatedAt)
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
    use crate::domain::{CostItem, UpdateBooking};
    use crate::infra::repositories::entities::json::{CoStayerList, CostList};
    use chrono::{Duration, NaiveDate};
    use sea_orm::{DbBackend, MockDatabase, QueryTrait};

    fn sql_for(filter: &BookingFilter) -> String {
        BookingEntity::find()
            .find_also_related(GuestEntity)
            .filter(listing_condition(filter))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_search_spans_guest_and_grc() {
        let sql = sql_for(&BookingFilter {
            search: Some("rao".into()),
            ..Default::default()
        });
        assert!(sql.contains(r#"LOWER("guests"."name")"#));
        assert!(sql.contains(r#"LOWER("bookings"."grc_number")"#));
    }

    #[test]
    fn test_day_filters_are_half_open() {
        let sql = sql_for(&BookingFilter {
            check_in_day: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        });
        assert!(sql.contains(r#""bookings"."check_in_date" >= '2024-05-01"#));
        assert!(sql.contains(r#""bookings"."check_in_date" < '2024-05-02"#));
    }

    fn stored_model() -> booking::Model {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        booking::Model {
            id: uuid::Uuid::new_v4(),
            guest_id: uuid::Uuid::new_v4(),
            check_in_date: at,
            check_out_date: at + Duration::days(2),
            grc_number: "GRC-17".into(),
            room_number: "204".into(),
            co_stayers: CoStayerList(vec![]),
            additional_purchase: CostList(vec![]),
            damage_cost: CostList(vec![CostItem {
                item: "Lamp".into(),
                cost: "900".into(),
            }]),
            documents: StringList(vec!["1-a-id.pdf".into()]),
            prospective_guest_id: Some(uuid::Uuid::new_v4()),
            prospective_guest_name: Some("Acme Travel".into()),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_edit_sets_only_changed_columns() {
        let stored = stored_model();
        let mut written = stored.clone();
        written.grc_number = "GRC-18".into();

        let store = BookingStore::new(
            MockDatabase::new(DbBackend::Postgres)
                .append_query_results([vec![stored.clone()], vec![written]])
                .into_connection(),
        );

        let input: UpdateBooking = serde_json::from_value(serde_json::json!({
            "checkInDate": "2024-05-01T12:00:00Z",
            "checkOutDate": "2024-05-03T12:00:00Z",
            "grcNumber": "GRC-18",
            "roomNumber": "204"
        }))
        .unwrap();
        let (booking, removed) = store
            .edit(
                BookingId::from_uuid(stored.id),
                BookingChange::Details {
                    input,
                    removed_files: vec![],
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(booking.grc_number, "GRC-18");
        assert!(removed.is_empty());

        let log = format!("{:?}", store.db.into_transaction_log());
        let locked_at = log.find("FOR UPDATE").unwrap();
        let update = &log[locked_at..];
        let update = &update[update.find(" SET ").unwrap()..];
        let set_clause = &update[..update.find("RETURNING").unwrap()];
        assert!(set_clause.contains("grc_number"));
        assert!(set_clause.contains("updated_at"));
        for untouched in ["prospective_guest_name", "documents", "damage_cost", "room_number"] {
            assert!(!set_clause.contains(untouched), "{untouched} was written");
        }
    }
}
