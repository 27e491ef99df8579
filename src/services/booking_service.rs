//! Booking service - stays, cost ledgers and booking documents.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::upload_broker::{SignedUpload, UploadBroker};
use crate::domain::{
    Booking, BookingChange, BookingFilter, BookingId, BookingWithGuest, CostItem, CostKind,
    CreateBooking, Folder, GuestId, ProspectiveGuestId, UpdateBooking,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, Paginated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: BookingId,
    pub signed_urls: Vec<SignedUpload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingEdited {
    pub signed_urls: Vec<SignedUpload>,
    pub updated_booking: Booking,
}

#[async_trait]
pub trait BookingService: Send + Sync {
    async fn list_bookings(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Paginated<BookingWithGuest>>;

    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<Paginated<BookingWithGuest>>;

    async fn create_booking(
        &self,
        guest_id: GuestId,
        input: CreateBooking,
    ) -> AppResult<BookingCreated>;

    /// Attach confirmed uploads, returning the full document list
    async fn save_files(&self, id: BookingId, file_names: Vec<String>) -> AppResult<Vec<String>>;

    async fn update_booking(
        &self,
        id: BookingId,
        input: UpdateBooking,
        removed_files: Vec<String>,
    ) -> AppResult<BookingEdited>;

    async fn delete_booking(&self, id: BookingId) -> AppResult<()>;

    async fn add_cost(&self, id: BookingId, kind: CostKind, item: CostItem) -> AppResult<()>;

    async fn remove_cost(&self, id: BookingId, kind: CostKind, item: String) -> AppResult<()>;
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
    uploads: UploadBroker,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>, uploads: UploadBroker) -> Self {
        Self { uow, uploads }
    }

    async fn load(&self, id: BookingId) -> AppResult<Booking> {
        self.uow
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Booking")
    }

    async fn edit(&self, id: BookingId, change: BookingChange) -> AppResult<(Booking, Vec<String>)> {
        self.uow
            .bookings()
            .edit(id, change)
            .await?
            .ok_or_not_found("Booking")
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn list_bookings(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> AppResult<Paginated<BookingWithGuest>> {
        let (bookings, total) = self.uow.bookings().list(filter, page).await?;
        Ok(Paginated::new(bookings, page, total))
    }

    async fn list_for_prospect(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<Paginated<BookingWithGuest>> {
        let (bookings, total) = self
            .uow
            .bookings()
            .list_for_prospect(prospect_id, page)
            .await?;
        Ok(Paginated::new(bookings, page, total))
    }

    async fn create_booking(
        &self,
        guest_id: GuestId,
        input: CreateBooking,
    ) -> AppResult<BookingCreated> {
        self.uow
            .guests()
            .find_by_id(guest_id)
            .await?
            .ok_or_not_found("Guest")?;

        let booking = self.uow.bookings().create(Booking::new(guest_id, &input)).await?;
        tracing::info!(booking_id = %booking.id, guest_id = %guest_id, "Booking created");

        let signed_urls = self
            .uploads
            .issue_upload_urls(&input.documents, Folder::Booking)
            .await?;
        Ok(BookingCreated {
            booking_id: booking.id,
            signed_urls,
        })
    }

    async fn save_files(&self, id: BookingId, file_names: Vec<String>) -> AppResult<Vec<String>> {
        let booking = self
            .uow
            .bookings()
            .append_documents(id, file_names)
            .await?
            .ok_or_not_found("Booking")?;
        Ok(booking.documents)
    }

    async fn update_booking(
        &self,
        id: BookingId,
        input: UpdateBooking,
        removed_files: Vec<String>,
    ) -> AppResult<BookingEdited> {
        let new_files = input.documents.clone();
        let (booking, removed) = self
            .edit(
                id,
                BookingChange::Details {
                    input,
                    removed_files,
                },
            )
            .await?;

        self.uploads.delete_orphans(&removed, Folder::Booking).await?;
        let signed_urls = self
            .uploads
            .issue_upload_urls(&new_files, Folder::Booking)
            .await?;

        Ok(BookingEdited {
            signed_urls,
            updated_booking: booking,
        })
    }

    async fn delete_booking(&self, id: BookingId) -> AppResult<()> {
        let booking = self.load(id).await?;
        self.uow.bookings().delete(id).await?;
        tracing::info!(booking_id = %id, "Booking deleted");

        self.uploads
            .delete_orphans(&booking.documents, Folder::Booking)
            .await
    }

    async fn add_cost(&self, id: BookingId, kind: CostKind, item: CostItem) -> AppResult<()> {
        let item = CostItem {
            item: item.item.trim().to_string(),
            cost: item.cost.trim().to_string(),
        };
        self.edit(id, BookingChange::AddCost(kind, item)).await?;
        Ok(())
    }

    async fn remove_cost(&self, id: BookingId, kind: CostKind, item: String) -> AppResult<()> {
        self.edit(id, BookingChange::RemoveCost(kind, item)).await?;
        Ok(())
    }
}
