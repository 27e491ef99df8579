//! Guest service - check-in registration and guest documents.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::parallel;
use super::upload_broker::{SignedUpload, UploadBroker};
use crate::domain::{CreateGuest, Folder, Guest, GuestFiles, GuestId, GuestView, UpdateGuest};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, Paginated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestCreated {
    pub guest_id: GuestId,
    pub signed_urls: Vec<SignedUpload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestEdited {
    pub signed_urls: Vec<SignedUpload>,
    pub updated_guest: GuestView,
}

#[async_trait]
pub trait GuestService: Send + Sync {
    /// Guest registered under `phone`, if any
    async fn find_by_phone(&self, phone: String) -> AppResult<Option<Guest>>;

    async fn list_guests(&self, search: Option<String>, page: PageRequest)
        -> AppResult<Paginated<Guest>>;

    /// Register the guest and issue upload URLs for its documents
    async fn create_guest(&self, input: CreateGuest) -> AppResult<GuestCreated>;

    /// Attach confirmed uploads
    async fn save_files(&self, id: GuestId, file_names: Vec<String>) -> AppResult<GuestFiles>;

    async fn update_guest(
        &self,
        id: GuestId,
        input: UpdateGuest,
        removed_files: Vec<String>,
    ) -> AppResult<GuestEdited>;

    /// Delete the guest, its bookings and every file they reference
    async fn delete_guest(&self, id: GuestId) -> AppResult<()>;
}

pub struct GuestManager<U: UnitOfWork> {
    uow: Arc<U>,
    uploads: UploadBroker,
}

impl<U: UnitOfWork> GuestManager<U> {
    pub fn new(uow: Arc<U>, uploads: UploadBroker) -> Self {
        Self { uow, uploads }
    }
}

#[async_trait]
impl<U: UnitOfWork> GuestService for GuestManager<U> {
    async fn find_by_phone(&self, phone: String) -> AppResult<Option<Guest>> {
        self.uow.guests().find_by_phone(phone.trim()).await
    }

    async fn list_guests(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Guest>> {
        let (guests, total) = self.uow.guests().list(search, page).await?;
        Ok(Paginated::new(guests, page, total))
    }

    async fn create_guest(&self, input: CreateGuest) -> AppResult<GuestCreated> {
        let guest = self.uow.guests().create(Guest::new(input.details())).await?;
        tracing::info!(guest_id = %guest.id, "Guest registered");

        let signed_urls = self
            .uploads
            .issue_upload_urls(&input.documents, Folder::Guest)
            .await?;
        Ok(GuestCreated {
            guest_id: guest.id,
            signed_urls,
        })
    }

    async fn save_files(&self, id: GuestId, file_names: Vec<String>) -> AppResult<GuestFiles> {
        let guest = self
            .uow
            .guests()
            .append_documents(id, file_names)
            .await?
            .ok_or_not_found("Guest")?;
        Ok(GuestFiles::from(guest))
    }

    async fn update_guest(
        &self,
        id: GuestId,
        input: UpdateGuest,
        removed_files: Vec<String>,
    ) -> AppResult<GuestEdited> {
        let (guest, removed) = self
            .uow
            .guests()
            .edit(id, input.details(), removed_files)
            .await?
            .ok_or_not_found("Guest")?;

        self.uploads.delete_orphans(&removed, Folder::Guest).await?;
        let signed_urls = self
            .uploads
            .issue_upload_urls(&input.documents, Folder::Guest)
            .await?;

        Ok(GuestEdited {
            signed_urls,
            updated_guest: GuestView::from(&guest),
        })
    }

    async fn delete_guest(&self, id: GuestId) -> AppResult<()> {
        let guest = self.uow.guests().find_by_id(id).await?.ok_or_not_found("Guest")?;
        let booking_files = self.uow.bookings().documents_for_guest(id).await?;

        // bookings go with the guest row
        self.uow.guests().delete(id).await?;
        tracing::info!(guest_id = %id, "Guest deleted");

        parallel::join2(
            self.uploads.delete_orphans(&guest.documents, Folder::Guest),
            self.uploads.delete_orphans(&booking_files, Folder::Booking),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detach_documents;
    use crate::infra::{MockBookingRepository, MockGuestRepository, MockObjectStore, MockUnitOfWork};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn guest_with(documents: &[&str]) -> Guest {
        let mut guest = Guest::new(crate::domain::GuestDetails {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "+919876543210".into(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            address: "12 MG Road".into(),
        });
        guest.documents = documents.iter().map(|d| d.to_string()).collect();
        guest
    }

    /// Repository whose `edit` replays the change on a copy of `guest`.
    fn guests_over(guest: Guest) -> MockGuestRepository {
        let mut guests = MockGuestRepository::new();
        guests
            .expect_edit()
            .times(1)
            .returning(move |_, details, removed_files| {
                let mut guest = guest.clone();
                let removed = detach_documents(&mut guest.documents, &removed_files);
                guest.apply(details);
                Ok(Some((guest, removed)))
            });
        guests
    }

    fn edit(documents: Vec<String>) -> UpdateGuest {
        UpdateGuest {
            name: "Asha R".into(),
            email: "asha@example.com".into(),
            phone: "+919876543210".into(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            address: "14 MG Road".into(),
            documents,
        }
    }

    #[tokio::test]
    async fn test_edit_removes_exactly_requested_files() {
        let current = guest_with(&["1-a-id.pdf", "2-b-visa.pdf", "3-c-bill.pdf"]);
        let id = current.id;

        let guests = guests_over(current);

        let deleted = Arc::new(Mutex::new(Vec::new()));
        let mut store = MockObjectStore::new();
        let sink = deleted.clone();
        store.expect_delete().returning(move |key| {
            sink.lock().unwrap().push(key.to_string());
            Ok(())
        });
        store
            .expect_presign_put()
            .times(1)
            .returning(|key, _, _| Ok(format!("https://s3.example/{key}")));

        let guests = Arc::new(guests);
        let mut uow = MockUnitOfWork::new();
        uow.expect_guests().returning(move || guests.clone());

        let manager = GuestManager::new(Arc::new(uow), UploadBroker::new(Arc::new(store)));
        let edited = manager
            .update_guest(
                id,
                edit(vec!["passport.pdf".into()]),
                vec!["1-a-id.pdf".into(), "3-c-bill.pdf".into()],
            )
            .await
            .unwrap();

        let mut deleted = deleted.lock().unwrap().clone();
        deleted.sort();
        assert_eq!(deleted, vec!["guest/1-a-id.pdf", "guest/3-c-bill.pdf"]);
        assert_eq!(edited.signed_urls.len(), 1);
        assert_eq!(edited.updated_guest.address, "14 MG Road");
    }

    #[tokio::test]
    async fn test_failed_cleanup_fails_request_after_commit() {
        let current = guest_with(&["1-a-id.pdf"]);
        let id = current.id;

        let guests = guests_over(current);

        let mut store = MockObjectStore::new();
        store
            .expect_delete()
            .returning(|_| Err(crate::errors::AppError::storage("timeout")));
        store.expect_presign_put().never();

        let guests = Arc::new(guests);
        let mut uow = MockUnitOfWork::new();
        uow.expect_guests().returning(move || guests.clone());

        let manager = GuestManager::new(Arc::new(uow), UploadBroker::new(Arc::new(store)));
        let err = manager
            .update_guest(id, edit(vec![]), vec!["1-a-id.pdf".into()])
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_delete_cleans_guest_and_booking_files() {
        let current = guest_with(&["1-a-id.pdf"]);
        let id = current.id;

        let mut guests = MockGuestRepository::new();
        guests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(current.clone())));
        guests.expect_delete().times(1).returning(|_| Ok(true));
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_documents_for_guest()
            .returning(|_| Ok(vec!["5-e-folio.pdf".into()]));

        let mut store = MockObjectStore::new();
        store
            .expect_delete()
            .withf(|key| key == "guest/1-a-id.pdf" || key == "booking/5-e-folio.pdf")
            .times(2)
            .returning(|_| Ok(()));

        let (guests, bookings) = (Arc::new(guests), Arc::new(bookings));
        let mut uow = MockUnitOfWork::new();
        uow.expect_guests().returning(move || guests.clone());
        uow.expect_bookings().returning(move || bookings.clone());

        let manager = GuestManager::new(Arc::new(uow), UploadBroker::new(Arc::new(store)));
        manager.delete_guest(id).await.unwrap();
    }
}
