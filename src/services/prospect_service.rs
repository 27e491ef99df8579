//! Prospective guests and the meetings held with them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    CreateMeeting, Meeting, MeetingDetails, MeetingId, ProspectName, ProspectiveGuest,
    ProspectiveGuestId, ProspectiveGuestInput,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, Paginated};

#[async_trait]
pub trait ProspectService: Send + Sync {
    async fn create_prospect(&self, input: ProspectiveGuestInput) -> AppResult<ProspectiveGuest>;

    async fn list_prospects(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<ProspectiveGuest>>;

    /// Save the edit; a rename is carried onto linked bookings
    async fn update_prospect(
        &self,
        id: ProspectiveGuestId,
        input: ProspectiveGuestInput,
    ) -> AppResult<ProspectiveGuest>;

    async fn delete_prospect(&self, id: ProspectiveGuestId) -> AppResult<()>;

    async fn prospect_names(&self) -> AppResult<Vec<ProspectName>>;

    async fn list_meetings(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<Paginated<Meeting>>;

    async fn create_meeting(&self, input: CreateMeeting) -> AppResult<Meeting>;

    async fn update_meeting(&self, id: MeetingId, details: MeetingDetails) -> AppResult<Meeting>;

    async fn delete_meeting(&self, id: MeetingId) -> AppResult<()>;
}

pub struct ProspectManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProspectManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProspectService for ProspectManager<U> {
    async fn create_prospect(&self, input: ProspectiveGuestInput) -> AppResult<ProspectiveGuest> {
        let prospect = self
            .uow
            .prospective_guests()
            .create(ProspectiveGuest::new(input))
            .await?;
        tracing::info!(prospect_id = %prospect.id, "Prospective guest created");
        Ok(prospect)
    }

    async fn list_prospects(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<ProspectiveGuest>> {
        let (prospects, total) = self.uow.prospective_guests().list(search, page).await?;
        Ok(Paginated::new(prospects, page, total))
    }

    async fn update_prospect(
        &self,
        id: ProspectiveGuestId,
        input: ProspectiveGuestInput,
    ) -> AppResult<ProspectiveGuest> {
        let mut prospect = self
            .uow
            .prospective_guests()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Prospective guest")?;
        prospect.apply(input);
        self.uow.prospective_guests().update(prospect).await
    }

    async fn delete_prospect(&self, id: ProspectiveGuestId) -> AppResult<()> {
        if !self.uow.prospective_guests().delete(id).await? {
            return Err(AppError::not_found("Prospective guest"));
        }
        tracing::info!(prospect_id = %id, "Prospective guest deleted");
        Ok(())
    }

    async fn prospect_names(&self) -> AppResult<Vec<ProspectName>> {
        self.uow.prospective_guests().names().await
    }

    async fn list_meetings(
        &self,
        prospect_id: ProspectiveGuestId,
        page: PageRequest,
    ) -> AppResult<Paginated<Meeting>> {
        let (meetings, total) = self
            .uow
            .meetings()
            .list_for_prospect(prospect_id, page)
            .await?;
        Ok(Paginated::new(meetings, page, total))
    }

    async fn create_meeting(&self, input: CreateMeeting) -> AppResult<Meeting> {
        self.uow
            .prospective_guests()
            .find_by_id(input.prospective_guest_id)
            .await?
            .ok_or_not_found("Prospective guest")?;

        self.uow
            .meetings()
            .create(Meeting::new(input.prospective_guest_id, input.details))
            .await
    }

    async fn update_meeting(&self, id: MeetingId, details: MeetingDetails) -> AppResult<Meeting> {
        let mut meeting = self
            .uow
            .meetings()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Meeting")?;
        meeting.apply(details);
        self.uow.meetings().update(meeting).await
    }

    async fn delete_meeting(&self, id: MeetingId) -> AppResult<()> {
        if !self.uow.meetings().delete(id).await? {
            return Err(AppError::not_found("Meeting"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockMeetingRepository, MockProspectiveGuestRepository, MockUnitOfWork};

    fn details() -> MeetingDetails {
        serde_json::from_value(serde_json::json!({
            "date": "2024-06-01T09:30:00Z",
            "remarks": " Wants a corporate rate ",
            "attendies": [" Priya ", "Karan"],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_meeting_for_unknown_prospect_is_not_found() {
        let mut prospects = MockProspectiveGuestRepository::new();
        prospects.expect_find_by_id().returning(|_| Ok(None));
        let mut meetings = MockMeetingRepository::new();
        meetings.expect_create().never();

        let (prospects, meetings) = (Arc::new(prospects), Arc::new(meetings));
        let mut uow = MockUnitOfWork::new();
        uow.expect_prospective_guests().returning(move || prospects.clone());
        uow.expect_meetings().returning(move || meetings.clone());

        let err = ProspectManager::new(Arc::new(uow))
            .create_meeting(CreateMeeting {
                prospective_guest_id: ProspectiveGuestId::new(),
                details: details(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Prospective guest not found");
    }

    #[tokio::test]
    async fn test_meeting_created_with_trimmed_fields() {
        let prospect = ProspectiveGuest::new(ProspectiveGuestInput {
            name: "Acme Travel".into(),
            email: "ops@acme.example".into(),
            phone: "+919800000001".into(),
            company: "Acme".into(),
            description: "Group bookings".into(),
        });
        let prospect_id = prospect.id;

        let mut prospects = MockProspectiveGuestRepository::new();
        prospects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(prospect.clone())));
        let mut meetings = MockMeetingRepository::new();
        meetings
            .expect_create()
            .withf(move |m| {
                m.prospective_guest_id == prospect_id
                    && m.remarks == "Wants a corporate rate"
                    && m.attendees == vec!["Priya", "Karan"]
            })
            .times(1)
            .returning(Ok);

        let (prospects, meetings) = (Arc::new(prospects), Arc::new(meetings));
        let mut uow = MockUnitOfWork::new();
        uow.expect_prospective_guests().returning(move || prospects.clone());
        uow.expect_meetings().returning(move || meetings.clone());

        let meeting = ProspectManager::new(Arc::new(uow))
            .create_meeting(CreateMeeting {
                prospective_guest_id: prospect_id,
                details: details(),
            })
            .await
            .unwrap();
        assert_eq!(meeting.attendees.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_prospect() {
        let mut prospects = MockProspectiveGuestRepository::new();
        prospects.expect_delete().returning(|_| Ok(false));
        let prospects = Arc::new(prospects);
        let mut uow = MockUnitOfWork::new();
        uow.expect_prospective_guests().returning(move || prospects.clone());

        let err = ProspectManager::new(Arc::new(uow))
            .delete_prospect(ProspectiveGuestId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
