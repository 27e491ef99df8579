//! Service integration tests over mocked repositories and storage.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use mockall::predicate::eq;

use frontdesk::config::Config;
use frontdesk::domain::{
    CreateGuest, CreateUser, Guest, GuestDetails, Permission, Role, RoleId, User,
};
use frontdesk::infra::{
    MockCredentialRepository, MockGuestRepository, MockMailer, MockObjectStore,
    MockRoleRepository, MockUnitOfWork, MockUserRepository,
};
use frontdesk::services::{
    AuthService, Authenticator, GuestManager, GuestService, RoleManager, RoleService,
    UploadBroker, UserManager, UserService,
};

fn desk_role() -> Role {
    Role::new("desk".into(), vec![Permission::BookingRead, Permission::GuestRead])
}

fn new_staff(roles: Vec<RoleId>) -> CreateUser {
    CreateUser {
        name: "front_desk".into(),
        email: "  Desk@Hotel.Example ".into(),
        phone: "9876543210".into(),
        password: "SecurePass123!".into(),
        roles,
    }
}

fn user_manager(users: MockUserRepository, roles: MockRoleRepository) -> UserManager<MockUnitOfWork> {
    let (users, roles) = (Arc::new(users), Arc::new(roles));
    let mut uow = MockUnitOfWork::new();
    uow.expect_users().returning(move || users.clone());
    uow.expect_roles().returning(move || roles.clone());
    UserManager::new(Arc::new(uow), Arc::new(MockMailer::new()))
}

#[tokio::test]
async fn test_create_user_resolves_repeated_role_once() {
    let role = desk_role();
    let role_id = role.id;

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_ids()
        .withf(move |ids| ids == &vec![role_id])
        .times(1)
        .returning(move |_| Ok(vec![role.clone()]));

    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(move |user| {
            user.email == "desk@hotel.example"
                && user.role_ids == vec![role_id]
                && !user.is_admin
                && user.password_hash.starts_with("$argon2")
        })
        .times(1)
        .returning(Ok);

    let summary = user_manager(users, roles)
        .create_user(new_staff(vec![role_id, role_id]))
        .await
        .unwrap();

    assert_eq!(summary.roles.len(), 1);
    assert_eq!(summary.roles[0].role_name, "DESK");
}

#[tokio::test]
async fn test_create_user_rejects_unknown_role() {
    let mut roles = MockRoleRepository::new();
    roles.expect_find_by_ids().returning(|_| Ok(vec![]));
    let mut users = MockUserRepository::new();
    users.expect_create().never();

    let err = user_manager(users, roles)
        .create_user(new_staff(vec![RoleId::new()]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid roles");
}

#[tokio::test]
async fn test_mixed_case_email_logs_in_as_typed_at_creation() {
    let role = desk_role();
    let role_id = role.id;
    let stored: Arc<Mutex<Option<User>>> = Arc::new(Mutex::new(None));

    let mut roles = MockRoleRepository::new();
    roles
        .expect_find_by_ids()
        .returning(move |_| Ok(vec![role.clone()]));
    let mut users = MockUserRepository::new();
    let created = stored.clone();
    users.expect_create().times(1).returning(move |user| {
        *created.lock().unwrap() = Some(user.clone());
        Ok(user)
    });
    let input = CreateUser {
        email: "Asha@Hotel.example".into(),
        ..new_staff(vec![role_id])
    };
    user_manager(users, roles).create_user(input).await.unwrap();

    // the store compares the column verbatim
    let mut users = MockUserRepository::new();
    let lookup = stored.clone();
    users.expect_find_by_email().returning(move |email| {
        Ok(lookup
            .lock()
            .unwrap()
            .clone()
            .filter(|user| user.email == email))
    });
    let mut roles = MockRoleRepository::new();
    roles.expect_find_by_ids().returning(|_| Ok(vec![]));
    let mut credentials = MockCredentialRepository::new();
    credentials.expect_delete_expired().returning(|_| Ok(0));
    credentials.expect_create().times(1).returning(Ok);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(1).returning(|_| Ok(()));

    let (users, roles, credentials) = (Arc::new(users), Arc::new(roles), Arc::new(credentials));
    let mut uow = MockUnitOfWork::new();
    uow.expect_users().returning(move || users.clone());
    uow.expect_roles().returning(move || roles.clone());
    uow.expect_credentials().returning(move || credentials.clone());
    let auth = Authenticator::new(Arc::new(uow), Arc::new(mailer), Config::default());

    let outcome = auth
        .login("Asha@Hotel.example".into(), "SecurePass123!".into())
        .await
        .unwrap();
    assert_eq!(outcome.username, "front_desk");

    auth.request_password_reset(" ASHA@hotel.EXAMPLE ".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_role_delete_reports_detached_users() {
    let id = RoleId::new();
    let mut roles = MockRoleRepository::new();
    roles
        .expect_delete()
        .with(eq(id))
        .times(1)
        .returning(|_| Ok(Some(3)));

    let roles = Arc::new(roles);
    let mut uow = MockUnitOfWork::new();
    uow.expect_roles().returning(move || roles.clone());

    RoleManager::new(Arc::new(uow)).delete_role(id).await.unwrap();
}

#[tokio::test]
async fn test_guest_upload_round_trip() {
    let stored: Arc<Mutex<Option<Guest>>> = Arc::new(Mutex::new(None));

    let mut guests = MockGuestRepository::new();
    let created = stored.clone();
    guests.expect_create().times(1).returning(move |guest| {
        *created.lock().unwrap() = Some(guest.clone());
        Ok(guest)
    });
    let appended = stored.clone();
    guests
        .expect_append_documents()
        .times(1)
        .returning(move |id, keys| {
            let mut slot = appended.lock().unwrap();
            let updated = match slot.as_mut() {
                Some(guest) if guest.id == id => {
                    guest.documents.extend(keys);
                    Some(guest.clone())
                }
                _ => None,
            };
            Ok(updated)
        });

    let mut store = MockObjectStore::new();
    store
        .expect_presign_put()
        .withf(|key, _, _| key.starts_with("guest/"))
        .times(3)
        .returning(|key, _, _| Ok(format!("https://bucket.example/{key}?put=1")));

    let guests = Arc::new(guests);
    let mut uow = MockUnitOfWork::new();
    uow.expect_guests().returning(move || guests.clone());
    let manager = GuestManager::new(Arc::new(uow), UploadBroker::new(Arc::new(store)));

    let created = manager
        .create_guest(CreateGuest {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "+919876543210".into(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            address: "12 MG Road".into(),
            documents: vec!["id.pdf".into(), "visa.pdf".into(), "bill.pdf".into()],
        })
        .await
        .unwrap();

    assert_eq!(created.signed_urls.len(), 3);
    for (upload, original) in created.signed_urls.iter().zip(["id.pdf", "visa.pdf", "bill.pdf"]) {
        assert!(upload.file_name.ends_with(original));
        assert!(upload.signed_url.contains(&upload.file_name));
    }

    // the client confirms what it actually uploaded
    let confirmed: Vec<String> = created
        .signed_urls
        .iter()
        .take(2)
        .map(|u| u.file_name.clone())
        .collect();
    let files = manager
        .save_files(created.guest_id, confirmed.clone())
        .await
        .unwrap();

    assert_eq!(files.id, created.guest_id);
    assert_eq!(files.documents, confirmed);
}

#[tokio::test]
async fn test_saving_files_for_missing_guest_is_not_found() {
    let mut guests = MockGuestRepository::new();
    guests.expect_append_documents().returning(|_, _| Ok(None));

    let guests = Arc::new(guests);
    let mut uow = MockUnitOfWork::new();
    uow.expect_guests().returning(move || guests.clone());
    let manager = GuestManager::new(
        Arc::new(uow),
        UploadBroker::new(Arc::new(MockObjectStore::new())),
    );

    let err = manager
        .save_files(Guest::new(details()).id, vec!["1-a-id.pdf".into()])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Guest not found");
}

fn details() -> GuestDetails {
    GuestDetails {
        name: "Ravi".into(),
        email: "ravi@example.com".into(),
        phone: "+919812345678".into(),
        dob: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
        address: "3 Park Street".into(),
    }
}
