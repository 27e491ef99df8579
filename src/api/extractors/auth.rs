//! Caller identity and permission extractors.
//!
//! Both read the `CurrentUser` the auth middleware inserted. Handlers list
//! them before any body extractor so authorization runs first.

use std::marker::PhantomData;
use std::ops::Deref;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Permission;
use crate::errors::AppError;

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Access Denied"))
    }
}

/// Permissions a route accepts; holding any one of them is enough.
pub trait Requirement: Send + Sync + 'static {
    const ANY_OF: &'static [Permission];
}

/// The caller, checked against `P` before the handler runs.
pub struct Authorized<P: Requirement> {
    pub user: CurrentUser,
    _requirement: PhantomData<P>,
}

impl<P: Requirement> Deref for Authorized<P> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[async_trait]
impl<P: Requirement> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        state.services.access().authorize(user.id, P::ANY_OF).await?;

        Ok(Self {
            user,
            _requirement: PhantomData,
        })
    }
}

macro_rules! requirements {
    ($($name:ident => [$($permission:ident),+]),+ $(,)?) => {
        $(
            pub struct $name;

            impl Requirement for $name {
                const ANY_OF: &'static [Permission] = &[$(Permission::$permission),+];
            }
        )+
    };
}

/// Route requirements, named after what they grant.
pub mod perm {
    use super::{Permission, Requirement};

    requirements! {
        UserCreate => [UserCreate],
        UserRead => [UserRead],
        UserUpdate => [UserUpdate],
        UserDelete => [UserDelete],

        RoleCreate => [RoleCreate],
        RoleRead => [RoleRead],
        RoleUpdate => [RoleUpdate],
        RoleDelete => [RoleDelete],

        BookingRead => [BookingRead],
        BookingCreate => [BookingCreate],
        BookingUpdate => [BookingUpdate],
        BookingDelete => [BookingDelete],
        BookingFiles => [BookingCreate, BookingUpdate],

        GuestRead => [GuestRead],
        GuestUpdate => [GuestUpdate],
        GuestDelete => [GuestDelete],
        GuestFiles => [BookingCreate, GuestUpdate],

        VendorRead => [VendorRead],
        VendorUpdate => [VendorUpdate],
        VendorDelete => [VendorDelete],

        PurchaseRead => [PurchaseRead],
        PurchaseCreate => [PurchaseCreate],
        PurchaseUpdate => [PurchaseUpdate],
        PurchaseDelete => [PurchaseDelete],
        PurchaseFiles => [PurchaseCreate, PurchaseUpdate],

        ProspectCreate => [ProspectiveGuestCreate],
        ProspectRead => [ProspectiveGuestRead],
        ProspectUpdate => [ProspectiveGuestUpdate],
        ProspectDelete => [ProspectiveGuestDelete],

        MeetingCreate => [MeetingCreate],
        MeetingUpdate => [MeetingUpdate],
        MeetingDelete => [MeetingDelete],
    }
}
