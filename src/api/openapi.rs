//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, booking_handler, document_handler, guest_handler, meeting_handler,
    prospect_handler, purchase_handler, role_handler, user_handler, vendor_handler,
};
use crate::domain::{
    Booking, BookingWithGuest, ChangePassword, CoStayer, CostItem, CostKind, CreateBooking,
    CreateGuest, CreateMeeting, CreateUser, DocumentKind, Guest, GuestFiles, GuestSnapshot,
    GuestView, Meeting, MeetingDetails, ProspectName, ProspectiveGuest, ProspectiveGuestInput,
    ProspectiveGuestRef, Purchase, PurchaseInput, PurchaseWithVendor, Role, RoleBadge, RoleInput,
    RolePermissions, UpdateBooking, UpdateGuest, UpdateUser, UserProfile, UserSummary, Vendor,
    VendorBrief, VendorInput, VendorSnapshot,
};
use crate::services::{
    BookingCreated, BookingEdited, DocumentPage, GuestCreated, GuestEdited, PurchaseCreated,
    PurchaseEdited, SignedUpload,
};
use crate::types::MessageResponse;

/// OpenAPI documentation for the front desk API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Front Desk API",
        version = "0.1.0",
        description = "Hotel back office: staff, roles, guests, bookings, vendors, purchases and prospects"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::logout,
        auth_handler::refresh,
        auth_handler::send_reset_mail,
        auth_handler::change_password,
        user_handler::profile,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::change_password,
        role_handler::create_role,
        role_handler::list_roles,
        role_handler::assign_permissions,
        role_handler::delete_role,
        guest_handler::list_guests,
        guest_handler::verify_number,
        guest_handler::create_guest,
        guest_handler::save_files,
        guest_handler::update_guest,
        guest_handler::delete_guest,
        booking_handler::list_bookings,
        booking_handler::list_for_prospect,
        booking_handler::create_booking,
        booking_handler::save_files,
        booking_handler::update_booking,
        booking_handler::delete_booking,
        booking_handler::add_cost,
        booking_handler::remove_cost,
        vendor_handler::list_vendors,
        vendor_handler::verify_number,
        vendor_handler::create_vendor,
        vendor_handler::update_vendor,
        vendor_handler::delete_vendor,
        purchase_handler::list_purchases,
        purchase_handler::create_purchase,
        purchase_handler::save_files,
        purchase_handler::update_purchase,
        purchase_handler::delete_purchase,
        prospect_handler::create_prospect,
        prospect_handler::list_prospects,
        prospect_handler::update_prospect,
        prospect_handler::delete_prospect,
        prospect_handler::prospect_names,
        meeting_handler::list_meetings,
        meeting_handler::create_meeting,
        meeting_handler::update_meeting,
        meeting_handler::delete_meeting,
        document_handler::list_documents,
        document_handler::download_url,
        document_handler::download_url_in_folder,
    ),
    components(
        schemas(
            MessageResponse,
            SignedUpload,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::AccessTokenResponse,
            auth_handler::ResetMailRequest,
            auth_handler::NewPasswordRequest,
            UserProfile,
            UserSummary,
            RoleBadge,
            CreateUser,
            UpdateUser,
            ChangePassword,
            user_handler::ProfileResponse,
            user_handler::UserCreatedResponse,
            Role,
            RoleInput,
            RolePermissions,
            role_handler::RoleCreatedResponse,
            Guest,
            GuestView,
            GuestFiles,
            CreateGuest,
            UpdateGuest,
            GuestCreated,
            GuestEdited,
            guest_handler::VerifyNumberRequest,
            guest_handler::GuestLookup,
            guest_handler::EditGuestRequest,
            guest_handler::SaveGuestFilesRequest,
            guest_handler::GuestFilesSaved,
            Booking,
            BookingWithGuest,
            GuestSnapshot,
            CoStayer,
            CostItem,
            CostKind,
            ProspectiveGuestRef,
            CreateBooking,
            UpdateBooking,
            BookingCreated,
            BookingEdited,
            booking_handler::CreateBookingRequest,
            booking_handler::EditBookingRequest,
            booking_handler::SaveBookingFilesRequest,
            booking_handler::FilesSaved,
            booking_handler::AddCostRequest,
            booking_handler::CostItemName,
            booking_handler::RemoveCostRequest,
            Vendor,
            VendorBrief,
            VendorInput,
            vendor_handler::VendorLookup,
            vendor_handler::VendorCreatedResponse,
            vendor_handler::VendorUpdatedResponse,
            Purchase,
            PurchaseInput,
            PurchaseWithVendor,
            VendorSnapshot,
            PurchaseCreated,
            PurchaseEdited,
            purchase_handler::CreatePurchaseRequest,
            purchase_handler::EditPurchaseRequest,
            purchase_handler::SavePurchaseFilesRequest,
            ProspectiveGuest,
            ProspectiveGuestInput,
            ProspectName,
            prospect_handler::ProspectCreatedResponse,
            prospect_handler::ProspectUpdatedResponse,
            prospect_handler::ProspectNamesResponse,
            Meeting,
            MeetingDetails,
            CreateMeeting,
            meeting_handler::MeetingCreatedResponse,
            meeting_handler::MeetingUpdatedResponse,
            DocumentKind,
            DocumentPage,
            document_handler::DownloadUrlResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, logout, token refresh and password reset"),
        (name = "Users", description = "Staff accounts"),
        (name = "Roles", description = "Roles and their permissions"),
        (name = "Guests", description = "Registered guests"),
        (name = "Bookings", description = "Stays, co-stayers and cost ledgers"),
        (name = "Vendors", description = "Suppliers"),
        (name = "Purchases", description = "Purchases filed against vendors"),
        (name = "Prospective guests", description = "Sales prospects"),
        (name = "Meetings", description = "Meetings with prospects"),
        (name = "Documents", description = "Stored document keys and downloads")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/v1/auth/login or /api/v1/refresh"))
                        .build(),
                ),
            );
        }
    }
}
