//! Migration: Create the back-office schema.
//!
//! List-valued fields (documents, co-stayers, cost ledgers, attendees,
//! permissions) are JSONB columns. Unique indexes carry the column name so
//! constraint violations can be traced back to the field.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Roles::RoleName).string().not_null())
                    .col(ColumnDef::new(Roles::Permissions).json_binary().not_null())
                    .col(timestamp(Roles::CreatedAt))
                    .col(timestamp(Roles::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        unique_index(manager, "idx_roles_role_name", Roles::Table, Roles::RoleName).await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        unique_index(manager, "idx_users_email", Users::Table, Users::Email).await?;
        unique_index(manager, "idx_users_phone", Users::Table, Users::Phone).await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserRoles::UserId)
                            .col(UserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_user")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role")
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credentials::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Credentials::UserId).uuid().not_null())
                    .col(ColumnDef::new(Credentials::Token).text().not_null())
                    .col(timestamp(Credentials::ExpiresAt))
                    .col(timestamp(Credentials::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credentials_user")
                            .from(Credentials::Table, Credentials::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        unique_index(
            manager,
            "idx_credentials_token",
            Credentials::Table,
            Credentials::Token,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Guests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Guests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Guests::Name).string().not_null())
                    .col(ColumnDef::new(Guests::Email).string().not_null())
                    .col(ColumnDef::new(Guests::Phone).string().not_null())
                    .col(ColumnDef::new(Guests::Dob).date().not_null())
                    .col(ColumnDef::new(Guests::Address).text().not_null())
                    .col(ColumnDef::new(Guests::Documents).json_binary().not_null())
                    .col(timestamp(Guests::CreatedAt))
                    .col(timestamp(Guests::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        unique_index(manager, "idx_guests_phone", Guests::Table, Guests::Phone).await?;

        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::Name).string().not_null())
                    .col(ColumnDef::new(Vendors::Email).string().not_null())
                    .col(ColumnDef::new(Vendors::Phone).string().not_null())
                    .col(ColumnDef::new(Vendors::Address).text().not_null())
                    .col(ColumnDef::new(Vendors::ContactPerson).string().not_null())
                    .col(ColumnDef::new(Vendors::Gstin).string().not_null())
                    .col(timestamp(Vendors::CreatedAt))
                    .col(timestamp(Vendors::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        unique_index(manager, "idx_vendors_phone", Vendors::Table, Vendors::Phone).await?;

        manager
            .create_table(
                Table::create()
                    .table(ProspectiveGuests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProspectiveGuests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProspectiveGuests::Name).string().not_null())
                    .col(ColumnDef::new(ProspectiveGuests::Email).string().null())
                    .col(ColumnDef::new(ProspectiveGuests::Phone).string().not_null())
                    .col(ColumnDef::new(ProspectiveGuests::Company).string().not_null())
                    .col(ColumnDef::new(ProspectiveGuests::Description).text().null())
                    .col(timestamp(ProspectiveGuests::CreatedAt))
                    .col(timestamp(ProspectiveGuests::UpdatedAt))
                    .to_owned(),
            )
            .await?;
        unique_index(
            manager,
            "idx_prospective_guests_phone",
            ProspectiveGuests::Table,
            ProspectiveGuests::Phone,
        )
        .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::GuestId).uuid().not_null())
                    .col(timestamp(Bookings::CheckInDate))
                    .col(timestamp(Bookings::CheckOutDate))
                    .col(ColumnDef::new(Bookings::GrcNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::RoomNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::CoStayers).json_binary().not_null())
                    .col(
                        ColumnDef::new(Bookings::AdditionalPurchase)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::DamageCost).json_binary().not_null())
                    .col(ColumnDef::new(Bookings::Documents).json_binary().not_null())
                    .col(ColumnDef::new(Bookings::ProspectiveGuestId).uuid().null())
                    .col(ColumnDef::new(Bookings::ProspectiveGuestName).string().null())
                    .col(timestamp(Bookings::CreatedAt))
                    .col(timestamp(Bookings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_guest")
                            .from(Bookings::Table, Bookings::GuestId)
                            .to(Guests::Table, Guests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_prospective_guest")
                            .from(Bookings::Table, Bookings::ProspectiveGuestId)
                            .to(ProspectiveGuests::Table, ProspectiveGuests::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_check_in_date")
                    .table(Bookings::Table)
                    .col(Bookings::CheckInDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Purchases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Purchases::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Purchases::Item).string().not_null())
                    .col(ColumnDef::new(Purchases::Quantity).string().not_null())
                    .col(ColumnDef::new(Purchases::InvoiceNumber).string().not_null())
                    .col(ColumnDef::new(Purchases::WarrantyPeriod).string().not_null())
                    .col(ColumnDef::new(Purchases::Value).string().not_null())
                    .col(timestamp(Purchases::PurchaseDate))
                    .col(ColumnDef::new(Purchases::Documents).json_binary().not_null())
                    .col(timestamp(Purchases::CreatedAt))
                    .col(timestamp(Purchases::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchases_vendor")
                            .from(Purchases::Table, Purchases::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Meetings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Meetings::ProspectiveGuestId).uuid().not_null())
                    .col(timestamp(Meetings::Date))
                    .col(ColumnDef::new(Meetings::Remarks).text().not_null())
                    .col(ColumnDef::new(Meetings::Attendees).json_binary().not_null())
                    .col(timestamp(Meetings::CreatedAt))
                    .col(timestamp(Meetings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_prospective_guest")
                            .from(Meetings::Table, Meetings::ProspectiveGuestId)
                            .to(ProspectiveGuests::Table, ProspectiveGuests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        manager
            .drop_table(Table::drop().table(Meetings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProspectiveGuests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Guests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Credentials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

async fn unique_index<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    column: C,
) -> Result<(), DbErr>
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .unique()
                .to_owned(),
        )
        .await
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    RoleName,
    Permissions,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Phone,
    PasswordHash,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(Iden)]
enum Credentials {
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum Guests {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Dob,
    Address,
    Documents,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    ContactPerson,
    Gstin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProspectiveGuests {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Company,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    GuestId,
    CheckInDate,
    CheckOutDate,
    GrcNumber,
    RoomNumber,
    CoStayers,
    AdditionalPurchase,
    DamageCost,
    Documents,
    ProspectiveGuestId,
    ProspectiveGuestName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    VendorId,
    Item,
    Quantity,
    InvoiceNumber,
    WarrantyPeriod,
    Value,
    PurchaseDate,
    Documents,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Meetings {
    Table,
    Id,
    ProspectiveGuestId,
    Date,
    Remarks,
    Attendees,
    CreatedAt,
    UpdatedAt,
}
