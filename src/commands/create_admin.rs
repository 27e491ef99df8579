//! Create-admin command - Seeds an administrator so a fresh install can log in.

use validator::ValidateEmail;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::rules::{normalize_email, validate_staff_phone, validate_username};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let admin = build_admin(args)?;

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Persistence::new(db.get_connection());

    let admin = uow.users().create(admin).await?;
    tracing::info!(user_id = %admin.id, email = %admin.email, "Administrator created");

    Ok(())
}

/// Validate the arguments and hash the password.
pub fn build_admin(args: CreateAdminArgs) -> AppResult<User> {
    let name = args.name.trim().to_string();
    validate_username(&name).map_err(rule_error)?;

    let email = normalize_email(&args.email);
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email format"));
    }

    let phone = args.phone.trim().to_string();
    validate_staff_phone(&phone).map_err(rule_error)?;

    let password = Password::new(&args.password)?;

    Ok(User::new(name, email, phone, password.into_string()).as_admin())
}

fn rule_error(err: validator::ValidationError) -> AppError {
    AppError::validation(
        err.message
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} is invalid", err.code)),
    )
}
