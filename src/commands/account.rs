//! Account command - Operator provisioning of login accounts.

use crate::cli::args::{AccountAction, AccountArgs};
use crate::config::Config;
use crate::domain::AccountResponse;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{AccountService, Services};

/// Execute the account command
pub async fn execute(args: AccountArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let service = Services::from_connection(db.get_connection()).accounts();

    match args.action {
        AccountAction::Create { email, password } => {
            let account = service.create_account(email, password).await?;
            tracing::info!(account = %account.id, "Account created");
            let response = AccountResponse::from(account);
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
            println!("{}", json);
        }
        AccountAction::SetPassword { email, password } => {
            let account = service.set_password(&email, password).await?;
            tracing::info!(account = %account.id, "Password updated");
            println!("Updated password for {}", account.email);
        }
        AccountAction::Deactivate { email } => {
            let account = service.deactivate(&email).await?;
            tracing::info!(account = %account.id, "Account deactivated");
            println!("Deactivated account {}", account.email);
        }
    }

    Ok(())
}
