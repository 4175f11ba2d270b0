//! Account administration commands

use crate::config::Config;
use crate::db::Store;
use crate::domain::Role;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};

async fn auth_service(config: &Config) -> anyhow::Result<SeaOrmAuthService> {
    let store = Store::new(&config.general.database_path).await?;
    Ok(SeaOrmAuthService::new(store, config.security.clone()))
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::label)
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn cmd_list_accounts(config: &Config) -> anyhow::Result<()> {
    let accounts = auth_service(config).await?.list_accounts().await?;

    if accounts.is_empty() {
        println!("No accounts registered.");
        return Ok(());
    }

    println!("Accounts ({} total)", accounts.len());
    println!("{:-<70}", "");

    for account in accounts {
        println!("{}", account.username);
        println!(
            "  ID: {} | Roles: {} | Created: {}",
            account.id,
            format_roles(&account.roles),
            account.created_at
        );
    }

    Ok(())
}

pub async fn cmd_grant_role(config: &Config, username: &str, role: Role) -> anyhow::Result<()> {
    match auth_service(config).await?.grant_role(username, role).await {
        Ok(account) => {
            println!("✓ {} now holds: {}", account.username, format_roles(&account.roles));
            Ok(())
        }
        Err(AuthError::AccountNotFound(_)) => {
            println!("Account '{username}' not found.");
            println!("Use 'moviegallery accounts' to see usernames.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn cmd_revoke_role(config: &Config, username: &str, role: Role) -> anyhow::Result<()> {
    match auth_service(config).await?.revoke_role(username, role).await {
        Ok(account) => {
            println!("✓ {} now holds: {}", account.username, format_roles(&account.roles));
            Ok(())
        }
        Err(e @ (AuthError::AccountNotFound(_) | AuthError::RoleNotGranted(_) | AuthError::LastRole)) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
