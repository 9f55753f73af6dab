//! Tenant registration and WBS seeding.
//!
//! The seed file is a JSON array of lines:
//!
//! ```json
//! [
//!   { "code": "1", "description": "Structure", "unit_cost": "0", "quantity": "1" },
//!   { "code": "1.1", "description": "Footings", "unit_cost": "500", "quantity": "4",
//!     "duration_days": 10, "parent_code": "1" }
//! ]
//! ```
//!
//! Every line is stored as approved, in file order, inside one transaction.
//! The tenant namespace and its tables must already be provisioned.
//!
//! Usage: cargo run --bin seeder -- register --name "Harbour Co" --project-name "Pier 4" --file wbs.json

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use costline_core::actor::ActingUser;
use costline_core::tenant::{NewTenant, TenantSchema};
use costline_core::wbs::SeedLine;
use costline_db::{TenantRegistry, TenantSeeder, TransactionManager, connect};
use costline_shared::AppConfig;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seeder", version, about = "Costline tenant seeder")]
struct Cli {
    /// Identifier recorded as the creator of every seeded line
    #[arg(long, env = "COSTLINE_ACTING_USER", default_value = "seeder")]
    acting_user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new tenant, then seed its namespace
    Register {
        /// Tenant display name; the namespace name is derived from it
        #[arg(long)]
        name: String,
        /// Project name
        #[arg(long)]
        project_name: String,
        /// JSON seed file
        #[arg(long)]
        file: PathBuf,
    },
    /// Seed an already registered namespace
    Seed {
        /// Tenant namespace
        #[arg(long)]
        schema: String,
        /// JSON seed file
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "costline=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let acting_user = ActingUser::new(&cli.acting_user)?;

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let tx = TransactionManager::from_config(db, &config)?;
    info!(shared = %tx.shared_schema(), "connected to database");

    let seeder = TenantSeeder::new(tx.clone());

    match cli.command {
        Command::Register {
            name,
            project_name,
            file,
        } => {
            let lines = read_seed_file(&file)?;
            let registry = TenantRegistry::new(tx);
            let tenant = registry.register(NewTenant::new(&name, &project_name)?).await?;
            info!(tenant = %tenant.schema_name, "tenant registered");

            if let Err(err) = seeder
                .seed_tenant(&tenant.schema_name, &lines, &acting_user)
                .await
            {
                warn!(tenant = %tenant.schema_name, "seeding failed, removing registration");
                registry.delete(tenant.id).await?;
                return Err(err.into());
            }
        }
        Command::Seed { schema, file } => {
            let schema = TenantSchema::parse(&schema)?;
            let lines = read_seed_file(&file)?;
            seeder.seed_tenant(&schema, &lines, &acting_user).await?;
        }
    }

    info!("seeding complete");
    Ok(())
}

fn read_seed_file(path: &Path) -> Result<Vec<SeedLine>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_seed(&raw).with_context(|| format!("invalid seed file {}", path.display()))
}

fn parse_seed(raw: &str) -> serde_json::Result<Vec<SeedLine>> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_seed_with_optional_fields() {
        let raw = r#"[
            { "code": "1", "description": "Structure", "unit_cost": "0", "quantity": "1" },
            { "code": "1.1", "description": "Footings", "unit_cost": "500.25", "quantity": "4",
              "duration_days": 10, "parent_code": "1" }
        ]"#;

        let lines = parse_seed(raw).unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].parent_code, None);
        assert_eq!(lines[0].duration_days, None);
        assert_eq!(lines[1].unit_cost, dec!(500.25));
        assert_eq!(lines[1].parent_code.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_seed_rejects_missing_code() {
        assert!(parse_seed(r#"[{ "description": "x", "unit_cost": "1", "quantity": "1" }]"#).is_err());
    }

    #[test]
    fn test_cli_parses_register() {
        let cli = Cli::try_parse_from([
            "seeder",
            "--acting-user",
            "ops",
            "register",
            "--name",
            "Harbour Co",
            "--project-name",
            "Pier 4",
            "--file",
            "wbs.json",
        ])
        .unwrap();

        assert_eq!(cli.acting_user, "ops");
        assert!(matches!(cli.command, Command::Register { ref name, .. } if name == "Harbour Co"));
    }
}
