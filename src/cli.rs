use clap::{Parser, Subcommand};

use crate::config::{mask_password, Config};
use crate::db::{self, PgStore};
use crate::services::accounts::{self, Registration};

#[derive(Parser)]
#[command(name = "jobboard-core")]
#[command(about = "Job board API server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user, e.g. the first admin
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        full_name: String,

        #[arg(long)]
        password: String,

        /// admin or employee
        #[arg(long, default_value = "employee")]
        role: String,
    },
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed");
    Ok(())
}

pub async fn handle_user_create(
    config: &Config,
    email: String,
    full_name: String,
    password: String,
    role: String,
) -> anyhow::Result<()> {
    let pool = db::create_pool(config).await?;
    let store = PgStore::new(pool);

    let user = accounts::register(
        &store,
        Registration {
            full_name,
            email,
            password,
            user_type: role,
        },
    )
    .await?;

    println!("✓ Created {} {} ({})", user.role, user.email, user.id);
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  JWT Secret: set ({} bytes)", config.jwt_secret.len());
    println!("  CORS Origins: {:?}", config.allowed_origins);
    println!("  Log Format: {:?}", config.log_format);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");
    Ok(())
}
