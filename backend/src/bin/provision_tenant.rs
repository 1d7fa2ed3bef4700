//! Operator CLI: provision a tenant or rotate its admin password.
//!
//! Credentials are printed to stdout exactly once; nothing else records the
//! plaintext password.

use std::env;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;

use scratch_backend::domain::ports::{
    AdminRepository, IssuedCredentials, TenantDirectory, TenantRepository,
};
use scratch_backend::domain::{TenantDirectoryService, TenantName, TenantSlug};
use scratch_backend::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselTenantRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "SCRATCH_DATABASE_URL";

/// `provision-tenant` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "provision-tenant",
    about = "Create tenants and manage their admin credentials",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `SCRATCH_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a tenant with seeded settings and a generated admin password.
    Provision {
        /// Routing slug, e.g. `acme`.
        slug: String,
        /// Display name; derived from the slug when omitted.
        #[arg(long)]
        name: Option<String>,
    },
    /// Replace the tenant admin's password with a generated one.
    RotatePassword {
        /// Routing slug of an existing tenant.
        slug: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    run_pending_migrations(&database_url)
        .await
        .wrap_err("apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;
    let directory = TenantDirectoryService::new(
        Arc::new(DieselTenantRepository::new(pool.clone())),
        Arc::new(DieselAdminRepository::new(pool)),
        false,
    );

    let issued = execute(&directory, args.command).await?;
    println!("{}", render(&issued));
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    match explicit.or(from_env) {
        Some(url) if !url.trim().is_empty() => Ok(url),
        Some(_) => Err(eyre!("database URL must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or {DATABASE_URL_ENV}"
        )),
    }
}

async fn execute<T, A>(
    directory: &TenantDirectoryService<T, A>,
    command: Command,
) -> Result<IssuedCredentials>
where
    T: TenantRepository,
    A: AdminRepository,
{
    match command {
        Command::Provision { slug, name } => {
            let slug = TenantSlug::new(&slug).wrap_err("invalid slug")?;
            let name = name
                .map(TenantName::new)
                .transpose()
                .wrap_err("invalid tenant name")?;
            directory
                .provision(&slug, name)
                .await
                .wrap_err_with(|| format!("provision tenant {slug}"))
        }
        Command::RotatePassword { slug } => {
            let slug = TenantSlug::new(&slug).wrap_err("invalid slug")?;
            directory
                .rotate_admin_password(&slug)
                .await
                .wrap_err_with(|| format!("rotate admin password for {slug}"))
        }
    }
}

fn render(issued: &IssuedCredentials) -> String {
    format!(
        "tenant:   {} (id {})\nusername: {}\npassword: {}",
        issued.tenant.slug,
        issued.tenant.id.get(),
        issued.username,
        issued.password.as_str()
    )
}
