//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the tenant, admin, lead and setting
//! repository ports, backed by PostgreSQL through `diesel-async` and a `bb8`
//! connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Duplicate policies, hashing and authorization live in the
//!   domain services.
//! - **Internal models**: row structs (`models.rs`) and the table
//!   definitions (`schema.rs`) never leave this module.
//! - **Tenant scoping**: every lead and setting statement filters on
//!   `tenant_id`.
//! - **Typed conflicts**: unique violations on the slug and username indexes
//!   become dedicated port error variants.
//!
//! # Example
//!
//! ```ignore
//! use scratch_backend::outbound::persistence::{DbPool, DieselLeadRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/scratch")).await?;
//! let leads = DieselLeadRepository::new(pool);
//! ```

mod diesel_admin_repository;
mod diesel_error_mapping;
mod diesel_lead_repository;
mod diesel_setting_repository;
mod diesel_tenant_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_lead_repository::DieselLeadRepository;
pub use diesel_setting_repository::DieselSettingRepository;
pub use diesel_tenant_repository::DieselTenantRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
