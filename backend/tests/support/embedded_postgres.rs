//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! One cluster is shared per test binary. Every test gets its own database
//! cloned from a template that already has the migrations applied; the
//! template name carries a hash of `migrations/`, so editing the schema
//! produces a fresh template instead of reusing a stale one.
//!
//! Cluster bootstrap and template cloning block, so suites drive the
//! repositories through [`TestDatabase::block_on`] rather than
//! `#[tokio::test]`.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; otherwise a
//! setup failure fails the test.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use scratch_backend::domain::ports::{ProvisionedTenant, TenantProvisioning, TenantRepository};
use scratch_backend::domain::{AdminUsername, PasswordHash, SettingUpdate, TenantName, TenantSlug};
use scratch_backend::outbound::persistence::{
    DbPool, DieselTenantRepository, MIGRATIONS, PoolConfig,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_PREFIX: &str = "scratch_template";

/// A migrated throwaway database, a small pool onto it and the runtime the
/// pool lives on.
pub struct TestDatabase {
    // Field order is drop order: the pool must close before the database is
    // dropped, and the runtime must outlive both.
    pool: DbPool,
    _database: TemporaryDatabase,
    runtime: Runtime,
}

impl TestDatabase {
    fn new() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| format!("runtime: {err}"))?;
        let database = provision_database()?;
        let config = PoolConfig::new(database.url())
            .with_max_size(2)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| format!("pool: {err}"))?;
        Ok(Self {
            pool,
            _database: database,
            runtime,
        })
    }

    /// Pool handed to the repository under test.
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Run one repository call to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Insert a tenant with its default admin and seed settings.
    pub fn seed_tenant(&self, slug: &str) -> ProvisionedTenant {
        let tenants = DieselTenantRepository::new(self.pool());
        self.block_on(tenants.provision(&provisioning(slug)))
            .expect("tenant provisioned")
    }
}

/// Provisioning request for `slug` with its default admin username.
pub fn provisioning(slug: &str) -> TenantProvisioning {
    let slug = TenantSlug::new(slug).expect("valid slug");
    TenantProvisioning {
        name: TenantName::from_slug(&slug),
        admin_username: AdminUsername::new(slug.admin_username()).expect("valid username"),
        password_hash: PasswordHash::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
        settings: SettingUpdate::defaults(),
        slug,
    }
}

fn migrate(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migrate: {err}"))?;
    Ok(())
}

fn template_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        migrate(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let template = ensure_template(cluster)?;
    let name = format!("test_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database_from_template(name.as_str(), template.as_str())
        .map_err(|err| format!("clone template: {err:?}"))
}

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Fresh database for one test, or `None` when the cluster is unavailable
/// and `SKIP_TEST_CLUSTER` is set.
///
/// # Panics
/// When setup fails and skipping was not requested.
#[allow(clippy::print_stderr, reason = "skip marker for CI logs")]
pub fn test_database() -> Option<TestDatabase> {
    match TestDatabase::new() {
        Ok(database) => Some(database),
        Err(reason) if skip_requested() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("embedded PostgreSQL setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
