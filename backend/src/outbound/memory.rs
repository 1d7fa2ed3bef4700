//! In-memory implementation of every repository port.
//!
//! Backs the server when no database URL is configured and drives the
//! integration suites. One [`MemoryStore`] holds all four tables behind a
//! single mutex so provisioning stays atomic and usernames stay globally
//! unique, matching the PostgreSQL adapters.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AdminRepository, AdminRepositoryError, CredentialChange, LeadRepository, LeadRepositoryError,
    ProvisionedTenant, SettingRepository, SettingRepositoryError, TenantProvisioning,
    TenantRepository, TenantRepositoryError,
};
use crate::domain::{
    AdminId, AdminRole, AdminUser, AdminUsername, EmailAddress, Lead, LeadId, NewLead, Setting,
    SettingKey, SettingUpdate, Tenant, TenantId, TenantSlug,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct MemoryState {
    next_id: i32,
    tenants: BTreeMap<i32, Tenant>,
    admins: BTreeMap<i32, AdminUser>,
    leads: BTreeMap<i32, Lead>,
    settings: BTreeMap<(i32, String), Setting>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn username_owner(&self, username: &AdminUsername) -> Option<AdminId> {
        self.admins
            .values()
            .find(|admin| admin.username == *username)
            .map(|admin| admin.id)
    }

    fn write_setting(
        &mut self,
        tenant_id: TenantId,
        update: &SettingUpdate,
        clock: &dyn Clock,
    ) -> Setting {
        let slot = (tenant_id.get(), update.key.as_ref().to_owned());
        let previous = self.settings.get(&slot).cloned();
        let id = match previous.as_ref() {
            Some(existing) => existing.id,
            None => self.allocate_id(),
        };
        let description = update
            .description
            .clone()
            .or_else(|| previous.and_then(|existing| existing.description));
        let setting = Setting {
            id,
            tenant_id,
            key: update.key.clone(),
            value: update.value.clone(),
            description,
            updated_at: clock.utc(),
        };
        self.settings.insert(slot, setting.clone());
        setting
    }
}

/// Shared in-memory tables.
///
/// Cloning is cheap and every clone sees the same data.
///
/// # Examples
/// ```
/// use scratch_backend::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::default();
/// let same_tables = store.clone();
/// # drop(same_tables);
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl MemoryStore {
    /// Create an empty store that timestamps rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_by_slug(
        &self,
        slug: &TenantSlug,
    ) -> Result<Option<Tenant>, TenantRepositoryError> {
        let state = self.lock().map_err(TenantRepositoryError::query)?;
        Ok(state
            .tenants
            .values()
            .find(|tenant| tenant.slug == *slug)
            .cloned())
    }

    async fn provision(
        &self,
        request: &TenantProvisioning,
    ) -> Result<ProvisionedTenant, TenantRepositoryError> {
        let mut state = self.lock().map_err(TenantRepositoryError::query)?;
        if state.tenants.values().any(|tenant| tenant.slug == request.slug) {
            return Err(TenantRepositoryError::slug_taken(request.slug.as_ref()));
        }
        if state.username_owner(&request.admin_username).is_some() {
            return Err(TenantRepositoryError::username_taken(
                request.admin_username.as_ref(),
            ));
        }

        let now = self.clock.utc();
        let tenant = Tenant {
            id: TenantId::new(state.allocate_id()),
            name: request.name.clone(),
            slug: request.slug.clone(),
            created_at: now,
        };
        let admin = AdminUser {
            id: AdminId::new(state.allocate_id()),
            tenant_id: tenant.id,
            username: request.admin_username.clone(),
            password_hash: request.password_hash.clone(),
            role: AdminRole::Admin,
            created_at: now,
        };
        state.tenants.insert(tenant.id.get(), tenant.clone());
        state.admins.insert(admin.id.get(), admin.clone());
        for setting in &request.settings {
            state.write_setting(tenant.id, setting, self.clock.as_ref());
        }
        Ok(ProvisionedTenant { tenant, admin })
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_by_username(
        &self,
        username: &AdminUsername,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let state = self.lock().map_err(AdminRepositoryError::query)?;
        Ok(state
            .admins
            .values()
            .find(|admin| admin.username == *username)
            .cloned())
    }

    async fn find_by_id(&self, id: AdminId) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let state = self.lock().map_err(AdminRepositoryError::query)?;
        Ok(state.admins.get(&id.get()).cloned())
    }

    async fn find_by_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let state = self.lock().map_err(AdminRepositoryError::query)?;
        Ok(state
            .admins
            .values()
            .find(|admin| admin.tenant_id == tenant_id)
            .cloned())
    }

    async fn update_credentials(
        &self,
        id: AdminId,
        change: &CredentialChange,
    ) -> Result<Option<AdminUser>, AdminRepositoryError> {
        let mut state = self.lock().map_err(AdminRepositoryError::query)?;
        if let Some(username) = change.username.as_ref() {
            if state.username_owner(username).is_some_and(|owner| owner != id) {
                return Err(AdminRepositoryError::username_taken(username.as_ref()));
            }
        }
        let Some(admin) = state.admins.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(username) = change.username.clone() {
            admin.username = username;
        }
        if let Some(hash) = change.password_hash.clone() {
            admin.password_hash = hash;
        }
        Ok(Some(admin.clone()))
    }
}

#[async_trait]
impl LeadRepository for MemoryStore {
    async fn insert(
        &self,
        tenant_id: TenantId,
        lead: &NewLead,
    ) -> Result<Lead, LeadRepositoryError> {
        let mut state = self.lock().map_err(LeadRepositoryError::query)?;
        let stored = Lead {
            id: LeadId::new(state.allocate_id()),
            tenant_id,
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            email: lead.email.clone(),
            video_watched: lead.video_watched,
            created_at: self.clock.utc(),
        };
        state.leads.insert(stored.id.get(), stored.clone());
        Ok(stored)
    }

    async fn email_exists(
        &self,
        tenant_id: TenantId,
        email: &EmailAddress,
    ) -> Result<bool, LeadRepositoryError> {
        let state = self.lock().map_err(LeadRepositoryError::query)?;
        Ok(state
            .leads
            .values()
            .any(|lead| lead.tenant_id == tenant_id && lead.email == *email))
    }

    async fn count(&self, tenant_id: TenantId) -> Result<u64, LeadRepositoryError> {
        let state = self.lock().map_err(LeadRepositoryError::query)?;
        let total = state
            .leads
            .values()
            .filter(|lead| lead.tenant_id == tenant_id)
            .count();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Lead>, LeadRepositoryError> {
        let state = self.lock().map_err(LeadRepositoryError::query)?;
        let mut leads: Vec<Lead> = state
            .leads
            .values()
            .filter(|lead| lead.tenant_id == tenant_id)
            .cloned()
            .collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(leads)
    }

    async fn delete(&self, tenant_id: TenantId, id: LeadId) -> Result<bool, LeadRepositoryError> {
        let mut state = self.lock().map_err(LeadRepositoryError::query)?;
        let owned = state
            .leads
            .get(&id.get())
            .is_some_and(|lead| lead.tenant_id == tenant_id);
        if owned {
            state.leads.remove(&id.get());
        }
        Ok(owned)
    }

    async fn delete_many(
        &self,
        tenant_id: TenantId,
        ids: &[LeadId],
    ) -> Result<u64, LeadRepositoryError> {
        let mut state = self.lock().map_err(LeadRepositoryError::query)?;
        let before = state.leads.len();
        state
            .leads
            .retain(|raw, lead| lead.tenant_id != tenant_id || !ids.contains(&LeadId::new(*raw)));
        let removed = before - state.leads.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl SettingRepository for MemoryStore {
    async fn find(
        &self,
        tenant_id: TenantId,
        key: &SettingKey,
    ) -> Result<Option<Setting>, SettingRepositoryError> {
        let state = self.lock().map_err(SettingRepositoryError::query)?;
        Ok(state
            .settings
            .get(&(tenant_id.get(), key.as_ref().to_owned()))
            .cloned())
    }

    async fn list(&self, tenant_id: TenantId) -> Result<Vec<Setting>, SettingRepositoryError> {
        let state = self.lock().map_err(SettingRepositoryError::query)?;
        // BTreeMap order is (tenant, key), so the range is already key-sorted.
        Ok(state
            .settings
            .range((tenant_id.get(), String::new())..)
            .take_while(|((owner, _), _)| *owner == tenant_id.get())
            .map(|(_, setting)| setting.clone())
            .collect())
    }

    async fn upsert(
        &self,
        tenant_id: TenantId,
        update: &SettingUpdate,
    ) -> Result<Setting, SettingRepositoryError> {
        let mut state = self.lock().map_err(SettingRepositoryError::query)?;
        Ok(state.write_setting(tenant_id, update, self.clock.as_ref()))
    }
}
