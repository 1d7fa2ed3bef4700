//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every field so a hand-edited row surfaces as a query error
//! instead of an invalid value.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    AdminId, AdminRole, AdminUser, AdminUsername, EmailAddress, Lead, LeadId, LeadName,
    PasswordHash, PhoneNumber, Setting, SettingKey, Tenant, TenantId, TenantName, TenantSlug,
};

use super::schema::{admin_users, registrations, settings, tenants};

/// Row struct for reading from the tenants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating tenants.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tenants)]
pub(crate) struct NewTenantRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = String;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TenantId::new(row.id),
            name: TenantName::new(&row.name)
                .map_err(|err| format!("tenant {} has an invalid name: {err}", row.id))?,
            slug: TenantSlug::new(&row.slug)
                .map_err(|err| format!("tenant {} has an invalid slug: {err}", row.id))?,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Admin credential models
// ---------------------------------------------------------------------------

/// Row struct for reading from the admin_users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admin_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminUserRow {
    pub id: i32,
    pub tenant_id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating admin credentials.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_users)]
pub(crate) struct NewAdminUserRow<'a> {
    pub tenant_id: i32,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Changeset for credential updates; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = admin_users)]
pub(crate) struct AdminCredentialsUpdate<'a> {
    pub username: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = String;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdminId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            username: AdminUsername::new(&row.username)
                .map_err(|err| format!("admin {} has an invalid username: {err}", row.id))?,
            password_hash: PasswordHash::from_stored(row.password_hash),
            role: AdminRole::from_stored(&row.role),
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Registration models
// ---------------------------------------------------------------------------

/// Row struct for reading from the registrations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RegistrationRow {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub video_watched: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for storing a registration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = registrations)]
pub(crate) struct NewRegistrationRow<'a> {
    pub tenant_id: i32,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub video_watched: bool,
}

impl TryFrom<RegistrationRow> for Lead {
    type Error = String;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Self {
            id: LeadId::new(id),
            tenant_id: TenantId::new(row.tenant_id),
            name: LeadName::new(&row.name)
                .map_err(|issue| format!("registration {id}: {}", issue.message()))?,
            phone: PhoneNumber::new(&row.phone)
                .map_err(|err| format!("registration {id}: {err}"))?,
            email: EmailAddress::new(&row.email)
                .map_err(|err| format!("registration {id}: {err}"))?,
            video_watched: row.video_watched,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Setting models
// ---------------------------------------------------------------------------

/// Row struct for reading from the settings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SettingRow {
    pub id: i32,
    pub tenant_id: i32,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for upserting a setting.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = settings)]
pub(crate) struct NewSettingRow<'a> {
    pub tenant_id: i32,
    pub key: &'a str,
    pub value: &'a str,
    pub description: Option<&'a str>,
}

impl TryFrom<SettingRow> for Setting {
    type Error = String;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            tenant_id: TenantId::new(row.tenant_id),
            key: SettingKey::new(&row.key)
                .map_err(|issue| format!("setting {}: {}", row.id, issue.message()))?,
            value: row.value,
            description: row.description,
            updated_at: row.updated_at,
        })
    }
}
