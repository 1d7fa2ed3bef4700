//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// One row per client brand.
    tenants (id) {
        id -> Int4,
        /// Display name (max 120 characters).
        name -> Varchar,
        /// Routing slug, unique.
        slug -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Admin credentials. `username` is unique across all tenants.
    admin_users (id) {
        id -> Int4,
        tenant_id -> Int4,
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Captured leads.
    registrations (id) {
        id -> Int4,
        tenant_id -> Int4,
        name -> Varchar,
        phone -> Varchar,
        /// Lowercased email.
        email -> Varchar,
        video_watched -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-tenant key/value settings, unique on `(tenant_id, key)`.
    settings (id) {
        id -> Int4,
        tenant_id -> Int4,
        key -> Varchar,
        value -> Varchar,
        description -> Nullable<Varchar>,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(admin_users -> tenants (tenant_id));
diesel::joinable!(registrations -> tenants (tenant_id));
diesel::joinable!(settings -> tenants (tenant_id));

diesel::allow_tables_to_appear_in_same_query!(admin_users, registrations, settings, tenants);
