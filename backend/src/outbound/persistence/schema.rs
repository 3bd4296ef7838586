//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Lowercased email, unique.
        email -> Varchar,
        /// bcrypt hash string.
        password_hash -> Varchar,
        /// 0 = unconfirmed, 1 = confirmed.
        status -> Int2,
        /// Single-use token cleared on confirmation.
        confirmation_token -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded recording metadata.
    recordings (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        /// Base name of the file as uploaded.
        filename -> Varchar,
        language -> Varchar,
        /// 0 = pending, 1 = uploaded.
        status -> Int2,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(recordings -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, recordings);
