//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; `diesel print-schema` can regenerate them from a live
//! database after a migration changes the schema.

diesel::table! {
    /// User records table.
    ///
    /// One row per managed record. `id` is a `SERIAL` primary key and
    /// `email` carries a unique constraint.
    users (id) {
        /// Primary key, store-assigned.
        id -> Int4,
        /// Unique email address.
        email -> Varchar,
        /// Given name.
        first_name -> Varchar,
        /// Family name.
        last_name -> Varchar,
        /// Job position.
        position -> Varchar,
        /// Phone number as a plain integer.
        phone -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
