//! Deterministic example user data generation.
//!
//! Produces reproducible fake user records for seeding demo databases: the
//! same seed value always yields identical output, so environments seeded
//! with the same parameters hold the same data.

mod generator;

pub use generator::{SeedUser, generate_users};
