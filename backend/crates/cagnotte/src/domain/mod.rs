//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Cagnotte, Donation, CagnotteUpdate)
//! - Domain value objects (Title, Amount, Currency, Pagination)
//! - Domain services (progress, amount buckets, cumulative series)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
