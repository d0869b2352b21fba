//! Application Layer - Use cases
//!
//! Orchestrates domain logic behind the HTTP handlers.

pub mod browse_cagnottes;
pub mod config;
pub mod donate;
pub mod manage_cagnotte;
pub mod post_update;
pub mod stats;

pub use browse_cagnottes::BrowseCagnottesUseCase;
pub use config::CagnotteConfig;
pub use donate::{DonateInput, DonateUseCase};
pub use manage_cagnotte::{CreateCagnotteInput, ManageCagnotteUseCase, UpdateCagnotteInput};
pub use post_update::{PostUpdateInput, PostUpdateUseCase};
pub use stats::{CagnotteStats, StatsUseCase};
