//! ERP assistant core.
//!
//! Classifies questions asked from ERP screens, tracks them as solicitations
//! and dispatches them to the remote assistant service.

pub mod brain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod solicitations;
pub mod telemetry;

pub use config::{AssistantConfig, TelemetryConfig};
pub use dispatch::{DispatchOutcome, DispatcherHandle, FeedbackOutcome, HealthStatus};
pub use error::AppError;
pub use solicitations::SolicitationStore;

#[cfg(test)]
mod tests;
