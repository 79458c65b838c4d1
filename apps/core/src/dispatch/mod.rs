//! # Dispatch Module
//!
//! Everything that talks to the remote assistant service.
//!
//! ## Components
//! - `traits`: the `AssistantGateway` seam
//! - `gateway`: reqwest implementation of the gateway
//! - `wire`: request and reply bodies
//! - `orchestrator`: classify, record, send, normalize
//! - `feedback`: rating submission
//! - `supervisor`: channel handle running one task per request
//! - `outcome`, `messages`: result, error and message types

pub mod feedback;
pub mod gateway;
pub mod messages;
pub mod orchestrator;
pub mod outcome;
pub mod supervisor;
pub mod traits;
pub mod wire;

pub use feedback::FeedbackSubmitter;
pub use gateway::HttpAssistantGateway;
pub use messages::DispatchError;
pub use orchestrator::Dispatcher;
pub use outcome::{DispatchOutcome, FailureKind, FeedbackOutcome, HealthStatus, RequestRef};
pub use supervisor::DispatcherHandle;
pub use traits::AssistantGateway;
