//! Request pipeline: providers, prompts, dispatch, probing, offline
//! fallback, and the orchestrator that ties them together.

pub mod cache;
pub mod dispatch;
pub mod http;
pub mod logging;
pub mod offline;
pub mod orchestrator;
pub mod probe;
pub mod prompt;
pub mod provider;
pub mod registry;

pub use cache::ResponseCache;
pub use dispatch::{Dispatcher, RequestParams, clean_response};
pub use offline::{OfflineProcessor, ProcessingDelay};
pub use orchestrator::{Orchestrator, Origin, ProcessOutcome};
pub use probe::{ProbeOutcome, ProbeReport, Prober};
pub use prompt::Action;
pub use provider::{Provider, ProviderDescriptor};
pub use registry::ProviderRegistry;
