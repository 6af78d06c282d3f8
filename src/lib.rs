pub mod chart;
pub mod clock;
pub mod config;
pub mod cookies;
pub mod counter;
pub mod dom;
pub mod errors;
pub mod events;
pub mod loader;
pub mod logging;
pub mod notifications;
pub mod page;
pub mod search;
pub mod sla;
pub mod validation;

pub use config::UiConfig;
pub use dom::{Dom, MemoryDom};
pub use errors::UiError;
pub use events::{ClickEvent, EventOutcome};
pub use notifications::{HttpTransport, MarkReadTransport};
pub use page::{Page, ReadySummary};
