pub mod api;
pub mod client;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod models;
pub mod optimistic;
pub mod projection;
pub mod screens;
pub mod session;
pub mod status;
pub mod table;
pub mod validation;
pub mod view_state;

// Re-export commonly used types
pub use api::{DashboardInputs, fetch_dashboard_inputs};
pub use client::ApiClient;
pub use config::ConsoleConfig;
pub use currency::{Currency, format_currency};
pub use dashboard::{DashboardSummary, summarize};
pub use error::{ConsoleError, Result};
pub use loader::{LoadTicket, LoadTracker};
pub use projection::{DisplayRow, project_claim, project_claims};
pub use session::{FileSessionStore, InMemorySessionStore, Session, SessionStore};
pub use status::{StatusContext, StatusKey, normalize_status};
pub use table::{Page, PageMeta, SortDirection, TableSpec, TableState};
pub use view_state::LoadState;
