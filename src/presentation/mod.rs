pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use bootstrap::{BootstrapError, Services};
pub use config::{Environment, Settings};
pub use router::create_router;
pub use state::AppState;
