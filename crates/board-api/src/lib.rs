pub mod error;
pub mod health;
pub mod messages;
pub mod reads;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, AppStateInner};
