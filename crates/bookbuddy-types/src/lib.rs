pub mod auth;
pub mod book;

pub use auth::*;
pub use book::*;

/// Settings the browser needs from the server, shared via Leptos context.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PublicConfig {
    pub google_client_id: Option<String>,
}
