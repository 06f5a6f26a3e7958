#![allow(non_snake_case)]

//! Session handling and gateway access for the BookBuddy front end.
//!
//! Nothing here depends on Leptos: the UI wraps [`LibraryClient`] in its own
//! reactive context, and the same code runs natively under test.

pub mod claims;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod library;
pub mod reset;
pub mod session;
pub mod storage;

pub use error::{ClientError, FormError};
pub use gateway::GatewayClient;
pub use library::LibraryClient;
pub use session::Session;
pub use storage::{MemoryStore, SessionStore};

#[cfg(feature = "browser")]
pub use storage::BrowserStore;
