//! Sessions correlating a summary with its follow-up conversation.

pub mod cleanup;
pub mod error;
pub mod ids;
pub mod store;
pub mod types;

pub use cleanup::SessionCleanup;
pub use error::{SessionError, SessionResult};
pub use ids::SessionId;
pub use store::{InMemorySessionStore, SessionStore, StoreFuture};
pub use types::{Session, Turn};
