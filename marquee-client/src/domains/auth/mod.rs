//! Session token storage, authentication state and the bootstrap that
//! connects them.

pub mod bootstrap;
pub mod errors;
pub mod state_types;
pub mod storage;

pub use bootstrap::SessionBootstrap;
pub use errors::SessionError;
pub use state_types::{AuthState, AuthStateStore};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
