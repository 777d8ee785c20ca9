pub mod api;
pub mod error;
pub mod session;

pub use api::ChamBeeClient;
pub use error::ClientError;
pub use session::{FileSessionStore, MemorySessionStore, SessionContext, SessionStore};
