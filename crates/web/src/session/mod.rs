//! Server-side sessions identified by a cookie.

mod data;
mod handle;
mod store;

pub use data::SessionData;
pub use handle::{new_session_id, Session, SessionChange};
pub use store::{MemorySessionStore, RedisSessionStore, SessionStore};
