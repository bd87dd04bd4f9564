mod session;

pub use session::{SessionError, SessionStore, StoredSession};
