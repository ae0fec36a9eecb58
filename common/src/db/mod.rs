// Database layer module

pub mod pool;
pub mod session;

pub use pool::ConnectionManager;
pub use session::{MySqlSession, Session, SessionFactory};
