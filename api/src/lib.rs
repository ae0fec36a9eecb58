// Catalog function: hierarchy lookups and buyer enquiries

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::{dispatch, Route, RouteTable};
pub use state::AppState;
