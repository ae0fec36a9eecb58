// Current ad slot lookup

pub mod handler;
pub mod server;
pub mod state;

pub use handler::{get_play_ad, hour_label};
pub use state::AppState;
