// Database queries organized by domain

pub mod gift_codes;
pub mod handicap;
pub mod players;

pub use gift_codes::{gift_code_exists, insert_gift_code, log_admin_action};
pub use handicap::{load_player_sessions, record_handicap, record_insufficient_sessions};
pub use players::{get_player, get_player_handicap, update_profile};
