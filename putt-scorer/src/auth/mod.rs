pub mod admin;
pub mod jwt;

pub use admin::require_admin;
pub use jwt::{authenticate, extract_jwt_from_header, validate_jwt_and_extract_player_id};
