pub mod api;
pub mod db;


pub use api::*;
pub use db::*;
