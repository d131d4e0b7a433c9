pub mod auth;
pub mod purchases;
pub mod sweets;
