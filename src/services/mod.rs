pub mod admin_service;
pub mod auth_service;
pub mod purchase_service;
pub mod sweet_service;
