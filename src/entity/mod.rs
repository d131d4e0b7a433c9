pub mod purchases;
pub mod sweets;
pub mod users;

pub use purchases::Entity as Purchases;
pub use sweets::Entity as Sweets;
pub use users::Entity as Users;
