// User accounts: registration, profile management and password changes

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::*;
pub use repository::*;
pub use service::*;
