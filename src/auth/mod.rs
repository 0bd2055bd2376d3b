// Authentication module
// Session tokens, password hashing, login and the route guard for
// protected endpoints

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::login_handler;
pub use middleware::{ensure_owner, require_auth, AuthenticatedUser};
pub use models::{AuthResponse, LoginRequest};
pub use password::PasswordService;
pub use service::AuthService;
pub use token::{extract_token, Claims, TokenService};
