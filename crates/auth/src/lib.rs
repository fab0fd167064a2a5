pub mod error;
pub mod jwt;
pub mod password;
pub mod service;

pub use error::{AuthError, Result};
pub use jwt::{Claims, JwtService};
pub use password::PasswordHasher;
pub use service::{AuthResponse, AuthService, LoginRequest};
