//! Authentication module for weatherman
//!
//! Password hashing, stateless session tokens, and the gate that protects
//! the `/api` routes.

pub mod handlers;
pub mod middleware;
mod password;
mod service;
mod token;

pub use middleware::{AuthGate, AuthenticatedUser};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenIssuer, TokenVerifier, VerificationError};
