//! Authentication Module
//! Mission: Issue bearer tokens for known users and resolve them back

pub mod api;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod user_store;

pub use api::AuthState;
pub use error::AuthError;
pub use jwt::JwtHandler;
pub use middleware::auth_middleware;
pub use service::AuthService;
pub use user_store::{InMemoryUserStore, UserStore};
