//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the token/password subsystems.

pub mod user;

pub use user::UserService;
