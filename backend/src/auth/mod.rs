//! Authentication module
//!
//! Credential-format classification, salted-digest verification with
//! upgrade-on-login, and the signed-token codec.

mod middleware;
mod password;
mod token;

pub use middleware::AuthUser;
pub use password::{CredentialFormat, PasswordService, Verification};
pub use token::{Claims, TokenService};
