pub mod factory;
pub mod identity;
pub mod password;
pub mod policy;
pub mod role;
pub mod service;
pub mod token_codec;

pub use identity::Identity;
pub use password::PasswordHasher;
pub use policy::{AccessPolicy, Decision};
pub use service::{AuthOutcome, AuthService, Registration};
pub use token_codec::{TokenCodec, TokenError};
