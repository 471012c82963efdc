//! Authentication utilities

mod jwt;
mod secret;

pub use jwt::{Claims, JwtService, TokenPair, TokenType};
pub use secret::{
    hash_secret, validate_password_strength, verify_secret, IssuedToken, PasswordService,
};
