// src/infrastructure/security/mod.rs
mod token;

pub use token::StaticTokenManager;
