// src/presentation/http/controllers/mod.rs
pub mod hooks;
pub mod publish;
