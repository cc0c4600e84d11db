// src/application/ports/mod.rs
pub mod page_cache;
pub mod queue;
pub mod revalidate;
pub mod security;
pub mod time;
