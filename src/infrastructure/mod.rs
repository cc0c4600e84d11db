pub mod cache;
pub mod database;
pub mod queue;
pub mod repositories;
pub mod revalidate;
pub mod security;
pub mod time;
