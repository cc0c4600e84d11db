// src/infrastructure/cache/mod.rs
mod memory;
mod redis;

pub use memory::InMemoryPageCache;
pub use redis::RedisPageCache;
