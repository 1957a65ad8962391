pub mod in_memory;
pub mod redis;

pub use in_memory::InMemorySessionStore;
pub use redis::RedisSessionStore;
