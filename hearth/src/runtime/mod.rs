pub mod commands;
pub mod executor;
pub mod scripts;

pub use executor::{MutationExecutor, RedisExecutor, execute_command};
