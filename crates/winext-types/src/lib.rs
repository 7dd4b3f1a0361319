pub mod args;
pub mod cmdlet;
pub mod config;
pub mod error;
pub mod exec;
pub mod grains;
pub mod servicing;

#[cfg(test)]
mod tests;

pub use error::ExtError;
pub type Result<T> = std::result::Result<T, ExtError>;
