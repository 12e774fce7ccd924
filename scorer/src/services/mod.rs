//! Scorer service implementations

pub mod groq_client;
pub mod pacer;

#[cfg(test)]
pub mod tests;

pub use groq_client::*;
pub use pacer::*;
