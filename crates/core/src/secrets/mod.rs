//! Secret resolution with a time-bounded cache

pub mod ports;
pub mod resolver;

pub use resolver::SecretResolver;
