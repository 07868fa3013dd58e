//! Encrypt-on-write and decrypt-on-read for configured columns

pub mod field;
pub mod ports;

pub use field::FieldEncryptor;
