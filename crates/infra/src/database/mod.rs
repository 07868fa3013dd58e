//! Database facade and start-up connectivity checks

pub mod manager;
pub mod probes;
pub mod registration;

pub use manager::{Collaborators, Database, SECRET_ACCESS_DEADLINE};
pub use probes::{ConnectivityProbe, KeyManagerProbe, SecretStoreProbe};
pub use registration::HookRegistry;
