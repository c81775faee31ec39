use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Serializes tests that touch process-wide state: the working
/// directory, environment variables, and the standard stream
/// descriptors.
pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(Mutex::default);
