pub mod keys;
pub mod window;

pub use keys::key_identifier;
pub use window::{create_window, PlatformConfig};
