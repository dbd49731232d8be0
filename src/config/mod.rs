//! Configuration loading, layering, and resolution.

mod decode;
mod error;
mod provider;
mod registry;
mod source;
mod value;

pub use decode::Format;
pub use error::{ConfigError, DecodeError};
pub use provider::Provider;
pub use registry::Config;
pub use source::Source;
pub use value::{ConversionError, FromValue, Value};
