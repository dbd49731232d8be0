//! Explicit struct population from resolved configuration values.
//!
//! Instead of marking fields and reflecting over them, a [`Mapper`] walks an
//! explicit list of (key path, setter) pairs and applies each resolved value
//! to a target you own.

use crate::config::{Config, ConfigError, FromValue, Value};

/// Builder that populates `target` field by field from a [`Config`].
///
/// Each `bind` resolves one dotted key, converts it, and hands it to a
/// setter. Resolution and conversion failures fail the whole mapping unless
/// the optional form is used.
///
/// ## Example
///
/// ```no_run
/// use polyconf::{Config, Mapper};
///
/// #[derive(Default)]
/// struct Settings {
///     greeting: String,
///     retries: i32,
/// }
///
/// # fn demo(config: &Config) -> Result<(), polyconf::ConfigError> {
/// let settings = Mapper::new(config, Settings::default())
///     .bind("messages.greeting", |s, v| s.greeting = v)?
///     .bind("network.retries", |s, v| s.retries = v)?
///     .finish();
/// # let _ = settings; Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Mapper<'a, T> {
    config: &'a Config,
    target: T,
}

impl<'a, T> Mapper<'a, T> {
    pub fn new(config: &'a Config, target: T) -> Self {
        Self { config, target }
    }

    /// Resolves `key`, converts it to `V`, and applies the setter.
    pub fn bind<V: FromValue>(
        mut self,
        key: &str,
        set: impl FnOnce(&mut T, V),
    ) -> Result<Self, ConfigError> {
        let value = self.config.get::<V>(key)?;
        set(&mut self.target, value);
        Ok(self)
    }

    /// Like [`bind`](Self::bind), but a missing or unconvertible key leaves
    /// the target untouched.
    pub fn bind_opt<V: FromValue>(mut self, key: &str, set: impl FnOnce(&mut T, V)) -> Self {
        if let Some(value) = self.config.get_opt::<V>(key) {
            set(&mut self.target, value);
        }
        self
    }

    /// Resolves `key` and hands the raw value to a caller-supplied
    /// conversion, for targets [`FromValue`] can't express.
    pub fn bind_with(
        mut self,
        key: &str,
        apply: impl FnOnce(&mut T, &Value) -> Result<(), ConfigError>,
    ) -> Result<Self, ConfigError> {
        let value = self.config.resolve(key)?;
        apply(&mut self.target, value)?;
        Ok(self)
    }

    /// Returns the populated target.
    pub fn finish(self) -> T {
        self.target
    }
}
