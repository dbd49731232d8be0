//! The top-level config object: ordered sources, runtime overrides, and the
//! tiered key-resolution algorithm.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ConfigError;
use super::provider::Provider;
use super::source::Source;
use super::value::{FromValue, Value};
use crate::language::Language;

/// A layered configuration over any number of named sources.
///
/// Values resolve through three tiers, highest precedence first: runtime
/// overrides set on this instance, the user's on-disk files, and the bundled
/// per-language defaults. Within a tier, sources are consulted in
/// registration order and the first one defining the key wins.
///
/// All operations run synchronously on the caller's thread; a `Config`
/// shared across threads must be serialized externally.
///
/// ## Example
///
/// ```no_run
/// use polyconf::{Config, Source};
///
/// let mut config = Config::new();
/// config.add_source(Source::new("/opt/app/bundle", "config", "/opt/app/config.yml"));
/// config.add_source(Source::new("/opt/app/bundle", "messages", "/opt/app/messages.yml"));
///
/// config.save_all_defaults(false)?; // first run: materialize the defaults
/// config.load_all()?;
///
/// let greeting: String = config.get_string("messages.greeting")?;
/// let retries = config.get_int_or("network.retries", 3);
/// # Ok::<(), polyconf::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct Config {
    providers: Vec<Provider>,
    runtime_values: HashMap<String, Value>,
    language: Language,
}

impl Config {
    /// An empty config resolving against [`Language::En`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Registers a source, pairing it with a fresh unloaded provider.
    ///
    /// Returns false (and changes nothing) when an equal source is already
    /// registered. Registration order decides ties during resolution.
    pub fn add_source(&mut self, source: Source) -> bool {
        if self.providers.iter().any(|p| p.source() == &source) {
            return false;
        }
        self.providers.push(Provider::new(source));
        true
    }

    /// Removes a source and its provider. Returns false if it wasn't registered.
    pub fn remove_source(&mut self, source: &Source) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| p.source() != source);
        self.providers.len() != before
    }

    /// The registered sources, in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.providers.iter().map(Provider::source)
    }

    /// The provider for the source with the given resource name.
    pub fn provider(&self, resource: &str) -> Option<&Provider> {
        self.providers
            .iter()
            .find(|p| p.source().resource_name() == resource)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switches the active language for subsequent loads.
    ///
    /// Already-loaded defaults keep their old localization until
    /// [`load_all`](Self::load_all) runs again.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Whether every registered source bundles the active language.
    pub fn is_language_available(&self) -> bool {
        self.is_language_available_for(self.language)
    }

    /// Whether every registered source bundles the given language.
    pub fn is_language_available_for(&self, language: Language) -> bool {
        self.providers
            .iter()
            .all(|p| p.source().is_language_available(language))
    }

    /// Loads every source's defaults and user file, in registration order.
    /// The first failure propagates and leaves the remaining providers
    /// untouched.
    pub fn load_all(&mut self) -> Result<(), ConfigError> {
        let language = self.language;
        debug!(%language, sources = self.providers.len(), "loading all sources");
        for provider in &mut self.providers {
            provider.load(language)?;
        }
        Ok(())
    }

    /// Writes every source's bundled defaults to its user file.
    ///
    /// With `overwrite` false this only fills in missing files, so it is
    /// safe (and intended) to call on every startup before
    /// [`load_all`](Self::load_all).
    pub fn save_all_defaults(&self, overwrite: bool) -> Result<(), ConfigError> {
        for provider in &self.providers {
            provider.save_defaults(self.language, overwrite)?;
        }
        Ok(())
    }

    /// Sets a process-local override for the exact key.
    ///
    /// Overrides outrank every source for every lookup and are never
    /// persisted.
    pub fn set_runtime_value(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.runtime_values.insert(key.into(), value.into());
    }

    /// Resolves a dotted key path across all tiers.
    ///
    /// Precedence: the runtime-override map (exact key match), then each
    /// source's user file in registration order, then each source's bundled
    /// defaults in the same order. A tree that hasn't been loaded counts as
    /// not defining the key.
    pub fn resolve(&self, key: &str) -> Result<&Value, ConfigError> {
        if let Some(value) = self.runtime_values.get(key) {
            return Ok(value);
        }
        for provider in &self.providers {
            if let Some(value) = provider.lookup_values(key) {
                return Ok(value);
            }
        }
        for provider in &self.providers {
            if let Some(value) = provider.lookup_defaults(key) {
                return Ok(value);
            }
        }
        Err(ConfigError::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// Resolves and converts a key to `T`.
    ///
    /// This is the single throwing core every typed accessor wraps: the
    /// optional and fallback forms only differ in what they do with the
    /// error.
    pub fn get<T: FromValue>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.resolve(key)?;
        T::from_value(value).map_err(|e| ConfigError::Conversion {
            key: key.to_owned(),
            value: e.value,
            target: e.target,
        })
    }

    /// [`get`](Self::get) with lookup and conversion failures mapped to `None`.
    pub fn get_opt<T: FromValue>(&self, key: &str) -> Option<T> {
        self.get(key).ok()
    }

    /// [`get`](Self::get) with lookup and conversion failures replaced by `fallback`.
    pub fn get_or<T: FromValue>(&self, key: &str, fallback: T) -> T {
        self.get(key).unwrap_or(fallback)
    }

    /// Deserializes the subtree at `key` into any `serde` type.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.resolve(key)?;
        serde_json::from_value(serde_json::Value::from(value)).map_err(|source| {
            ConfigError::Deserialize {
                key: key.to_owned(),
                source,
            }
        })
    }
}

macro_rules! typed_accessors {
    ($($(#[$doc:meta])* $ty:ty => $get:ident / $get_opt:ident / $get_or:ident;)*) => {
        impl Config {
            $(
                $(#[$doc])*
                pub fn $get(&self, key: &str) -> Result<$ty, ConfigError> {
                    self.get(key)
                }

                #[doc = concat!("[`", stringify!($get), "`](Self::", stringify!($get), ") with failures mapped to `None`.")]
                pub fn $get_opt(&self, key: &str) -> Option<$ty> {
                    self.get_opt(key)
                }

                #[doc = concat!("[`", stringify!($get), "`](Self::", stringify!($get), ") with failures replaced by `fallback`.")]
                pub fn $get_or(&self, key: &str, fallback: $ty) -> $ty {
                    self.get_or(key, fallback)
                }
            )*
        }
    };
}

typed_accessors! {
    /// Resolves `key` as a string. Native scalars render to their canonical
    /// text form.
    String => get_string / get_string_opt / get_string_or;

    /// Resolves `key` as a boolean. Accepts, case-insensitively, `true`,
    /// `yes`, `on` and `1`, plus `false`, `no`, `off` and `0`; anything else
    /// is a conversion error naming the offending value.
    bool => get_bool / get_bool_opt / get_bool_or;

    /// Resolves `key` as an `i32`.
    i32 => get_int / get_int_opt / get_int_or;

    /// Resolves `key` as an `i64`.
    i64 => get_long / get_long_opt / get_long_or;

    /// Resolves `key` as an `f64`.
    f64 => get_double / get_double_opt / get_double_or;

    /// Resolves `key` as an arbitrary-precision decimal.
    Decimal => get_decimal / get_decimal_opt / get_decimal_or;

    /// Resolves `key` as a list of strings.
    Vec<String> => get_string_list / get_string_list_opt / get_string_list_or;

    /// Resolves `key` as a list of `i32`.
    Vec<i32> => get_int_list / get_int_list_opt / get_int_list_or;

    /// Resolves `key` as a list of raw values.
    Vec<Value> => get_list / get_list_opt / get_list_or;

    /// Resolves `key` as a mapping of raw values.
    BTreeMap<String, Value> => get_map / get_map_opt / get_map_or;
}
