//! Decoded state of one source: bundled defaults plus the user's file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::decode::Format;
use super::error::ConfigError;
use super::source::Source;
use super::value::Value;
use crate::language::Language;

/// Holds the two decoded tiers of one [`Source`]: the bundled localized
/// defaults and the user's on-disk file.
///
/// Both trees stay `None` until [`load`](Self::load) runs; resolution treats
/// an unloaded tree the same as one that doesn't define the key.
#[derive(Debug)]
pub struct Provider {
    source: Source,
    defaults: Option<Value>,
    values: Option<Value>,
}

impl Provider {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            defaults: None,
            values: None,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The decoded bundled defaults, if loaded.
    pub fn defaults(&self) -> Option<&Value> {
        self.defaults.as_ref()
    }

    /// The decoded user file, if loaded.
    pub fn values(&self) -> Option<&Value> {
        self.values.as_ref()
    }

    pub(crate) fn lookup_values(&self, path: &str) -> Option<&Value> {
        self.values.as_ref()?.get_path(path)
    }

    pub(crate) fn lookup_defaults(&self, path: &str) -> Option<&Value> {
        self.defaults.as_ref()?.get_path(path)
    }

    /// Decodes the bundled resource for `language` and then the user file,
    /// in that order. Either step failing propagates immediately; there is
    /// no retry and no rollback of the step that already completed.
    pub fn load(&mut self, language: Language) -> Result<(), ConfigError> {
        let format = Format::for_source(&self.source)?;

        let resource = self.source.localized_resource(language);
        let text = read_text(&resource, true)?;
        self.defaults = Some(decode_document(format, &resource, &text)?);

        let file = self.source.file().to_path_buf();
        let text = read_text(&file, false)?;
        self.values = Some(decode_document(format, &file, &text)?);

        debug!(
            resource = self.source.resource_name(),
            language = %language,
            "loaded defaults and user values"
        );
        Ok(())
    }

    /// Materializes the bundled defaults for `language` to the user file.
    ///
    /// Skips silently when the file already exists and `overwrite` is false,
    /// so it is safe to call on every startup. Otherwise creates missing
    /// parent directories and copies the resource bytes verbatim. A crash
    /// mid-write can leave a partial file; the next startup rewrites it.
    pub fn save_defaults(&self, language: Language, overwrite: bool) -> Result<(), ConfigError> {
        let file = self.source.file();
        if file.exists() && !overwrite {
            return Ok(());
        }

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let resource = self.source.localized_resource(language);
        let bytes = match fs::read(&resource) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::MissingResource { path: resource })
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: resource,
                    source,
                })
            }
        };
        fs::write(file, bytes).map_err(|source| ConfigError::Write {
            path: file.to_path_buf(),
            source,
        })?;

        debug!(
            resource = self.source.resource_name(),
            path = %file.display(),
            "wrote bundled defaults"
        );
        Ok(())
    }
}

fn read_text(path: &Path, bundled: bool) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if bundled && e.kind() == ErrorKind::NotFound => {
            Err(ConfigError::MissingResource {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn decode_document(format: Format, path: &Path, text: &str) -> Result<Value, ConfigError> {
    format.decode(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle(dir: &TempDir, resource: &str, name: &str, text: &str) {
        let path = dir.path().join("bundle").join(resource);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(name), text).unwrap();
    }

    fn source(dir: &TempDir, resource: &str, file: &str) -> Source {
        Source::new(
            dir.path().join("bundle"),
            resource,
            dir.path().join("data").join(file),
        )
    }

    #[test]
    fn test_save_defaults_creates_parents_and_copies_verbatim() {
        let dir = TempDir::new().unwrap();
        bundle(&dir, "config", "en.yml", "config key: value from config\n");
        let provider = Provider::new(source(&dir, "config", "config.yml"));

        provider.save_defaults(Language::En, false).unwrap();
        let written = fs::read_to_string(dir.path().join("data/config.yml")).unwrap();
        assert_eq!(written, "config key: value from config\n");
    }

    #[test]
    fn test_save_defaults_is_idempotent_without_overwrite() {
        let dir = TempDir::new().unwrap();
        bundle(&dir, "config", "en.yml", "key: first\n");
        let provider = Provider::new(source(&dir, "config", "config.yml"));

        provider.save_defaults(Language::En, false).unwrap();
        // The bundle changing between startups must not clobber user edits.
        bundle(&dir, "config", "en.yml", "key: second\n");
        provider.save_defaults(Language::En, false).unwrap();
        let written = fs::read_to_string(dir.path().join("data/config.yml")).unwrap();
        assert_eq!(written, "key: first\n");

        provider.save_defaults(Language::En, true).unwrap();
        let written = fs::read_to_string(dir.path().join("data/config.yml")).unwrap();
        assert_eq!(written, "key: second\n");
    }

    #[test]
    fn test_save_defaults_without_resource() {
        let dir = TempDir::new().unwrap();
        let provider = Provider::new(source(&dir, "config", "config.yml"));
        let result = provider.save_defaults(Language::En, false);
        assert!(matches!(result, Err(ConfigError::MissingResource { .. })));
    }

    #[test]
    fn test_load_round_trips_saved_defaults() {
        let dir = TempDir::new().unwrap();
        bundle(&dir, "config", "en.yml", "a: 1\nnested:\n  b: two\n");
        let mut provider = Provider::new(source(&dir, "config", "config.yml"));

        provider.save_defaults(Language::En, false).unwrap();
        provider.load(Language::En).unwrap();
        assert_eq!(provider.values(), provider.defaults());
        assert_eq!(
            provider.lookup_values("nested.b"),
            Some(&Value::String("two".into()))
        );
    }

    #[test]
    fn test_load_requires_user_file() {
        let dir = TempDir::new().unwrap();
        bundle(&dir, "config", "en.yml", "a: 1\n");
        let mut provider = Provider::new(source(&dir, "config", "config.yml"));

        let result = provider.load(Language::En);
        assert!(matches!(result, Err(ConfigError::Read { .. })));
        // Nothing resolved from the failed call's second step.
        assert!(provider.values().is_none());
    }

    #[test]
    fn test_load_wraps_decoder_failure() {
        let dir = TempDir::new().unwrap();
        bundle(&dir, "config", "en.json", "{not json");
        let provider_source = source(&dir, "config", "config.json");
        let mut provider = Provider::new(provider_source);

        let result = provider.load(Language::En);
        match result {
            Err(ConfigError::Parse { path, .. }) => {
                assert!(path.ends_with("config/en.json"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unloaded_trees_count_as_absent() {
        let dir = TempDir::new().unwrap();
        let provider = Provider::new(source(&dir, "config", "config.yml"));
        assert!(provider.lookup_values("any.key").is_none());
        assert!(provider.lookup_defaults("any.key").is_none());
    }
}
