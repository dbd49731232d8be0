//! Identity and location of one logical configuration resource.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::language::Language;

/// One logical config resource: where its bundled, language-localized
/// defaults live and which on-disk file holds the user's overrides.
///
/// A `Source` is pure identity and location; the decoded state lives in the
/// [`Provider`](super::Provider) it is paired with. Two sources with equal
/// fields are interchangeable.
///
/// Bundled resources are laid out under a caller-supplied root as
/// `{root}/{resource}/{lowercase locale code}.{extension}`, where the
/// extension is taken from the target file. A source named `"config"`
/// targeting `plugins/config.yml` therefore bundles its English defaults at
/// `{root}/config/en.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    root: PathBuf,
    resource: String,
    file: PathBuf,
}

impl Source {
    pub fn new(
        root: impl Into<PathBuf>,
        resource: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            resource: resource.into(),
            file: file.into(),
        }
    }

    /// The root directory the bundled resources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The resource name, i.e. `"config"` in `{root}/config/en.yml`.
    pub fn resource_name(&self) -> &str {
        &self.resource
    }

    /// The on-disk file holding the user's copy of this resource.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The bundled resource path for the given language.
    ///
    /// Derived on every call from the resource name, the target file's
    /// extension, and the requested language.
    pub fn localized_resource(&self, language: Language) -> PathBuf {
        let extension = self
            .file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        self.root
            .join(&self.resource)
            .join(format!("{}.{}", language.code().to_ascii_lowercase(), extension))
    }

    /// Capability probe: whether this source bundles a translation for the
    /// given language. Any I/O failure reads as "not available".
    pub fn is_language_available(&self, language: Language) -> bool {
        File::open(self.localized_resource(language)).is_ok()
    }
}
