//! Filesystem layout source.
//!
//! Each type's layout lives in `<dir>/<Type>.layout.toml`:
//!
//! ```toml
//! named        = "Client"        # optional, type-level
//! described_as = "A paying party" # optional
//!
//! [members.email]
//! named    = "E-mail"
//! hidden   = false
//! sequence = "1.1"
//! group    = "Contact"
//! ```
//!
//! The file is re-read on every call, so editing it and reloading the layout
//! picks up the change without rebuilding the metamodel.

use std::{fs, io::ErrorKind, path::PathBuf};

use tracing::{debug, instrument};

use facetmodel_core::{
    application::{Layout, ports::LayoutSource},
    domain::TypeName,
    error::MetaModelResult,
};

use crate::error::AdapterError;

/// Suffix that marks a layout file.
pub const LAYOUT_SUFFIX: &str = ".layout.toml";

#[derive(Debug, Clone)]
pub struct FileLayoutSource {
    dir: PathBuf,
}

impl FileLayoutSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the layout for `type_name` is expected.
    pub fn path_for(&self, type_name: &TypeName) -> PathBuf {
        self.dir.join(format!("{type_name}{LAYOUT_SUFFIX}"))
    }

    fn read(&self, type_name: &TypeName) -> Result<Option<Layout>, AdapterError> {
        let path = self.path_for(type_name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(AdapterError::Io { path, source }),
        };
        let layout = toml::from_str(&raw).map_err(|source| AdapterError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(file = %path.display(), "read layout");
        Ok(Some(layout))
    }
}

impl LayoutSource for FileLayoutSource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn layout_for(&self, type_name: &TypeName) -> MetaModelResult<Option<Layout>> {
        self.read(type_name)
            .map_err(|e| e.into_layout_error(type_name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_type_and_member_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("Customer.layout.toml"),
            "named = \"Client\"\n\n[members.email]\nnamed = \"E-mail\"\nhidden = true\nsequence = \"1.1\"\n",
        )
        .unwrap();

        let source = FileLayoutSource::new(tmp.path());
        let layout = source
            .layout_for(&TypeName::new("Customer"))
            .unwrap()
            .unwrap();
        assert_eq!(layout.named.as_deref(), Some("Client"));
        let email = &layout.members["email"];
        assert_eq!(email.named.as_deref(), Some("E-mail"));
        assert_eq!(email.hidden, Some(true));
        assert_eq!(email.sequence.as_deref(), Some("1.1"));
        assert_eq!(email.group, None);
    }

    #[test]
    fn missing_file_means_no_layout() {
        let tmp = TempDir::new().unwrap();
        let source = FileLayoutSource::new(tmp.path());
        assert!(source.layout_for(&TypeName::new("Order")).unwrap().is_none());
    }

    #[test]
    fn malformed_file_names_the_type() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Order.layout.toml"), "named = ").unwrap();
        let err = FileLayoutSource::new(tmp.path())
            .layout_for(&TypeName::new("Order"))
            .unwrap_err();
        assert!(err.to_string().contains("Layout for 'Order'"));
    }
}
