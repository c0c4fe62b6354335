//! Filesystem-based descriptor loader.
//!
//! Discovers `*.types.toml` files under a directory tree and converts them
//! into [`TypeDescriptor`]s for the specification loader.
//!
//! # Directory layout expected
//!
//! ```text
//! model/
//! ├── customers.types.toml
//! ├── orders/
//! │   └── orders.types.toml
//! └── layouts/
//!     └── Customer.layout.toml   ← ignored here, see `FileLayoutSource`
//! ```
//!
//! # `*.types.toml` format
//!
//! ```toml
//! [[types]]
//! name       = "Customer"
//! extends    = "Party"                  # optional
//! implements = ["Auditable"]            # optional
//! abstract   = false                    # optional
//! annotations = [
//!     { name = "DomainObject", attributes = { nature = "entity" } },
//! ]
//!
//! [[types.constructors]]
//! params = ["Party"]                    # optional visibility = "private"
//!
//! [[types.methods]]
//! name    = "placeOrder"
//! returns = "Order"                     # omitted for void
//! params  = [
//!     "Product",
//!     { type = "int", annotations = [{ name = "Named", attributes = { value = "Quantity" } }] },
//! ]
//! visibility = "public"                 # public | protected | private
//! static     = false
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use facetmodel_core::{
    application::ports::DescriptorSource,
    domain::{Annotation, MethodDescriptor, TypeDescriptor, TypeName, Visibility},
    error::MetaModelResult,
};

use crate::error::AdapterError;

/// Suffix that marks a descriptor file.
pub const DESCRIPTOR_SUFFIX: &str = ".types.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `*.types.toml` file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DescriptorManifest {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// One `[[types]]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct TypeEntry {
    pub name: String,
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub constructors: Vec<ConstructorEntry>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

/// One `[[types.constructors]]` table.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConstructorEntry {
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// One `[[types.methods]]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct MethodEntry {
    pub name: String,
    pub returns: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A parameter is either a bare type name or a table with annotations.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ParamEntry {
    Plain(String),
    Annotated {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
}

impl ParamEntry {
    fn type_name(&self) -> TypeName {
        match self {
            Self::Plain(ty) | Self::Annotated { ty, .. } => TypeName::new(ty.as_str()),
        }
    }

    fn annotations(&self) -> &[Annotation] {
        match self {
            Self::Plain(_) => &[],
            Self::Annotated { annotations, .. } => annotations,
        }
    }
}

impl TypeEntry {
    /// Convert into a validated descriptor.
    pub fn into_descriptor(self) -> Result<TypeDescriptor, String> {
        let mut builder = TypeDescriptor::builder(self.name.as_str());
        if let Some(supertype) = self.extends {
            builder = builder.extends(supertype);
        }
        for interface in self.implements {
            builder = builder.implements(interface);
        }
        if self.is_abstract {
            builder = builder.abstract_type();
        }
        for annotation in self.annotations {
            builder = builder.annotated(annotation);
        }
        for ctor in self.constructors {
            builder = builder.constructor(|mut c| {
                c.parameter_types = ctor.params.into_iter().map(TypeName::new).collect();
                c.with_visibility(ctor.visibility)
            });
        }
        for method in self.methods {
            builder = builder.method(method.name.clone(), |m| apply_method(m, method));
        }
        builder.build().map_err(|e| e.to_string())
    }
}

fn apply_method(mut target: MethodDescriptor, entry: MethodEntry) -> MethodDescriptor {
    target.parameter_types = entry.params.iter().map(ParamEntry::type_name).collect();
    target.parameter_annotations = entry
        .params
        .iter()
        .map(|p| p.annotations().to_vec())
        .collect();
    // Trailing parameters without metadata need no slot.
    while target
        .parameter_annotations
        .last()
        .is_some_and(Vec::is_empty)
    {
        target.parameter_annotations.pop();
    }
    target.return_type = entry.returns.map(TypeName::new);
    target.annotations = entry.annotations;
    target.is_static = entry.is_static;
    target.with_visibility(entry.visibility)
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads type descriptors from `*.types.toml` files on disk.
///
/// # Example
///
/// ```rust,no_run
/// use facetmodel_adapters::DescriptorLoader;
/// use facetmodel_core::application::ports::DescriptorSource;
///
/// let loader = DescriptorLoader::new("./model");
/// let types = loader.load()?;
/// println!("Loaded {} types", types.len());
/// # Ok::<(), facetmodel_core::error::MetaModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorLoader {
    root: PathBuf,
    strict: bool,
}

impl DescriptorLoader {
    /// Create a loader pointed at `root`.
    ///
    /// The directory does not need to exist yet; [`DescriptorSource::load`]
    /// returns an error if it is missing when called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            strict: false,
        }
    }

    /// In strict mode a malformed file fails the whole load instead of being
    /// skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every descriptor file under the root, in a stable order.
    pub fn descriptor_files(&self) -> Result<Vec<PathBuf>, AdapterError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .ends_with(DESCRIPTOR_SUFFIX)
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Parse and convert one descriptor file.
    #[instrument(skip(self), fields(file = %path.display()))]
    pub fn load_file(&self, path: &Path) -> Result<Vec<TypeDescriptor>, AdapterError> {
        let raw = fs::read_to_string(path).map_err(|source| AdapterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: DescriptorManifest =
            toml::from_str(&raw).map_err(|source| AdapterError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        manifest
            .types
            .into_iter()
            .map(|entry| {
                entry
                    .into_descriptor()
                    .map_err(|reason| AdapterError::InvalidDescriptor {
                        path: path.to_path_buf(),
                        reason,
                    })
            })
            .collect()
    }
}

impl DescriptorSource for DescriptorLoader {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    /// Individual files that are missing, malformed or describe an invalid
    /// type are **skipped with a `WARN` log** unless the loader is strict.
    #[instrument(skip(self), fields(dir = %self.root.display()))]
    fn load(&self) -> MetaModelResult<Vec<TypeDescriptor>> {
        if !self.root.is_dir() {
            return Err(AdapterError::Io {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "descriptor directory not found",
                ),
            }
            .into_descriptor_error(self.name()));
        }

        let files = self
            .descriptor_files()
            .map_err(|e| e.into_descriptor_error(self.name()))?;

        let mut types = Vec::new();
        for path in &files {
            match self.load_file(path) {
                Ok(loaded) => {
                    debug!(file = %path.display(), count = loaded.len(), "loaded descriptors");
                    types.extend(loaded);
                }
                Err(e) if self.strict => return Err(e.into_descriptor_error(self.name())),
                Err(e) => {
                    // One bad file must not block all others.
                    warn!(
                        file  = %path.display(),
                        error = %e,
                        "skipping descriptor file due to load error"
                    );
                }
            }
        }

        debug!(files = files.len(), count = types.len(), "finished loading descriptors");
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CUSTOMER: &str = r#"
[[types]]
name = "Customer"
extends = "Party"
annotations = [{ name = "DomainObject", attributes = { nature = "entity" } }]

[[types.constructors]]
params = []

[[types.methods]]
name = "getName"
returns = "String"

[[types.methods]]
name = "placeOrder"
returns = "Order"
params = ["Product", { type = "int", annotations = [{ name = "Named", attributes = { value = "Quantity" } }] }]

[[types]]
name = "Party"
abstract = true
"#;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn loads_types_with_members() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "customers.types.toml", CUSTOMER);

        let types = DescriptorLoader::new(tmp.path()).load().unwrap();
        assert_eq!(types.len(), 2);

        let customer = &types[0];
        assert_eq!(customer.supertype, Some(TypeName::new("Party")));
        assert_eq!(
            customer
                .annotation("DomainObject")
                .and_then(|a| a.attribute("nature")),
            Some("entity")
        );
        let place_order = customer.method_named("placeOrder").unwrap();
        assert_eq!(place_order.param_count(), 2);
        assert_eq!(place_order.declaring_type, TypeName::new("Customer"));
        assert!(place_order.parameter_annotation(1, "Named").is_some());
        assert!(place_order.parameter_annotation(0, "Named").is_none());
        assert!(types[1].is_abstract);
    }

    #[test]
    fn walks_subdirectories_and_ignores_other_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        write(&tmp.path().join("nested"), "a.types.toml", "[[types]]\nname = \"A\"\n");
        write(tmp.path(), "A.layout.toml", "named = \"Ignored\"\n");

        let types = DescriptorLoader::new(tmp.path()).load().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, TypeName::new("A"));
    }

    #[test]
    fn malformed_file_is_skipped_unless_strict() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.types.toml", "[[types]]\nname = \"Good\"\n");
        write(tmp.path(), "bad.types.toml", "[[types]\nname = ");

        let types = DescriptorLoader::new(tmp.path()).load().unwrap();
        assert_eq!(types.len(), 1);

        let err = DescriptorLoader::new(tmp.path())
            .strict(true)
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("bad.types.toml"));
    }

    #[test]
    fn duplicate_method_signature_is_invalid() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "dup.types.toml",
            "[[types]]\nname = \"Dup\"\n[[types.methods]]\nname = \"foo\"\n[[types.methods]]\nname = \"foo\"\n",
        );
        let err = DescriptorLoader::new(tmp.path())
            .strict(true)
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("invalid descriptor"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = DescriptorLoader::new(tmp.path().join("nope"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
