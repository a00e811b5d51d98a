//! Naming transforms
//!
//! Derives identifiers, file names and route fragments from a type's base
//! name. Everything here is pure except [`NameSystem::name`] with
//! [`NameForm::Raw`], which records the import it needs in the system's
//! [`ImportTracker`].

pub mod imports;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use imports::{normalize_import_line, ImportTracker};

use crate::models::TypeName;
use crate::templates::TemplateError;

/// The naming forms a template may ask for with `key|form`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameForm {
    /// Capitalized first letter (`KubernetesCluster`)
    Public,
    /// Lowercased first letter (`kubernetesCluster`)
    Private,
    /// Public form, pluralized (`KubernetesClusters`)
    PublicPlural,
    /// Fully lowercased, pluralized (`kubernetesclusters`)
    AllLowercasePlural,
    /// Fully lowercased (`kubernetescluster`)
    LowercaseSingular,
    /// Qualified through the import tracker when foreign (`v1.KubernetesCluster`)
    Raw,
}

impl NameForm {
    /// Every form, in table order
    pub const ALL: [NameForm; 6] = [
        NameForm::Public,
        NameForm::Private,
        NameForm::PublicPlural,
        NameForm::AllLowercasePlural,
        NameForm::LowercaseSingular,
        NameForm::Raw,
    ];

    /// Tag used after `|` in templates
    pub fn tag(&self) -> &'static str {
        match self {
            NameForm::Public => "public",
            NameForm::Private => "private",
            NameForm::PublicPlural => "publicPlural",
            NameForm::AllLowercasePlural => "allLowercasePlural",
            NameForm::LowercaseSingular => "lowercaseSingular",
            NameForm::Raw => "raw",
        }
    }

    /// Look up a form by its template tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|form| form.tag() == tag)
    }

    /// Whether this form needs import tracking
    pub fn requires_imports(&self) -> bool {
        matches!(self, NameForm::Raw)
    }
}

impl fmt::Display for NameForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for NameForm {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| TemplateError::UnknownForm(s.trim().to_string()))
    }
}

/// Uppercase the first character
pub fn public_name(base: &str) -> String {
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character
pub fn private_name(base: &str) -> String {
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Naive English plural: append `s`
pub fn plural(name: &str) -> String {
    format!("{}s", name)
}

/// Lowercase the whole name
pub fn lowercase_singular(base: &str) -> String {
    base.to_lowercase()
}

/// Applies [`NameForm`]s for one output package
///
/// The local package decides whether a raw name needs qualifying; plural
/// exceptions let callers override the naive pluralization for irregular
/// names (keyed by the public singular).
#[derive(Debug, Clone)]
pub struct NameSystem {
    local_package: String,
    imports: ImportTracker,
    plural_exceptions: BTreeMap<String, String>,
}

impl NameSystem {
    /// Create a name system for code emitted into `local_package`
    pub fn new(local_package: impl Into<String>) -> Self {
        Self {
            local_package: local_package.into(),
            imports: ImportTracker::new(),
            plural_exceptions: BTreeMap::new(),
        }
    }

    /// Override pluralization for specific public names
    pub fn with_plural_exceptions(mut self, exceptions: BTreeMap<String, String>) -> Self {
        self.plural_exceptions = exceptions;
        self
    }

    /// Package the generated code lives in
    pub fn local_package(&self) -> &str {
        &self.local_package
    }

    /// Derive `form` of `name`
    pub fn name(&mut self, name: &TypeName, form: NameForm) -> String {
        match form {
            NameForm::Public => public_name(&name.name),
            NameForm::Private => private_name(&name.name),
            NameForm::PublicPlural => self.public_plural(&name.name),
            NameForm::AllLowercasePlural => self.public_plural(&name.name).to_lowercase(),
            NameForm::LowercaseSingular => lowercase_singular(&name.name),
            NameForm::Raw => self.raw(name),
        }
    }

    fn public_plural(&self, base: &str) -> String {
        let public = public_name(base);
        match self.plural_exceptions.get(&public) {
            Some(irregular) => irregular.clone(),
            None => plural(&public),
        }
    }

    fn raw(&mut self, name: &TypeName) -> String {
        if name.package.is_empty() || name.package == self.local_package {
            return name.name.clone();
        }
        let alias = self.imports.local_name_of(&name.package);
        format!("{}.{}", alias, name.name)
    }

    /// Imports accumulated by raw-name resolution
    pub fn imports(&self) -> &ImportTracker {
        &self.imports
    }
}
