//! Output packages: a directory of generated files sharing one header

use std::fmt;

use crate::generator::Generator;

/// Stem of the documentation file every documented package carries
pub const DOC_FILE_STEM: &str = "doc";

/// Role of a package within the generated tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageKind {
    /// Shared controller options, interface and response helpers
    ControllerMeta,
    /// Service options, struct and the interface over all types
    ServiceInterface,
    /// Authentication middleware
    Middleware,
    /// Handlers and routes for one type
    TypeController,
    /// Service methods for one type
    TypeService,
    /// Server bootstrap registering every type's routes
    Server,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PackageKind::ControllerMeta => "controller-meta",
            PackageKind::ServiceInterface => "service-interface",
            PackageKind::Middleware => "middleware",
            PackageKind::TypeController => "type-controller",
            PackageKind::TypeService => "type-service",
            PackageKind::Server => "server",
        };
        f.write_str(s)
    }
}

/// A named, path-addressed bundle of generators
///
/// Built once per planning run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Package {
    /// Package clause name
    pub name: String,
    /// Import path
    pub path: String,
    /// Header prepended to every file
    pub header: Vec<u8>,
    /// Package documentation, emitted as its own `doc` file when present
    pub documentation: Option<String>,
    /// Role in the generated tree
    pub kind: PackageKind,
    /// Generators in emission order
    pub generators: Vec<Generator>,
}

impl Package {
    /// Create a package without documentation or generators
    pub fn new(
        kind: PackageKind,
        name: impl Into<String>,
        path: impl Into<String>,
        header: &[u8],
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            header: header.to_vec(),
            documentation: None,
            kind,
            generators: Vec::new(),
        }
    }

    /// Set the documentation string
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Append a generator
    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    /// Every file stem this package writes, the doc file first
    pub fn output_stems(&self) -> Vec<&str> {
        self.documentation
            .as_ref()
            .map(|_| DOC_FILE_STEM)
            .into_iter()
            .chain(self.generators.iter().map(Generator::file_stem))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stems_include_doc() {
        let package = Package::new(PackageKind::Middleware, "middleware", "a/server/middleware", b"")
            .with_documentation("// Package middleware.\n")
            .with_generator(Generator::meta("a/server/middleware", "auth"));
        assert_eq!(package.output_stems(), vec!["doc", "auth"]);
    }

    #[test]
    fn test_undocumented_package_has_no_doc_file() {
        let package = Package::new(PackageKind::TypeService, "service", "a/server/service", b"")
            .with_generator(Generator::meta("a/server/service", "secret"));
        assert_eq!(package.output_stems(), vec!["secret"]);
    }
}
