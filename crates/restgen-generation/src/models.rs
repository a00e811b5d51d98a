//! Type universe data model
//!
//! These are the declarations supplied by the type-loading collaborator. The
//! pipeline only ever reads them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualified identity of a type: origin package path plus base name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeName {
    /// Origin package path (empty for builtins such as `string`)
    pub package: String,
    /// Base name within the package
    pub name: String,
}

impl TypeName {
    /// Create a type name from a package path and a base name
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Parse a dotted qualified form such as `k8s.io/api/core/v1.Secret`
    ///
    /// The package is everything before the last `.` that follows the last
    /// `/`, so dots inside domain segments are kept in the package.
    pub fn parse(qualified: &str) -> Self {
        let qualified = qualified.trim();
        let tail_start = qualified.rfind('/').map(|i| i + 1).unwrap_or(0);
        match qualified[tail_start..].rfind('.') {
            Some(dot) => {
                let split = tail_start + dot;
                Self::new(&qualified[..split], &qualified[split + 1..])
            }
            None => Self::new("", qualified),
        }
    }

    /// Dotted qualified form (`package.Name`, or just `Name` for builtins)
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.qualified()
    }
}

/// A field of a type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Field name
    pub name: String,
    /// Qualified field type
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// Raw struct tag text (e.g. `json:"metadata,omitempty"`)
    #[serde(default)]
    pub tags: String,
}

impl Member {
    /// Create a member without struct tags
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            tags: String::new(),
        }
    }

    /// Attach raw struct tags
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

/// A type declaration with its members and attached comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// Qualified identity
    pub name: TypeName,
    /// Ordered member fields
    #[serde(default)]
    pub members: Vec<Member>,
    /// Comment lines attached directly to the declaration
    #[serde(default)]
    pub comment_lines: Vec<String>,
    /// Comment lines of the block preceding the direct comment
    #[serde(default)]
    pub second_closest_comment_lines: Vec<String>,
}

impl TypeDeclaration {
    /// Create a declaration with no members or comments
    pub fn new(name: TypeName) -> Self {
        Self {
            name,
            members: Vec::new(),
            comment_lines: Vec::new(),
            second_closest_comment_lines: Vec::new(),
        }
    }

    /// Append a member
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Set the directly attached comment lines
    pub fn with_comment_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set the second-closest comment lines
    pub fn with_second_closest_comment_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.second_closest_comment_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Base name of the type
    pub fn base_name(&self) -> &str {
        &self.name.name
    }

    /// Comment lines scanned for annotation tags.
    ///
    /// Second-closest lines come first so that directly attached tags win
    /// when the same key appears in both blocks.
    pub fn annotation_lines(&self) -> Vec<&str> {
        self.second_closest_comment_lines
            .iter()
            .chain(self.comment_lines.iter())
            .map(String::as_str)
            .collect()
    }

    /// Look up a member by name
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// One source package of the type universe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcePackage {
    /// Package import path
    pub path: String,
    /// Package-level comment lines (doc.go style)
    pub comments: Vec<String>,
    /// Declarations in loader order
    pub types: Vec<TypeDeclaration>,
}

impl SourcePackage {
    /// Create an empty source package
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            comments: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Add a declaration, qualifying it with this package's path
    pub fn with_type(mut self, mut declaration: TypeDeclaration) -> Self {
        declaration.name.package = self.path.clone();
        self.types.push(declaration);
        self
    }

    /// Set package-level comment lines
    pub fn with_comments<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = lines.into_iter().map(Into::into).collect();
        self
    }
}

/// The full set of source packages handed to the planner
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    packages: Vec<SourcePackage>,
}

impl TypeUniverse {
    /// Create an empty universe
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source package.
    ///
    /// A package path seen before is merged into the existing entry.
    pub fn add_package(&mut self, package: SourcePackage) {
        match self.packages.iter_mut().find(|p| p.path == package.path) {
            Some(existing) => {
                existing.comments.extend(package.comments);
                existing.types.extend(package.types);
            }
            None => self.packages.push(package),
        }
    }

    /// Builder form of [`TypeUniverse::add_package`]
    pub fn with_package(mut self, package: SourcePackage) -> Self {
        self.add_package(package);
        self
    }

    /// Source packages in insertion order
    pub fn packages(&self) -> &[SourcePackage] {
        &self.packages
    }

    /// Look up a package by path
    pub fn package(&self, path: &str) -> Option<&SourcePackage> {
        self.packages.iter().find(|p| p.path == path)
    }
}
