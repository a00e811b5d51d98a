//! Type-universe manifest loading
//!
//! A manifest is a YAML or JSON description of the source packages the
//! generator consumes. It stands in for a language front end: whatever parses
//! the real declarations only has to dump them in this shape.
//!
//! ```yaml
//! packages:
//!   - path: github.com/acme/apis/ecs/v1
//!     comments: ["+groupName=ecs.acme.io"]
//!     types:
//!       - name: KubernetesCluster
//!         second_closest_comment_lines: ["+genclient"]
//!         members:
//!           - name: ObjectMeta
//!             type: k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta
//!             tags: 'json:"metadata,omitempty"'
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::GenerationError;
use crate::models::{Member, SourcePackage, TypeDeclaration, TypeName, TypeUniverse};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    packages: Vec<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    path: String,
    #[serde(default)]
    comments: Vec<String>,
    #[serde(default)]
    types: Vec<ManifestType>,
}

#[derive(Debug, Deserialize)]
struct ManifestType {
    name: String,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    comment_lines: Vec<String>,
    #[serde(default)]
    second_closest_comment_lines: Vec<String>,
}

/// Manifest encodings understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ManifestFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loads [`TypeUniverse`] values from manifest files
pub struct UniverseLoader;

impl UniverseLoader {
    /// Load and merge several manifests, in the order given
    pub fn load_all(paths: &[PathBuf]) -> Result<TypeUniverse, GenerationError> {
        let mut universe = TypeUniverse::new();
        for path in paths {
            for package in Self::load(path)?.packages() {
                universe.add_package(package.clone());
            }
        }
        Ok(universe)
    }

    /// Load one manifest file
    pub fn load(path: &Path) -> Result<TypeUniverse, GenerationError> {
        let format = ManifestFormat::from_path(path).ok_or_else(|| GenerationError::Manifest {
            path: path.display().to_string(),
            message: "unsupported manifest extension (expected .yaml, .yml or .json)".to_string(),
        })?;

        let content = fs::read_to_string(path).map_err(|e| GenerationError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), ?format, "loading type manifest");
        Self::parse(&content, format).map_err(|e| match e {
            GenerationError::Manifest { message, .. } => GenerationError::Manifest {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse manifest text in the given format
    pub fn parse(content: &str, format: ManifestFormat) -> Result<TypeUniverse, GenerationError> {
        let manifest: Manifest = match format {
            ManifestFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| manifest_error(e.to_string()))?
            }
            ManifestFormat::Json => {
                serde_json::from_str(content).map_err(|e| manifest_error(e.to_string()))?
            }
        };

        let mut universe = TypeUniverse::new();
        for package in manifest.packages {
            if package.path.trim().is_empty() {
                return Err(manifest_error("package path cannot be empty".to_string()));
            }
            let mut source = SourcePackage::new(package.path).with_comments(package.comments);
            for ty in package.types {
                if ty.name.trim().is_empty() {
                    return Err(manifest_error(format!(
                        "type with empty name in package {}",
                        source.path
                    )));
                }
                let mut declaration = TypeDeclaration::new(TypeName::new("", ty.name))
                    .with_comment_lines(ty.comment_lines)
                    .with_second_closest_comment_lines(ty.second_closest_comment_lines);
                declaration.members = ty.members;
                source = source.with_type(declaration);
            }
            universe.add_package(source);
        }
        Ok(universe)
    }
}

fn manifest_error(message: String) -> GenerationError {
    GenerationError::Manifest {
        path: "<inline>".to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
packages:
  - path: github.com/acme/apis/ecs/v1
    comments: ["+groupName=ecs.acme.io"]
    types:
      - name: KubernetesCluster
        second_closest_comment_lines: ["+genclient"]
        members:
          - name: ObjectMeta
            type: k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta
            tags: 'json:"metadata,omitempty"'
"#;

    #[test]
    fn test_parse_yaml_manifest() {
        let universe = UniverseLoader::parse(YAML, ManifestFormat::Yaml).unwrap();
        let pkg = universe.package("github.com/acme/apis/ecs/v1").unwrap();
        assert_eq!(pkg.comments, vec!["+groupName=ecs.acme.io"]);
        let ty = &pkg.types[0];
        assert_eq!(ty.name.qualified(), "github.com/acme/apis/ecs/v1.KubernetesCluster");
        let meta = ty.member("ObjectMeta").unwrap();
        assert_eq!(meta.type_name.name, "ObjectMeta");
        assert!(meta.tags.contains("json"));
    }

    #[test]
    fn test_parse_json_manifest() {
        let json = r#"{"packages":[{"path":"p/v1","types":[{"name":"Secret"}]}]}"#;
        let universe = UniverseLoader::parse(json, ManifestFormat::Json).unwrap();
        assert_eq!(universe.packages()[0].types[0].base_name(), "Secret");
    }

    #[test]
    fn test_empty_package_path_rejected() {
        let json = r#"{"packages":[{"path":"  "}]}"#;
        assert!(UniverseLoader::parse(json, ManifestFormat::Json).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ManifestFormat::from_path(Path::new("a.yml")), Some(ManifestFormat::Yaml));
        assert_eq!(ManifestFormat::from_path(Path::new("a.JSON")), Some(ManifestFormat::Json));
        assert_eq!(ManifestFormat::from_path(Path::new("a.toml")), None);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.yaml");
        fs::write(&path, YAML).unwrap();
        let universe = UniverseLoader::load_all(&[path]).unwrap();
        assert_eq!(universe.packages().len(), 1);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = UniverseLoader::load(Path::new("/nonexistent/types.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/types.yaml"));
    }
}
