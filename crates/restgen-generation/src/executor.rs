//! Plan execution and file assembly
//!
//! [`execute_plan`] drives every generator over the selected types of its
//! source package, exactly as a file-emitting driver would: the filter is
//! consulted once per type in order, and the generator runs each time it
//! fires. Rendering completes for the whole plan before anything is written.

use std::path::PathBuf;

use tracing::debug;

use crate::error::GenerationError;
use crate::generator::EmissionLedger;
use crate::naming::imports::merge_import_lines;
use crate::package::DOC_FILE_STEM;
use crate::planner::Plan;
use crate::templates::TemplateEngine;

/// Extension of generated files
pub const FILE_EXTENSION: &str = "go";

/// One fully rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Package clause name
    pub package_name: String,
    /// Package import path
    pub package_path: String,
    /// File name without extension
    pub file_stem: String,
    /// Header bytes
    pub header: Vec<u8>,
    /// Package documentation (doc files only)
    pub documentation: Option<String>,
    /// Sorted, deduplicated import lines
    pub imports: Vec<String>,
    /// Concatenated generator output
    pub body: String,
}

impl RenderedFile {
    /// File bytes: header, documentation, package clause, imports, body
    pub fn assemble(&self) -> Vec<u8> {
        let mut out = self.header.clone();
        if !out.is_empty() {
            if !out.ends_with(b"\n") {
                out.push(b'\n');
            }
            out.push(b'\n');
        }

        let mut text = String::new();
        if let Some(documentation) = &self.documentation {
            text.push_str(documentation);
            if !documentation.ends_with('\n') {
                text.push('\n');
            }
        }
        text.push_str(&format!("package {}\n", self.package_name));

        if !self.imports.is_empty() {
            text.push_str("\nimport (\n");
            for line in &self.imports {
                text.push('\t');
                text.push_str(line);
                text.push('\n');
            }
            text.push_str(")\n");
        }
        text.push_str(&self.body);

        out.extend_from_slice(text.as_bytes());
        out
    }

    /// Location under the output base: the package path relative to
    /// `output_package`, then `<stem>.go`
    pub fn relative_path(&self, output_package: &str) -> PathBuf {
        let relative = self
            .package_path
            .strip_prefix(output_package)
            .unwrap_or(&self.package_path)
            .trim_start_matches('/');
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<PathBuf>()
            .join(format!("{}.{}", self.file_stem, FILE_EXTENSION))
    }
}

/// Render every file of `plan`
///
/// Uses a fresh [`EmissionLedger`], so executing the same plan twice yields
/// identical files. The first template failure aborts the whole run.
pub fn execute_plan(plan: &Plan, engine: &TemplateEngine) -> Result<Vec<RenderedFile>, GenerationError> {
    let mut ledger = EmissionLedger::new();
    let mut files = Vec::new();

    for package in &plan.packages {
        if let Some(documentation) = &package.documentation {
            files.push(RenderedFile {
                package_name: package.name.clone(),
                package_path: package.path.clone(),
                file_stem: DOC_FILE_STEM.to_string(),
                header: package.header.clone(),
                documentation: Some(documentation.clone()),
                imports: Vec::new(),
                body: String::new(),
            });
        }

        for generator in &package.generators {
            let mut body = String::new();
            let mut imports = Vec::new();
            for declaration in &plan.types {
                if !generator.filter(declaration, &mut ledger) {
                    continue;
                }
                let section = generator.generate_type(declaration, engine).map_err(|source| {
                    GenerationError::Template {
                        generator: generator.id().to_string(),
                        source,
                    }
                })?;
                ledger.record_emission(generator.id())?;
                body.push_str(&section.body);
                imports.extend(section.imports);
            }

            debug!(generator = %generator.id(), bytes = body.len(), "rendered file");
            files.push(RenderedFile {
                package_name: package.name.clone(),
                package_path: package.path.clone(),
                file_stem: generator.file_stem().to_string(),
                header: package.header.clone(),
                documentation: None,
                imports: merge_import_lines(imports.iter().map(String::as_str)),
                body,
            });
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, SourcePackage, TypeDeclaration, TypeName, TypeUniverse};
    use crate::planner::{PackagePlanner, PlannerConfig};

    const API: &str = "github.com/acme/apis/ecs/v1";
    const OUT: &str = "github.com/acme/app";

    fn annotated(name: &str) -> TypeDeclaration {
        TypeDeclaration::new(TypeName::new(API, name))
            .with_member(
                Member::new("ObjectMeta", TypeName::new("k8s.io/apimachinery/pkg/apis/meta/v1", "ObjectMeta"))
                    .with_tags("json:\"metadata\""),
            )
            .with_comment_lines(["+genclient"])
    }

    fn plan(types: &[&str]) -> Plan {
        let package = types
            .iter()
            .fold(SourcePackage::new(API), |p, t| p.with_type(annotated(t)));
        PackagePlanner::new(PlannerConfig::new(OUT).with_header(b"// Copyright Acme.\n".to_vec()))
            .unwrap()
            .plan(&TypeUniverse::new().with_package(package))
            .unwrap()
    }

    fn paths(files: &[RenderedFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative_path(OUT).to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_emitted_file_set() {
        let files = execute_plan(&plan(&["Secret", "Namespace"]), &TemplateEngine::new()).unwrap();
        assert_eq!(
            paths(&files),
            vec![
                "server/controller/doc.go",
                "server/controller/controller.go",
                "server/controller/utils.go",
                "server/service/doc.go",
                "server/service/interface.go",
                "server/middleware/doc.go",
                "server/middleware/auth.go",
                "server/controller/namespace/doc.go",
                "server/controller/namespace/namespace.go",
                "server/service/namespace.go",
                "server/controller/secret/doc.go",
                "server/controller/secret/secret.go",
                "server/service/secret.go",
                "server/doc.go",
                "server/server.go",
            ]
        );
    }

    #[test]
    fn test_meta_generators_emit_once() {
        let files = execute_plan(&plan(&["Secret", "Namespace"]), &TemplateEngine::new()).unwrap();
        let controller = files.iter().find(|f| f.file_stem == "controller").unwrap();
        assert_eq!(controller.body.matches("type Options struct").count(), 1);
        let interface = files.iter().find(|f| f.file_stem == "interface").unwrap();
        assert_eq!(interface.body.matches("type Interface interface").count(), 1);
        assert_eq!(interface.body.matches("CreateSecret(").count(), 1);
    }

    #[test]
    fn test_two_sources_render_one_server() {
        let core = "github.com/acme/apis/core/v1";
        let secret = TypeDeclaration::new(TypeName::new(core, "Secret"))
            .with_member(
                Member::new("ObjectMeta", TypeName::new("k8s.io/apimachinery/pkg/apis/meta/v1", "ObjectMeta"))
                    .with_tags("json:\"metadata\""),
            )
            .with_comment_lines(["+genclient"]);
        let universe = TypeUniverse::new()
            .with_package(SourcePackage::new(API).with_type(annotated("KubernetesCluster")))
            .with_package(SourcePackage::new(core).with_type(secret));
        let plan = PackagePlanner::new(PlannerConfig::new(OUT)).unwrap().plan(&universe).unwrap();

        let files = execute_plan(&plan, &TemplateEngine::new()).unwrap();

        let servers: Vec<&RenderedFile> = files.iter().filter(|f| f.file_stem == "server").collect();
        assert_eq!(servers.len(), 1);
        assert!(servers[0].body.contains("kubernetesclusterctrl.New("));
        assert!(servers[0].body.contains("secretctrl.New("));

        let interface = files.iter().find(|f| f.file_stem == "interface").unwrap();
        assert_eq!(interface.body.matches("type Interface interface").count(), 1);
        assert!(interface.body.contains("CreateKubernetesCluster("));
        assert!(interface.body.contains("CreateSecret("));

        let secret_ctrl = files
            .iter()
            .find(|f| f.package_path.ends_with("controller/secret") && f.file_stem == "secret")
            .unwrap();
        assert!(secret_ctrl.body.contains("core/v1 Secret routes"));
    }

    #[test]
    fn test_execution_is_idempotent() {
        let plan = plan(&["Secret", "Namespace", "KubernetesCluster"]);
        let engine = TemplateEngine::new();
        let first = execute_plan(&plan, &engine).unwrap();
        let second = execute_plan(&plan, &engine).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assemble_layout() {
        let file = RenderedFile {
            package_name: "secret".to_string(),
            package_path: format!("{}/server/controller/secret", OUT),
            file_stem: "secret".to_string(),
            header: b"// Copyright Acme.".to_vec(),
            documentation: None,
            imports: vec!["\"net/http\"".to_string()],
            body: "\nfunc x() {}\n".to_string(),
        };
        let text = String::from_utf8(file.assemble()).unwrap();
        assert_eq!(
            text,
            "// Copyright Acme.\n\npackage secret\n\nimport (\n\t\"net/http\"\n)\n\nfunc x() {}\n"
        );
    }

    #[test]
    fn test_doc_file_layout() {
        let files = execute_plan(&plan(&["Secret"]), &TemplateEngine::new()).unwrap();
        let doc = &files[0];
        let text = String::from_utf8(doc.assemble()).unwrap();
        assert_eq!(
            text,
            "// Copyright Acme.\n\n// Package controller has the generated controller options and response helpers.\npackage controller\n"
        );
    }
}
