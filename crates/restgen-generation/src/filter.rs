//! Tag-based selection and ordering of type declarations

use std::cmp::Ordering;

use tracing::debug;

use crate::error::GenerationError;
use crate::models::{SourcePackage, TypeDeclaration};
use crate::naming::private_name;
use crate::tags::{parse_tags, AnnotationTagSet, TagError, Verb};

/// Verbs a type must support to get REST scaffolding by default
pub const DEFAULT_REQUIRED_VERBS: [Verb; 2] = [Verb::List, Verb::Get];

/// Selects the generate-enabled types of a source package and orders them
#[derive(Debug, Clone)]
pub struct TagFilter {
    required_verbs: Vec<Verb>,
}

impl TagFilter {
    /// Create a filter requiring `list` and `get`
    pub fn new() -> Self {
        Self {
            required_verbs: DEFAULT_REQUIRED_VERBS.to_vec(),
        }
    }

    /// Replace the required verb set
    pub fn with_required_verbs(mut self, verbs: Vec<Verb>) -> Self {
        self.required_verbs = verbs;
        self
    }

    /// Verbs every selected type must support
    pub fn required_verbs(&self) -> &[Verb] {
        &self.required_verbs
    }

    /// Parse a declaration's tags.
    ///
    /// `Ok(None)` means the type carries no directive at all; a malformed
    /// directive is fatal.
    pub fn tags_for(
        &self,
        declaration: &TypeDeclaration,
    ) -> Result<Option<AnnotationTagSet>, GenerationError> {
        match parse_tags(declaration.annotation_lines().as_slice()) {
            Ok(tags) => Ok(Some(tags)),
            Err(TagError::NoDirective) => Ok(None),
            Err(source) => Err(GenerationError::Annotation {
                type_name: declaration.name.qualified(),
                source,
            }),
        }
    }

    /// Types of `package` that should be generated, in deterministic order.
    ///
    /// Every declaration is parsed before any is selected, so a malformed
    /// directive anywhere in the package aborts selection. An empty result
    /// is a normal outcome.
    pub fn select<'a>(
        &self,
        package: &'a SourcePackage,
    ) -> Result<Vec<&'a TypeDeclaration>, GenerationError> {
        let mut parsed = Vec::with_capacity(package.types.len());
        for declaration in &package.types {
            parsed.push((declaration, self.tags_for(declaration)?));
        }

        let selected = parsed
            .into_iter()
            .filter_map(|(declaration, tags)| {
                let tags = tags?;
                if tags.generate && tags.satisfies(&self.required_verbs) {
                    Some(declaration)
                } else {
                    debug!(type_name = %declaration.name, "skipping type without required tags");
                    None
                }
            })
            .collect();

        Ok(order_types(selected))
    }

    /// Whether any type in `package` has the generate flag set, regardless of
    /// verbs
    pub fn any_generate_enabled(&self, package: &SourcePackage) -> Result<bool, GenerationError> {
        for declaration in &package.types {
            if self.tags_for(declaration)?.is_some_and(|t| t.generate) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort by private name, then by qualified name so the order stays total
pub fn order_types(mut types: Vec<&TypeDeclaration>) -> Vec<&TypeDeclaration> {
    types.sort_by(|a, b| compare_types(a, b));
    types
}

/// Ordering used by [`order_types`]: private name, then qualified name
pub fn compare_types(a: &TypeDeclaration, b: &TypeDeclaration) -> Ordering {
    private_name(a.base_name())
        .cmp(&private_name(b.base_name()))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeName;

    fn decl(name: &str, lines: &[&str]) -> TypeDeclaration {
        TypeDeclaration::new(TypeName::new("", name)).with_comment_lines(lines.iter().copied())
    }

    fn names(types: &[&TypeDeclaration]) -> Vec<String> {
        types.iter().map(|t| t.base_name().to_string()).collect()
    }

    #[test]
    fn test_select_and_order() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("Secret", &["+genclient"]))
            .with_type(decl("Namespace", &["+genclient"]))
            .with_type(decl("KubernetesCluster", &["+genclient"]))
            .with_type(decl("Plain", &["just a comment"]));
        let filter = TagFilter::new();
        let selected = filter.select(&pkg).unwrap();
        assert_eq!(names(&selected), vec!["KubernetesCluster", "Namespace", "Secret"]);
    }

    #[test]
    fn test_missing_required_verb_skipped() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("Secret", &["+genclient", "+genclient:skipVerbs=get"]))
            .with_type(decl("Namespace", &["+genclient=false"]));
        assert!(TagFilter::new().select(&pkg).unwrap().is_empty());
    }

    #[test]
    fn test_custom_required_verbs() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("Secret", &["+genclient", "+genclient:onlyVerbs=create"]));
        let filter = TagFilter::new().with_required_verbs(vec![Verb::Create]);
        assert_eq!(filter.select(&pkg).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_aborts_whole_package() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("Good", &["+genclient"]))
            .with_type(decl("Bad", &["+genclient=yes please"]));
        let err = TagFilter::new().select(&pkg).unwrap_err();
        assert!(matches!(err, GenerationError::Annotation { .. }));
        assert!(err.to_string().contains("p/v1.Bad"));
    }

    #[test]
    fn test_case_only_difference_orders_by_private_name() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("beta", &["+genclient"]))
            .with_type(decl("Alpha", &["+genclient"]));
        let selected = TagFilter::new().select(&pkg).unwrap();
        assert_eq!(names(&selected), vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_any_generate_enabled_ignores_verbs() {
        let pkg = SourcePackage::new("p/v1")
            .with_type(decl("Secret", &["+genclient", "+genclient:noVerbs"]));
        assert!(TagFilter::new().any_generate_enabled(&pkg).unwrap());
        assert!(TagFilter::new().select(&pkg).unwrap().is_empty());
    }
}
