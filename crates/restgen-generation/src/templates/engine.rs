//! Template engine for rendering templates with variable substitution
//!
//! Resolution walks the parsed element tree. Types are rendered through a
//! [`NameSystem`], which is why the engine borrows one mutably: raw names
//! record the imports they need as a side effect.

use crate::models::TypeDeclaration;
use crate::naming::{NameForm, NameSystem};
use crate::templates::context::{Value, VariableMap};
use crate::templates::error::TemplateError;
use crate::templates::parser::{
    Expression, KeyRef, ParsedTemplate, TemplateElement, TemplateParser,
};

/// Template engine for rendering templates with variable substitution
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    parser: TemplateParser,
}

enum Resolved<'a> {
    Type(&'a TypeDeclaration),
    Types(&'a [TypeDeclaration]),
    Scalar(&'a str),
}

#[derive(Clone, Copy)]
struct Scope<'a> {
    vars: &'a VariableMap,
    current: Option<&'a TypeDeclaration>,
}

impl<'a> Scope<'a> {
    fn lookup(&self, key: &KeyRef) -> Result<Resolved<'a>, TemplateError> {
        match key {
            KeyRef::Current => self
                .current
                .map(Resolved::Type)
                .ok_or_else(|| TemplateError::UnboundKey(".".to_string())),
            KeyRef::Named(name) => match self.vars.get(name) {
                Some(Value::Type(t)) => Ok(Resolved::Type(t)),
                Some(Value::Types(ts)) => Ok(Resolved::Types(ts)),
                Some(Value::Scalar(s)) => Ok(Resolved::Scalar(s)),
                None => Err(TemplateError::UnboundKey(name.clone())),
            },
        }
    }
}

impl TemplateEngine {
    /// Create a new template engine using `$` delimiters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new template engine with a custom parser
    pub fn with_parser(parser: TemplateParser) -> Self {
        Self { parser }
    }

    /// Parse without rendering
    pub fn parse(&self, template: &str) -> Result<ParsedTemplate, TemplateError> {
        self.parser.parse(template)
    }

    /// Parse and render `template` against `vars`
    ///
    /// # Arguments
    /// * `template` - The template content to render
    /// * `vars` - Key bindings visible to the template
    /// * `names` - Name system of the package the output lands in
    ///
    /// # Returns
    /// Rendered text, or the first error encountered. Nothing is partially
    /// returned on failure.
    pub fn resolve(
        &self,
        template: &str,
        vars: &VariableMap,
        names: &mut NameSystem,
    ) -> Result<String, TemplateError> {
        let parsed = self.parse(template)?;
        self.render(&parsed, vars, names)
    }

    /// Render an already parsed template
    pub fn render(
        &self,
        parsed: &ParsedTemplate,
        vars: &VariableMap,
        names: &mut NameSystem,
    ) -> Result<String, TemplateError> {
        let mut out = String::new();
        let scope = Scope {
            vars,
            current: None,
        };
        render_elements(&parsed.elements, scope, names, &mut out)?;
        Ok(out)
    }
}

fn render_elements(
    elements: &[TemplateElement],
    scope: Scope<'_>,
    names: &mut NameSystem,
    out: &mut String,
) -> Result<(), TemplateError> {
    for element in elements {
        match element {
            TemplateElement::Text(text) => out.push_str(text),
            TemplateElement::Placeholder { expression, .. } => {
                out.push_str(&render_expression(expression, scope, names)?);
            }
            TemplateElement::Range { key, body, .. } => {
                let Resolved::Types(sequence) = scope.lookup(key)? else {
                    return Err(TemplateError::NotASequence(key.to_string()));
                };
                for item in sequence {
                    let inner = Scope {
                        vars: scope.vars,
                        current: Some(item),
                    };
                    render_elements(body, inner, names, out)?;
                }
            }
        }
    }
    Ok(())
}

fn render_expression(
    expression: &Expression,
    scope: Scope<'_>,
    names: &mut NameSystem,
) -> Result<String, TemplateError> {
    let resolved = scope.lookup(&expression.key)?;
    match (&expression.form, resolved) {
        (Some(tag), Resolved::Type(declaration)) => {
            let form: NameForm = tag.parse()?;
            Ok(names.name(&declaration.name, form))
        }
        (Some(tag), _) => {
            // Validate the tag first so a typo is reported as such
            tag.parse::<NameForm>()?;
            Err(TemplateError::NotAType(expression.key.to_string()))
        }
        (None, Resolved::Type(declaration)) => Ok(names.name(&declaration.name, NameForm::Public)),
        (None, Resolved::Scalar(value)) => Ok(value.to_string()),
        (None, Resolved::Types(_)) => Err(TemplateError::NotAScalar(expression.key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeName;

    const API: &str = "github.com/acme/apis/ecs/v1";

    fn decl(name: &str) -> TypeDeclaration {
        TypeDeclaration::new(TypeName::new(API, name))
    }

    fn names() -> NameSystem {
        NameSystem::new("github.com/acme/app/server/controller")
    }

    #[test]
    fn test_resolve_type_forms() {
        let vars = VariableMap::new().with("type", decl("KubernetesCluster"));
        let engine = TemplateEngine::new();
        let out = engine
            .resolve(
                "func New$.type|public$() $type|allLowercasePlural$ $type$",
                &vars,
                &mut names(),
            )
            .unwrap();
        assert_eq!(
            out,
            "func NewKubernetesCluster() kubernetesclusters KubernetesCluster"
        );
    }

    #[test]
    fn test_resolve_raw_records_import() {
        let vars = VariableMap::new().with("type", decl("Secret"));
        let mut names = names();
        let out = TemplateEngine::new()
            .resolve("obj *$.type|raw$", &vars, &mut names)
            .unwrap();
        assert_eq!(out, "obj *v1.Secret");
        assert_eq!(names.imports().import_lines(), vec!["\"github.com/acme/apis/ecs/v1\""]);
    }

    #[test]
    fn test_range_expands_in_order() {
        let vars = VariableMap::new().with("types", vec![decl("Namespace"), decl("Secret")]);
        let out = TemplateEngine::new()
            .resolve("$range .types$[$.|private$]$end$", &vars, &mut names())
            .unwrap();
        assert_eq!(out, "[namespace][secret]");
    }

    #[test]
    fn test_range_over_empty_sequence() {
        let vars = VariableMap::new().with("types", Vec::<TypeDeclaration>::new());
        let out = TemplateEngine::new()
            .resolve("a$range types$x$end$b", &vars, &mut names())
            .unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_nested_range_sees_outer_keys() {
        let vars = VariableMap::new()
            .with("outer", vec![decl("A"), decl("B")])
            .with("inner", vec![decl("X")])
            .with("sep", ";");
        let out = TemplateEngine::new()
            .resolve("$range outer$$range inner$$.$$sep$$end$$end$", &vars, &mut names())
            .unwrap();
        assert_eq!(out, "X;X;");
    }

    #[test]
    fn test_scalar_is_emitted_verbatim() {
        let vars = VariableMap::new().with("group", "ecs.acme.io");
        let out = TemplateEngine::new()
            .resolve("group: $group$", &vars, &mut names())
            .unwrap();
        assert_eq!(out, "group: ecs.acme.io");
    }

    #[test]
    fn test_unbound_key() {
        let err = TemplateEngine::new()
            .resolve("$missing|public$", &VariableMap::new(), &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::UnboundKey("missing".to_string()));
    }

    #[test]
    fn test_current_element_outside_range() {
        let err = TemplateEngine::new()
            .resolve("$.|public$", &VariableMap::new(), &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::UnboundKey(".".to_string()));
    }

    #[test]
    fn test_unknown_form() {
        let vars = VariableMap::new().with("type", decl("Secret"));
        let err = TemplateEngine::new()
            .resolve("$type|shouty$", &vars, &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::UnknownForm("shouty".to_string()));
    }

    #[test]
    fn test_form_on_scalar() {
        let vars = VariableMap::new().with("group", "ecs");
        let err = TemplateEngine::new()
            .resolve("$group|public$", &vars, &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::NotAType("group".to_string()));
    }

    #[test]
    fn test_sequence_in_placeholder() {
        let vars = VariableMap::new().with("types", vec![decl("Secret")]);
        let err = TemplateEngine::new()
            .resolve("$types$", &vars, &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::NotAScalar("types".to_string()));
    }

    #[test]
    fn test_range_over_non_sequence() {
        let vars = VariableMap::new().with("type", decl("Secret"));
        let err = TemplateEngine::new()
            .resolve("$range type$x$end$", &vars, &mut names())
            .unwrap_err();
        assert_eq!(err, TemplateError::NotASequence("type".to_string()));
    }
}
