//! Generators: the unit of file emission
//!
//! A [`Generator`] is immutable once built. Whether a meta generator has
//! already fired lives in an [`EmissionLedger`] owned by the run, so the same
//! plan can be executed any number of times.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::error::GenerationError;
use crate::models::{TypeDeclaration, TypeName};
use crate::naming::imports::merge_import_lines;
use crate::naming::NameSystem;
use crate::templates::{Snippet, TemplateEngine, TemplateError, Value, VariableMap};

/// Identity of a generator within a plan: output package path plus file stem
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId {
    /// Import path of the output package
    pub package_path: String,
    /// File name without extension
    pub file_stem: String,
}

impl GeneratorId {
    /// Create an identity
    pub fn new(package_path: impl Into<String>, file_stem: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            file_stem: file_stem.into(),
        }
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package_path, self.file_stem)
    }
}

/// How a generator decides which types it fires for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Fires once per run, for whichever type is offered first
    Meta,
    /// Fires only for the bound type
    PerType(TypeName),
}

/// Per-run emission state
///
/// Meta generators latch here the first time their filter is consulted. Every
/// emission is also recorded, and a second emission by the same generator in
/// one run is an error.
#[derive(Debug, Clone, Default)]
pub struct EmissionLedger {
    latched: BTreeSet<GeneratorId>,
    emitted: BTreeSet<GeneratorId>,
}

impl EmissionLedger {
    /// Create an empty ledger for a new run
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `id`; returns true only the first time
    pub fn latch(&mut self, id: &GeneratorId) -> bool {
        self.latched.insert(id.clone())
    }

    /// Whether `id` has latched in this run
    pub fn is_latched(&self, id: &GeneratorId) -> bool {
        self.latched.contains(id)
    }

    /// Record that `id` produced output
    pub fn record_emission(&mut self, id: &GeneratorId) -> Result<(), GenerationError> {
        if self.emitted.insert(id.clone()) {
            Ok(())
        } else {
            Err(GenerationError::DuplicateEmission(id.to_string()))
        }
    }

    /// Number of generators that have emitted
    pub fn emission_count(&self) -> usize {
        self.emitted.len()
    }
}

/// Output of one `generate_type` call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratedSection {
    /// Concatenated resolved snippets
    pub body: String,
    /// Sorted, deduplicated import lines (static plus raw-name imports)
    pub imports: Vec<String>,
}

/// Emits one file by resolving an ordered list of snippets
#[derive(Debug, Clone)]
pub struct Generator {
    id: GeneratorId,
    kind: GeneratorKind,
    imports: Vec<String>,
    snippets: Vec<Snippet>,
    vars: VariableMap,
    context_key: Option<String>,
    externs: BTreeSet<String>,
    plural_exceptions: BTreeMap<String, String>,
}

impl Generator {
    fn with_kind(id: GeneratorId, kind: GeneratorKind) -> Self {
        Self {
            id,
            kind,
            imports: Vec::new(),
            snippets: Vec::new(),
            vars: VariableMap::new(),
            context_key: None,
            externs: BTreeSet::new(),
            plural_exceptions: BTreeMap::new(),
        }
    }

    /// A generator that fires once per run
    pub fn meta(package_path: impl Into<String>, file_stem: impl Into<String>) -> Self {
        Self::with_kind(GeneratorId::new(package_path, file_stem), GeneratorKind::Meta)
    }

    /// A generator that fires only for `bound`
    pub fn per_type(
        package_path: impl Into<String>,
        file_stem: impl Into<String>,
        bound: TypeName,
    ) -> Self {
        Self::with_kind(
            GeneratorId::new(package_path, file_stem),
            GeneratorKind::PerType(bound),
        )
    }

    /// Add static import entries
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Append a snippet
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    /// Bind a template variable
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(key, value);
        self
    }

    /// Bind every variable of `vars`
    pub fn with_vars(mut self, vars: &VariableMap) -> Self {
        self.vars.extend(vars);
        self
    }

    /// Bind the type being generated under `key`
    pub fn bind_context_as(mut self, key: impl Into<String>) -> Self {
        self.context_key = Some(key.into());
        self
    }

    /// Declare symbols provided from outside the generator (imports, other
    /// files of the same package)
    pub fn with_externs<I, S>(mut self, externs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.externs.extend(externs.into_iter().map(Into::into));
        self
    }

    /// Override pluralization for raw name resolution
    pub fn with_plural_exceptions(mut self, exceptions: BTreeMap<String, String>) -> Self {
        self.plural_exceptions = exceptions;
        self
    }

    /// Generator identity
    pub fn id(&self) -> &GeneratorId {
        &self.id
    }

    /// File stem
    pub fn file_stem(&self) -> &str {
        &self.id.file_stem
    }

    /// Generator kind
    pub fn kind(&self) -> &GeneratorKind {
        &self.kind
    }

    /// Snippets in emission order
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Variables bound at construction
    pub fn vars(&self) -> &VariableMap {
        &self.vars
    }

    /// Whether this generator fires for `declaration`.
    ///
    /// Per-type generators compare against their bound type. Meta generators
    /// latch in `ledger` and return true only the first time.
    pub fn filter(&self, declaration: &TypeDeclaration, ledger: &mut EmissionLedger) -> bool {
        match &self.kind {
            GeneratorKind::PerType(bound) => declaration.name == *bound,
            GeneratorKind::Meta => ledger.latch(&self.id),
        }
    }

    /// Resolve every snippet for `declaration`, in order
    pub fn generate_type(
        &self,
        declaration: &TypeDeclaration,
        engine: &TemplateEngine,
    ) -> Result<GeneratedSection, TemplateError> {
        let mut vars = self.vars.clone();
        if let Some(key) = &self.context_key {
            vars.insert(key.clone(), declaration.clone());
        }

        let mut names = NameSystem::new(self.id.package_path.clone())
            .with_plural_exceptions(self.plural_exceptions.clone());
        let mut body = String::new();
        for snippet in &self.snippets {
            body.push_str(&engine.resolve(&snippet.body, &vars, &mut names)?);
        }

        let raw_imports = names.imports().import_lines();
        let imports = merge_import_lines(
            self.imports
                .iter()
                .map(String::as_str)
                .chain(raw_imports.iter().map(String::as_str)),
        );

        debug!(
            generator = %self.id,
            type_name = %declaration.name,
            snippets = self.snippets.len(),
            "generated section"
        );
        Ok(GeneratedSection { body, imports })
    }

    /// Verify every snippet only uses symbols introduced by itself, an
    /// earlier snippet, or the generator's externs
    pub fn check_template_order(&self) -> Result<(), TemplateError> {
        let mut introduced: BTreeSet<&str> = self.externs.iter().map(String::as_str).collect();
        for snippet in &self.snippets {
            introduced.extend(snippet.introduces.iter().map(String::as_str));
            if let Some(symbol) = snippet
                .uses
                .iter()
                .find(|symbol| !introduced.contains(symbol.as_str()))
            {
                return Err(TemplateError::TemplateOrder {
                    template: snippet.name.clone(),
                    symbol: symbol.clone(),
                });
            }
        }
        Ok(())
    }
}
