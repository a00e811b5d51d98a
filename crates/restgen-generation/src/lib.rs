#![warn(missing_docs)]

//! Generation pipeline for restgen
//!
//! Turns annotated type declarations into a REST server scaffold: tag-based
//! type selection, naming transforms, a small `$`-delimited template
//! language, generators grouped into packages, and the planner that orders
//! those packages so no file references a symbol before it exists.

pub mod error;
pub mod executor;
pub mod filter;
pub mod generator;
pub mod models;
pub mod naming;
pub mod package;
pub mod planner;
pub mod scaffold;
pub mod tags;
pub mod templates;
pub mod universe;
pub mod writer;

// Re-export public API
pub use error::GenerationError;
pub use executor::{execute_plan, RenderedFile};
pub use filter::{order_types, TagFilter, DEFAULT_REQUIRED_VERBS};
pub use generator::{EmissionLedger, GeneratedSection, Generator, GeneratorId, GeneratorKind};
pub use models::{Member, SourcePackage, TypeDeclaration, TypeName, TypeUniverse};
pub use naming::{
    lowercase_singular, plural, private_name, public_name, ImportTracker, NameForm, NameSystem,
};
pub use package::{Package, PackageKind, DOC_FILE_STEM};
pub use planner::{
    PackagePlanner, Plan, PlannerConfig, SourcePlan, DEFAULT_OBJECT_META_MEMBER,
};
pub use scaffold::ScaffoldContext;
pub use tags::{parse_tags, AnnotationTagSet, TagError, Verb};
pub use templates::{
    ParsedTemplate, Snippet, TemplateEngine, TemplateError, TemplateParser, Value, VariableMap,
};
pub use universe::{ManifestFormat, UniverseLoader};
pub use writer::{OutputWriter, WriteResult};
