//! Package constructors for the generated REST server tree
//!
//! Layout under the output package:
//!
//! ```text
//! server/                      server bootstrap
//! server/controller/           controller options and response helpers
//! server/controller/<type>/    handlers and routes for one type
//! server/service/              service interface plus one file per type
//! server/middleware/           authentication middleware
//! ```
//!
//! Construction is pure: every function here only needs the shared
//! [`ScaffoldContext`] and the type (or ordered types) it covers.

pub mod controller;
pub mod middleware;
pub mod server;
pub mod service;

use std::collections::BTreeMap;

pub use controller::{package_for_controller_meta, package_for_type_controller};
pub use middleware::package_for_middleware;
pub use server::package_for_server;
pub use service::{package_for_service_interface, package_for_type_service};

use crate::generator::Generator;
use crate::models::TypeName;
use crate::templates::VariableMap;

/// Server bootstrap package, relative to the output package
pub const SERVER_DIR: &str = "server";
/// Controller meta package
pub const CONTROLLER_DIR: &str = "server/controller";
/// Service package
pub const SERVICE_DIR: &str = "server/service";
/// Middleware package
pub const MIDDLEWARE_DIR: &str = "server/middleware";

/// Inputs shared by every package built for one source package
#[derive(Debug, Clone, Default)]
pub struct ScaffoldContext {
    /// Import path of the generated tree
    pub output_package: String,
    /// Header bytes prepended to every file
    pub header: Vec<u8>,
    /// Variables visible to every template (`group`, `version`, `objectMeta`)
    pub source_vars: VariableMap,
    /// Irregular plurals, keyed by public singular
    pub plural_exceptions: BTreeMap<String, String>,
}

impl ScaffoldContext {
    /// Create a context for `output_package`
    pub fn new(output_package: impl Into<String>, header: &[u8]) -> Self {
        Self {
            output_package: output_package.into(),
            header: header.to_vec(),
            source_vars: VariableMap::new(),
            plural_exceptions: BTreeMap::new(),
        }
    }

    /// Set the source-level template variables
    pub fn with_source_vars(mut self, vars: VariableMap) -> Self {
        self.source_vars = vars;
        self
    }

    /// Set irregular plurals
    pub fn with_plural_exceptions(mut self, exceptions: BTreeMap<String, String>) -> Self {
        self.plural_exceptions = exceptions;
        self
    }

    /// Import path of `relative` under the output package
    pub fn package_path(&self, relative: &str) -> String {
        join_import_path(&self.output_package, relative)
    }

    fn meta_generator(&self, package_path: &str, file_stem: &str) -> Generator {
        Generator::meta(package_path, file_stem)
            .with_vars(&self.source_vars)
            .with_plural_exceptions(self.plural_exceptions.clone())
    }

    fn per_type_generator(&self, package_path: &str, file_stem: &str, bound: &TypeName) -> Generator {
        Generator::per_type(package_path, file_stem, bound.clone())
            .with_vars(&self.source_vars)
            .with_plural_exceptions(self.plural_exceptions.clone())
            .bind_context_as("type")
    }
}

/// Join import path segments with a single `/`
pub fn join_import_path(base: &str, relative: &str) -> String {
    let base = base.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{}/{}", base, relative),
    }
}
