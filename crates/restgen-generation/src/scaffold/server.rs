//! Server bootstrap package

use crate::models::TypeDeclaration;
use crate::naming::lowercase_singular;
use crate::package::{Package, PackageKind};
use crate::scaffold::{
    join_import_path, ScaffoldContext, CONTROLLER_DIR, MIDDLEWARE_DIR, SERVER_DIR, SERVICE_DIR,
};
use crate::templates::Snippet;

/// Suffix of the alias each per-type controller package is imported under
pub const CONTROLLER_ALIAS_SUFFIX: &str = "ctrl";

const SERVER_INTERFACE: &str = r#"
// Server serves the generated REST API.
type Server interface {
	http.Handler
	ListenAndServe() error
}
"#;

const OPTIONS_STRUCT: &str = r#"
// Options contains the config required by the server.
type Options struct {
	CtrlOptions *ctrl.Options
	ListenAddr  string
}
"#;

const SERVER_STRUCT: &str = r#"
// server implements the Server interface.
type server struct {
	opt    Options
	router *mux.Router
}
"#;

const NEW_SERVER: &str = r#"
// New creates a server with the routes of every controller registered.
func New(opt Options) Server {
	options := &service.Options{
		KubeClientset: opt.CtrlOptions.KubeClientset,
	}
	opt.CtrlOptions.Service = service.New(options)

	router := mux.NewRouter().StrictSlash(true)
$range types$	$.|lowercaseSingular$ctrl.New(opt.CtrlOptions).Register(router)
$end$
	return &server{
		opt:    opt,
		router: router,
	}
}
"#;

const SERVE_HTTP: &str = r#"
// ServeHTTP authenticates the request, then dispatches it to the matched route.
func (s *server) ServeHTTP(w http.ResponseWriter, r *http.Request) {
	middleware.Authenticate(s.router).ServeHTTP(w, r)
}
"#;

const LISTEN_AND_SERVE: &str = r#"
// ListenAndServe starts the HTTP server.
func (s *server) ListenAndServe() error {
	server := &http.Server{
		Handler:        s,
		Addr:           s.opt.ListenAddr,
		WriteTimeout:   15 * time.Second,
		ReadTimeout:    15 * time.Second,
		MaxHeaderBytes: 1 << 20,
	}
	return server.ListenAndServe()
}
"#;

/// Alias a per-type controller package is imported under
pub fn controller_alias(declaration: &TypeDeclaration) -> String {
    format!(
        "{}{}",
        lowercase_singular(declaration.base_name()),
        CONTROLLER_ALIAS_SUFFIX
    )
}

/// Import line binding a per-type controller package under its alias
pub fn controller_import(ctx: &ScaffoldContext, declaration: &TypeDeclaration) -> String {
    let name = lowercase_singular(declaration.base_name());
    format!(
        "{} \"{}\"",
        controller_alias(declaration),
        join_import_path(&ctx.package_path(CONTROLLER_DIR), &name)
    )
}

/// The `server` package, registering every type's routes in the given order
pub fn package_for_server(ctx: &ScaffoldContext, types: &[TypeDeclaration]) -> Package {
    let path = ctx.package_path(SERVER_DIR);

    let mut imports = vec![
        "net/http".to_string(),
        "time".to_string(),
        "github.com/gorilla/mux".to_string(),
        ctx.package_path(SERVICE_DIR),
        ctx.package_path(MIDDLEWARE_DIR),
        format!("ctrl \"{}\"", ctx.package_path(CONTROLLER_DIR)),
    ];
    imports.extend(types.iter().map(|t| controller_import(ctx, t)));
    let controllers: Vec<String> = types.iter().map(controller_alias).collect();

    let generator = ctx
        .meta_generator(&path, "server")
        .with_var("types", types.to_vec())
        .with_imports(imports)
        .with_externs(["http", "time", "mux", "service", "middleware", "ctrl"])
        .with_externs(controllers.iter().cloned())
        .with_snippet(
            Snippet::new("server-interface", SERVER_INTERFACE)
                .introduces(["Server"])
                .uses(["http"]),
        )
        .with_snippet(
            Snippet::new("options", OPTIONS_STRUCT)
                .introduces(["Options"])
                .uses(["ctrl"]),
        )
        .with_snippet(
            Snippet::new("server-struct", SERVER_STRUCT)
                .introduces(["server"])
                .uses(["Options", "mux"]),
        )
        .with_snippet(
            Snippet::new("new", NEW_SERVER)
                .introduces(["New"])
                .uses(["Options", "Server", "server", "service", "mux"])
                .uses(controllers),
        )
        .with_snippet(
            Snippet::new("serve-http", SERVE_HTTP)
                .introduces(["ServeHTTP"])
                .uses(["server", "middleware", "http"]),
        )
        .with_snippet(
            Snippet::new("listen-and-serve", LISTEN_AND_SERVE)
                .introduces(["ListenAndServe"])
                .uses(["server", "http", "time"]),
        );

    Package::new(PackageKind::Server, "server", path, &ctx.header)
        .with_documentation("// Package server has the generated HTTP server.\n")
        .with_generator(generator)
}
