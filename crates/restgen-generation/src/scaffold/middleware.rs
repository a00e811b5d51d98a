//! Middleware package

use crate::package::{Package, PackageKind};
use crate::scaffold::{ScaffoldContext, CONTROLLER_DIR, MIDDLEWARE_DIR};
use crate::templates::Snippet;

const AUTHENTICATE: &str = r#"
// Authenticate rejects requests whose bearer token differs from the configured token.
func Authenticate(next http.Handler) http.HandlerFunc {
	return func(w http.ResponseWriter, r *http.Request) {
		parts := strings.SplitN(r.Header.Get("Authorization"), " ", 2)
		if len(parts) == 2 && parts[0] == "Bearer" && parts[1] == viper.GetString("token") {
			next.ServeHTTP(w, r)
			return
		}
		controller.Unauthorized(w, r, fmt.Errorf("authenticate failed, please check your token"))
	}
}
"#;

/// The `server/middleware` package with the bearer-token middleware
pub fn package_for_middleware(ctx: &ScaffoldContext) -> Package {
    let path = ctx.package_path(MIDDLEWARE_DIR);

    let auth = ctx
        .meta_generator(&path, "auth")
        .with_imports([
            "fmt",
            "net/http",
            "strings",
            "github.com/spf13/viper",
            ctx.package_path(CONTROLLER_DIR).as_str(),
        ])
        .with_externs(["fmt", "http", "strings", "viper", "controller"])
        .with_snippet(
            Snippet::new("authenticate", AUTHENTICATE)
                .introduces(["Authenticate"])
                .uses(["http", "strings", "viper", "controller", "fmt"]),
        );

    Package::new(PackageKind::Middleware, "middleware", path, &ctx.header)
        .with_documentation("// Package middleware has the generated authentication middleware.\n")
        .with_generator(auth)
}
