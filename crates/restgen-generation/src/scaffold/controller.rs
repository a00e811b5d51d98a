//! Controller packages: shared meta and one package per type

use crate::models::TypeDeclaration;
use crate::naming::{lowercase_singular, public_name};
use crate::package::{Package, PackageKind};
use crate::scaffold::{join_import_path, ScaffoldContext, CONTROLLER_DIR, SERVICE_DIR};
use crate::templates::Snippet;

const OPTIONS_STRUCT: &str = r#"
// Options contains the config used by every controller.
type Options struct {
	KubeClientset kubernetes.Interface
	Service       service.Interface
}
"#;

const CONTROLLER_INTERFACE: &str = r#"
// Controller registers its routes on a router.
type Controller interface {
	Register(router *mux.Router)
}
"#;

const RESPONSE_STRUCT: &str = r#"
type commResp struct {
	Code    string      `json:"code"`
	Message interface{} `json:"message"`
}
"#;

const RESPONSE_HELPERS: &str = r#"
// OK replies with 200 and message.
func OK(w http.ResponseWriter, r *http.Request, message string) {
	Response(w, r, http.StatusOK, message)
}

// ResourceNotFound replies with 404 and message.
func ResourceNotFound(w http.ResponseWriter, r *http.Request, message string) {
	Response(w, r, http.StatusNotFound, message)
}

// BadRequest replies with 400 and the error text.
func BadRequest(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusBadRequest, err.Error())
}

// Forbidden replies with 403 and the error text.
func Forbidden(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusForbidden, err.Error())
}

// Unauthorized replies with 401 and the error text.
func Unauthorized(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusUnauthorized, err.Error())
}

// InternalError replies with 500 and the error text.
func InternalError(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusInternalServerError, err.Error())
}

// ServiceUnavailable replies with 503 and the error text.
func ServiceUnavailable(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusServiceUnavailable, err.Error())
}

// Conflict replies with 409 and the error text.
func Conflict(w http.ResponseWriter, r *http.Request, err error) {
	Response(w, r, http.StatusConflict, err.Error())
}

// Response writes message as a JSON body with httpCode.
func Response(w http.ResponseWriter, r *http.Request, httpCode int, message interface{}) {
	resp := commResp{
		Code:    http.StatusText(httpCode),
		Message: message,
	}

	body, err := json.Marshal(resp)
	if err != nil {
		klog.Errorf("marshal [%v] failed with err [%v]", resp, err)
	}
	w.Header().Set("Pragma", "no-cache")
	w.Header().Set("Content-Type", "application/json")
	w.WriteHeader(httpCode)
	w.Write(body)
}
"#;

const TYPE_STRUCT: &str = r#"
// $.type|private$ implements the controller interface for $.type|publicPlural$.
type $.type|private$ struct {
	opt *controller.Options
}
"#;

const TYPE_NEW: &str = r#"
// New creates the $.type|public$ controller.
func New(opt *controller.Options) controller.Controller {
	return &$.type|private${opt: opt}
}
"#;

const CREATE_HANDLER: &str = r#"
// create$.type|public$ decodes a $.type|public$ from the body and creates it.
func (c *$.type|private$) create$.type|public$(w http.ResponseWriter, r *http.Request) {
	$.type|private$Obj := &$.type|raw${}
	if err := json.NewDecoder(r.Body).Decode($.type|private$Obj); err != nil {
		controller.BadRequest(w, r, err)
		return
	}

	if err := c.opt.Service.Create$.type|public$(r.Context(), $.type|private$Obj); err != nil {
		controller.BadRequest(w, r, err)
		return
	}
	controller.OK(w, r, "success")
}
"#;

const GET_HANDLER: &str = r#"
// get$.type|public$ returns the $.type|public$ named in the path.
func (c *$.type|private$) get$.type|public$(w http.ResponseWriter, r *http.Request) {
	name := mux.Vars(r)["name"]
	$.type|private$Obj, err := c.opt.Service.Get$.type|public$(r.Context(), name)
	if err != nil {
		controller.BadRequest(w, r, err)
		return
	}
	controller.Response(w, r, http.StatusOK, $.type|private$Obj)
}
"#;

const UPDATE_HANDLER: &str = r#"
// update$.type|public$ decodes a $.type|public$ from the body and updates it.
func (c *$.type|private$) update$.type|public$(w http.ResponseWriter, r *http.Request) {
	$.type|private$Obj := &$.type|raw${}
	if err := json.NewDecoder(r.Body).Decode($.type|private$Obj); err != nil {
		controller.BadRequest(w, r, err)
		return
	}

	if err := c.opt.Service.Update$.type|public$(r.Context(), $.type|private$Obj); err != nil {
		controller.BadRequest(w, r, err)
		return
	}
	controller.OK(w, r, "success")
}
"#;

const DELETE_HANDLER: &str = r#"
// delete$.type|public$ deletes the $.type|public$ named in the body.
func (c *$.type|private$) delete$.type|public$(w http.ResponseWriter, r *http.Request) {
	$.type|private$Obj := &$.type|raw${}
	if err := json.NewDecoder(r.Body).Decode($.type|private$Obj); err != nil {
		controller.BadRequest(w, r, err)
		return
	}

	if err := c.opt.Service.Delete$.type|public$(r.Context(), $.type|private$Obj.Name); err != nil {
		controller.BadRequest(w, r, err)
		return
	}
	controller.OK(w, r, "success")
}
"#;

const REGISTER: &str = r#"
// Register adds the $group$/$version$ $.type|public$ routes to router.
func (c *$.type|private$) Register(router *mux.Router) {
	router = router.PathPrefix("/api/$version$").Subrouter()

	// create
	router.Methods("POST").Path("/$.type|lowercaseSingular$").HandlerFunc(c.create$.type|public$)

	// get
	router.Methods("GET").Path("/$.type|lowercaseSingular$/{name}").HandlerFunc(c.get$.type|public$)

	// update
	router.Methods("PUT").Path("/$.type|lowercaseSingular$").HandlerFunc(c.update$.type|public$)

	// delete
	router.Methods("DELETE").Path("/$.type|lowercaseSingular$").HandlerFunc(c.delete$.type|public$)
}
"#;

/// The `server/controller` package: options, controller interface and
/// response helpers
pub fn package_for_controller_meta(ctx: &ScaffoldContext) -> Package {
    let path = ctx.package_path(CONTROLLER_DIR);

    let controller = ctx
        .meta_generator(&path, "controller")
        .with_imports([
            ctx.package_path(SERVICE_DIR).as_str(),
            "github.com/gorilla/mux",
            "k8s.io/client-go/kubernetes",
        ])
        .with_externs(["service", "mux", "kubernetes"])
        .with_snippet(
            Snippet::new("options", OPTIONS_STRUCT)
                .introduces(["Options"])
                .uses(["kubernetes", "service"]),
        )
        .with_snippet(
            Snippet::new("controller-interface", CONTROLLER_INTERFACE)
                .introduces(["Controller"])
                .uses(["mux"]),
        );

    let utils = ctx
        .meta_generator(&path, "utils")
        .with_imports(["encoding/json", "net/http", "k8s.io/klog"])
        .with_externs(["json", "http", "klog"])
        .with_snippet(Snippet::new("response-struct", RESPONSE_STRUCT).introduces(["commResp"]))
        .with_snippet(
            Snippet::new("response-helpers", RESPONSE_HELPERS)
                .introduces(["Response", "OK", "BadRequest", "Unauthorized"])
                .uses(["commResp", "Response", "json", "http", "klog"]),
        );

    Package::new(PackageKind::ControllerMeta, "controller", path, &ctx.header)
        .with_documentation(
            "// Package controller has the generated controller options and response helpers.\n",
        )
        .with_generator(controller)
        .with_generator(utils)
}

/// The `server/controller/<type>` package: struct, constructor, the four
/// CRUD handlers and route registration
pub fn package_for_type_controller(ctx: &ScaffoldContext, declaration: &TypeDeclaration) -> Package {
    let name = lowercase_singular(declaration.base_name());
    let path = join_import_path(&ctx.package_path(CONTROLLER_DIR), &name);

    let generator = ctx
        .per_type_generator(&path, &name, &declaration.name)
        .with_imports([
            ctx.package_path(CONTROLLER_DIR).as_str(),
            "encoding/json",
            "net/http",
            "github.com/gorilla/mux",
        ])
        .with_externs(["controller", "json", "http", "mux"])
        .with_snippet(Snippet::new("struct", TYPE_STRUCT).introduces(["struct"]).uses(["controller"]))
        .with_snippet(
            Snippet::new("new", TYPE_NEW)
                .introduces(["New"])
                .uses(["struct", "controller"]),
        )
        .with_snippet(
            Snippet::new("create-handler", CREATE_HANDLER)
                .introduces(["create"])
                .uses(["struct", "controller", "json", "http"]),
        )
        .with_snippet(
            Snippet::new("get-handler", GET_HANDLER)
                .introduces(["get"])
                .uses(["struct", "controller", "mux", "http"]),
        )
        .with_snippet(
            Snippet::new("update-handler", UPDATE_HANDLER)
                .introduces(["update"])
                .uses(["struct", "controller", "json", "http"]),
        )
        .with_snippet(
            Snippet::new("delete-handler", DELETE_HANDLER)
                .introduces(["delete"])
                .uses(["struct", "controller", "json", "http"]),
        )
        .with_snippet(
            Snippet::new("register", REGISTER)
                .introduces(["Register"])
                .uses(["struct", "mux", "create", "get", "update", "delete"]),
        );

    Package::new(PackageKind::TypeController, name.clone(), path, &ctx.header)
        .with_documentation(format!(
            "// Package {} has the generated {} controller.\n",
            name,
            public_name(declaration.base_name())
        ))
        .with_generator(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeName;
    use crate::templates::TemplateEngine;

    fn ctx() -> ScaffoldContext {
        let vars = crate::templates::VariableMap::new()
            .with("group", "ecs")
            .with("version", "v1");
        ScaffoldContext::new("github.com/acme/app", b"").with_source_vars(vars)
    }

    fn cluster() -> TypeDeclaration {
        TypeDeclaration::new(TypeName::new("github.com/acme/apis/ecs/v1", "KubernetesCluster"))
    }

    #[test]
    fn test_meta_package_shape() {
        let package = package_for_controller_meta(&ctx());
        assert_eq!(package.name, "controller");
        assert_eq!(package.path, "github.com/acme/app/server/controller");
        assert_eq!(package.output_stems(), vec!["doc", "controller", "utils"]);
        for generator in &package.generators {
            generator.check_template_order().unwrap();
        }
    }

    #[test]
    fn test_type_controller_routes() {
        let package = package_for_type_controller(&ctx(), &cluster());
        assert_eq!(package.path, "github.com/acme/app/server/controller/kubernetescluster");
        assert_eq!(package.output_stems(), vec!["doc", "kubernetescluster"]);

        let generator = &package.generators[0];
        generator.check_template_order().unwrap();
        let section = generator.generate_type(&cluster(), &TemplateEngine::new()).unwrap();

        assert!(section.body.contains("type kubernetesCluster struct"));
        assert!(section.body.contains("&v1.KubernetesCluster{}"));
        assert!(section.body.contains("PathPrefix(\"/api/v1\")"));
        assert!(section.body.contains(
            "router.Methods(\"POST\").Path(\"/kubernetescluster\").HandlerFunc(c.createKubernetesCluster)"
        ));
        assert!(section.body.contains(
            "router.Methods(\"GET\").Path(\"/kubernetescluster/{name}\").HandlerFunc(c.getKubernetesCluster)"
        ));
        assert!(section.body.contains("HandlerFunc(c.updateKubernetesCluster)"));
        assert!(section.body.contains("HandlerFunc(c.deleteKubernetesCluster)"));
        // struct precedes constructor, handlers precede registration
        let struct_at = section.body.find("type kubernetesCluster struct").unwrap();
        let new_at = section.body.find("func New(").unwrap();
        let register_at = section.body.find("Register(router *mux.Router)").unwrap();
        let delete_at = section.body.find("func (c *kubernetesCluster) deleteKubernetesCluster").unwrap();
        assert!(struct_at < new_at && delete_at < register_at);

        assert!(section
            .imports
            .contains(&"\"github.com/acme/apis/ecs/v1\"".to_string()));
        assert!(section
            .imports
            .contains(&"\"github.com/acme/app/server/controller\"".to_string()));
    }
}
