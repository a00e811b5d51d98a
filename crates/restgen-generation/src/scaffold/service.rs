//! Service packages: the interface over all types, then one file per type

use crate::models::TypeDeclaration;
use crate::naming::lowercase_singular;
use crate::package::{Package, PackageKind};
use crate::scaffold::{ScaffoldContext, SERVICE_DIR};
use crate::templates::Snippet;

const SERVICE_DOC: &str = "// Package service has the generated service interface and implementations.\n";

const OPTIONS_STRUCT: &str = r#"
// Options contains the config used by the service.
type Options struct {
	KubeClientset kubernetes.Interface
}
"#;

const SERVICE_INTERFACE: &str = r#"
// Interface lists every service method.
type Interface interface {
$range types$	Create$.|public$(ctx context.Context, $.|private$Obj *$.|raw$) error
	Get$.|public$(ctx context.Context, name string) (*$.|raw$, error)
	Update$.|public$(ctx context.Context, $.|private$Obj *$.|raw$) error
	Delete$.|public$(ctx context.Context, name string) error
$end$}
"#;

const SERVICE_STRUCT: &str = r#"
// service implements Interface.
type service struct {
	opt *Options
}
"#;

const NEW_SERVICE: &str = r#"
// New creates a service.
func New(opt *Options) Interface {
	return &service{opt: opt}
}
"#;

const CREATE_SERVICE: &str = r#"
// Create$.type|public$ stores a new $.type|public$.
// Replace the body with the storage logic for $.type|allLowercasePlural$.
func (s *service) Create$.type|public$(ctx context.Context, $.type|private$Obj *$.type|raw$) error {
	klog.Infof("create $.type|lowercaseSingular$ %v", $.type|private$Obj.Name)
	return nil
}
"#;

const GET_SERVICE: &str = r#"
// Get$.type|public$ returns one of the stored $.type|publicPlural$.
func (s *service) Get$.type|public$(ctx context.Context, name string) (*$.type|raw$, error) {
	klog.Infof("get $.type|lowercaseSingular$ %v", name)
	return nil, fmt.Errorf("$.type|lowercaseSingular$ %q not found", name)
}
"#;

const UPDATE_SERVICE: &str = r#"
// Update$.type|public$ replaces a stored $.type|public$.
func (s *service) Update$.type|public$(ctx context.Context, $.type|private$Obj *$.type|raw$) error {
	if _, err := s.Get$.type|public$(ctx, $.type|private$Obj.Name); err != nil {
		klog.Errorf("get $.type|lowercaseSingular$ %v failed with:%v", $.type|private$Obj.Name, err)
		return err
	}
	klog.Infof("update $.type|lowercaseSingular$ %v", $.type|private$Obj.Name)
	return nil
}
"#;

const DELETE_SERVICE: &str = r#"
// Delete$.type|public$ removes the $.type|public$ called name.
func (s *service) Delete$.type|public$(ctx context.Context, name string) error {
	if _, err := s.Get$.type|public$(ctx, name); err != nil {
		klog.Errorf("get $.type|lowercaseSingular$ %v failed with:%v", name, err)
		return err
	}
	klog.Infof("delete $.type|lowercaseSingular$ %v", name)
	return nil
}
"#;

/// The `server/service` interface package, enumerating every type in order
pub fn package_for_service_interface(ctx: &ScaffoldContext, types: &[TypeDeclaration]) -> Package {
    let path = ctx.package_path(SERVICE_DIR);

    let generator = ctx
        .meta_generator(&path, "interface")
        .with_var("types", types.to_vec())
        .with_imports(["context", "k8s.io/client-go/kubernetes"])
        .with_externs(["context", "kubernetes"])
        .with_snippet(
            Snippet::new("options", OPTIONS_STRUCT)
                .introduces(["Options"])
                .uses(["kubernetes"]),
        )
        .with_snippet(
            Snippet::new("interface", SERVICE_INTERFACE)
                .introduces(["Interface"])
                .uses(["context"]),
        )
        .with_snippet(
            Snippet::new("service-struct", SERVICE_STRUCT)
                .introduces(["service"])
                .uses(["Options"]),
        )
        .with_snippet(
            Snippet::new("new", NEW_SERVICE)
                .introduces(["New"])
                .uses(["Options", "Interface", "service"]),
        );

    Package::new(PackageKind::ServiceInterface, "service", path, &ctx.header)
        .with_documentation(SERVICE_DOC)
        .with_generator(generator)
}

/// One file of `server/service` implementing the methods for a single type
///
/// Shares its path with the interface package, so it carries no doc file of
/// its own.
pub fn package_for_type_service(ctx: &ScaffoldContext, declaration: &TypeDeclaration) -> Package {
    let path = ctx.package_path(SERVICE_DIR);
    let stem = lowercase_singular(declaration.base_name());

    let generator = ctx
        .per_type_generator(&path, &stem, &declaration.name)
        .with_imports(["context", "fmt", "k8s.io/klog"])
        // `service` comes from the interface file of the same package
        .with_externs(["service", "context", "fmt", "klog"])
        .with_snippet(
            Snippet::new("create", CREATE_SERVICE)
                .introduces(["Create"])
                .uses(["service", "context", "klog"]),
        )
        .with_snippet(
            Snippet::new("get", GET_SERVICE)
                .introduces(["Get"])
                .uses(["service", "context", "fmt", "klog"]),
        )
        .with_snippet(
            Snippet::new("update", UPDATE_SERVICE)
                .introduces(["Update"])
                .uses(["service", "Get", "klog"]),
        )
        .with_snippet(
            Snippet::new("delete", DELETE_SERVICE)
                .introduces(["Delete"])
                .uses(["service", "Get", "klog"]),
        );

    Package::new(PackageKind::TypeService, "service", path, &ctx.header).with_generator(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeName;
    use crate::templates::TemplateEngine;

    const API: &str = "github.com/acme/apis/ecs/v1";

    fn decl(name: &str) -> TypeDeclaration {
        TypeDeclaration::new(TypeName::new(API, name))
    }

    #[test]
    fn test_interface_enumerates_types_in_order() {
        let ctx = ScaffoldContext::new("github.com/acme/app", b"");
        let types = vec![decl("Namespace"), decl("Secret")];
        let package = package_for_service_interface(&ctx, &types);
        assert_eq!(package.output_stems(), vec!["doc", "interface"]);

        let generator = &package.generators[0];
        generator.check_template_order().unwrap();
        let section = generator.generate_type(&types[0], &TemplateEngine::new()).unwrap();
        let namespace = section
            .body
            .find("CreateNamespace(ctx context.Context, namespaceObj *v1.Namespace) error")
            .unwrap();
        let secret = section
            .body
            .find("CreateSecret(ctx context.Context, secretObj *v1.Secret) error")
            .unwrap();
        assert!(namespace < secret);
        assert!(section.body.contains("GetSecret(ctx context.Context, name string) (*v1.Secret, error)"));
        assert!(section.body.contains("DeleteNamespace(ctx context.Context, name string) error"));

        let interface_at = section.body.find("type Interface interface").unwrap();
        let new_at = section.body.find("func New(").unwrap();
        assert!(interface_at < new_at);
    }

    #[test]
    fn test_type_service_uses_object_not_namespace() {
        let ctx = ScaffoldContext::new("github.com/acme/app", b"");
        let package = package_for_type_service(&ctx, &decl("Secret"));
        assert_eq!(package.documentation, None);
        assert_eq!(package.output_stems(), vec!["secret"]);

        let generator = &package.generators[0];
        generator.check_template_order().unwrap();
        let section = generator.generate_type(&decl("Secret"), &TemplateEngine::new()).unwrap();
        assert!(section
            .body
            .contains("func (s *service) CreateSecret(ctx context.Context, secretObj *v1.Secret) error"));
        assert!(section.body.contains("klog.Infof(\"create secret %v\", secretObj.Name)"));
        assert!(!section.body.contains("namespace)"));
    }
}
