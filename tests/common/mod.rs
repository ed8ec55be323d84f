#![allow(dead_code)]

use waymark::controller::{ActionDescriptor, ControllerCatalog, ControllerDescriptor, ParamDescriptor};
use waymark::route::Verb;
use waymark::{Router, RouterConfig};

/// Controllers shared by the integration tests.
///
/// `Items` binds GET to `show(id, slug = "", request)`, disables DELETE and
/// leaves POST/PUT on the implicit `handle` action.
pub fn catalog() -> ControllerCatalog {
    [
        ControllerDescriptor::new("Items")
            .url("/items/{id:int}")
            .method(Verb::Get, "show")
            .disable(Verb::Delete)
            .action(
                ActionDescriptor::new("show")
                    .param(ParamDescriptor::new("id"))
                    .param(ParamDescriptor::new("slug").default_value(""))
                    .param(ParamDescriptor::request("request")),
            ),
        ControllerDescriptor::new("Files")
            .url("/files/{path:all}")
            .action(ActionDescriptor::new("handle").param(ParamDescriptor::new("path"))),
        ControllerDescriptor::new("Fallback")
            .url("/{page}")
            .action(ActionDescriptor::new("handle").param(ParamDescriptor::new("page"))),
        ControllerDescriptor::new("Mailer")
            .unreachable()
            .action(ActionDescriptor::new("handle").param(ParamDescriptor::new("to"))),
    ]
    .into_iter()
    .collect()
}

pub fn router() -> Router {
    Router::new(catalog(), RouterConfig::default())
}
