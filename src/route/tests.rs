use super::{Argument, Constraint, MethodOverrides, MethodTable, Pattern, Route, Verb};
use crate::controller::{ActionDescriptor, ControllerDescriptor, ParamDescriptor};
use crate::error::RouterError;
use crate::request::Request;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn controller() -> ControllerDescriptor {
    ControllerDescriptor::new("Test")
        .action(
            ActionDescriptor::new("handle")
                .param(ParamDescriptor::new("id"))
                .param(ParamDescriptor::new("slug").default_value("none")),
        )
        .action(
            ActionDescriptor::new("reversed")
                .param(ParamDescriptor::new("slug"))
                .param(ParamDescriptor::request("request"))
                .param(ParamDescriptor::new("id")),
        )
}

fn route(pattern: &str) -> Route {
    let methods = MethodTable::uniform("handle");
    Route::new("test", &controller(), pattern, &methods, None, false).unwrap()
}

#[test]
fn test_root_path() {
    let p = Pattern::compile("/").unwrap();
    assert!(p.is_match("/"));
    assert!(!p.is_match(""));
    assert!(p.placeholders().is_empty());
}

#[test]
fn test_parameterized_path() {
    let p = Pattern::compile("/items/{id}").unwrap();
    assert!(p.is_match("/items/123"));
    assert_eq!(&*p.placeholders()[0].name, "id");
    assert_eq!(p.placeholders()[0].constraint, Constraint::Segment);
}

#[test]
fn test_literals_are_escaped() {
    let p = Pattern::compile("/files/v1.0/{name}").unwrap();
    assert!(p.is_match("/files/v1.0/readme"));
    assert!(!p.is_match("/files/v1x0/readme"));
}

#[test]
fn test_matching_is_case_insensitive() {
    let p = Pattern::compile("/Items/{id:int}").unwrap();
    assert!(p.is_match("/items/7"));
    assert!(p.is_match("/ITEMS/7"));
}

#[test]
fn test_int_constraint() {
    let p = Pattern::compile("/n/{id:int}").unwrap();
    assert!(p.is_match("/n/0"));
    assert!(p.is_match("/n/123"));
    for bad in ["/n/12a", "/n/a", "/n/-1", "/n/1.5", "/n/"] {
        assert!(!p.is_match(bad), "{bad} should not match");
    }
}

#[test]
fn test_int_constraint_is_ascii_only() {
    let p = Pattern::compile("/n/{id:int}").unwrap();
    for bad in ["/n/\u{0663}\u{0664}", "/n/\u{FF11}", "/n/1\u{0969}"] {
        assert!(!p.is_match(bad), "{bad} should not match");
    }
}

#[test]
fn test_default_constraint_is_ascii_only() {
    let p = Pattern::compile("/s/{slug}").unwrap();
    for bad in ["/s/café", "/s/\u{0663}", "/s/\u{212A}", "/s/\u{017F}"] {
        assert!(!p.is_match(bad), "{bad} should not match");
    }
    assert!(p.is_match("/s/MiXeD_09"));
}

#[test]
fn test_default_constraint_accepts_reserved_characters_but_not_slash() {
    let p = Pattern::compile("/s/{slug}").unwrap();
    for good in ["/s/a.b", "/s/a+b", "/s/a%20b", "/s/a:b", "/s/a-b", "/s/Under_score"] {
        assert!(p.is_match(good), "{good} should match");
    }
    assert!(!p.is_match("/s/a/b"));
    assert!(!p.is_match("/s/"));
}

#[test]
fn test_all_constraint_crosses_slashes() {
    let p = Pattern::compile("/static/{path:all}").unwrap();
    let caps = p.captures("/static/css/site/main.css").unwrap();
    assert_eq!(caps[0].1, "css/site/main.css");
}

#[test]
fn test_unknown_constraint_compiles_to_empty_group() {
    let p = Pattern::compile("/x/{id:uuid}").unwrap();
    assert_eq!(p.placeholders()[0].constraint, Constraint::Unknown("uuid".into()));
    assert!(p.is_match("/x/"));
    assert!(!p.is_match("/x/abc"));
}

#[test]
fn test_optional_marker_stays_literal_in_matcher() {
    let p = Pattern::compile("/test/{id:int}/{slug}?").unwrap();
    assert!(p.placeholders()[1].optional);
    assert!(!p.is_match("/test/1/abc"));
    assert!(!p.is_match("/test/1/"));
    assert!(p.is_match("/test/1/abc?"));
}

#[test]
fn test_duplicate_placeholder_names_are_rejected() {
    let methods = MethodTable::uniform("handle");
    let err = Route::new("dup", &controller(), "/{id}/{id}", &methods, None, false).unwrap_err();
    assert!(matches!(err, RouterError::InvalidRoute { .. }));
}

#[test]
fn test_template_strips_constraints_and_markers() {
    let p = Pattern::compile("/items/{id:int}/{slug}?").unwrap();
    assert_eq!(p.template(), "/items/{id}/{slug}");
}

#[test]
fn test_matches_requires_binding_for_verb() {
    let controller = controller();
    let methods = MethodTable::resolve("handle", &MethodOverrides::new().disable(Verb::Delete));
    let r = Route::new("r", &controller, "/items/{id:int}", &methods, None, false).unwrap();
    assert!(r.matches("/items/42", "get"));
    assert!(r.matches("/items/42", "PUT"));
    assert!(!r.matches("/items/42", "DELETE"));
    assert!(!r.matches("/items/42", "PATCH"));
}

#[test]
fn test_private_route_never_matches() {
    let methods = MethodTable::uniform("handle");
    let r = Route::new("p", &controller(), "/hidden", &methods, None, true).unwrap();
    assert!(!r.matches("/hidden", "GET"));
    assert!(matches!(r.generate_url::<&str, &str>(&[]), Err(RouterError::PrivateRoute { .. })));
    assert!(matches!(r.expose(), Err(RouterError::PrivateRoute { .. })));
}

#[test]
fn test_bind_arguments_decodes_and_defaults() {
    let r = route("/items/{id}");
    let args = r.bind_arguments("/items/a%20b", "GET", None).unwrap();
    assert_eq!(
        args,
        vec![Argument::Value(json!("a b")), Argument::Value(json!("none"))]
    );
}

#[test]
fn test_bind_arguments_follows_declared_order() {
    let methods = MethodTable::uniform("reversed");
    let r = Route::new("rev", &controller(), "/{id:int}/{slug}", &methods, None, false).unwrap();
    let req = Arc::new(Request::get("/5/hello"));
    let args = r.bind_arguments("/5/hello", "GET", Some(&req)).unwrap();
    assert_eq!(args[0].as_str(), Some("hello"));
    assert_eq!(args[1].as_request().map(|r| r.path.as_str()), Some("/5/hello"));
    assert_eq!(args[2].as_str(), Some("5"));
}

#[test]
fn test_bind_arguments_without_request_uses_fallback() {
    let methods = MethodTable::uniform("reversed");
    let r = Route::new("rev", &controller(), "/{id:int}/{slug}", &methods, None, false).unwrap();
    let args = r.bind_arguments("/5/hello", "GET", None).unwrap();
    assert_eq!(args[1], Argument::Value(Value::Null));
}

#[test]
fn test_bind_arguments_rejects_non_matching_path() {
    let r = route("/items/{id:int}");
    let err = r.bind_arguments("/items/abc", "GET", None).unwrap_err();
    assert!(matches!(err, RouterError::NoMatch { .. }));
}

#[test]
fn test_bind_arguments_from_map() {
    let r = route("/items/{id}");
    let mut params = Map::new();
    params.insert("id".into(), json!(42));
    params.insert("slug".into(), json!("caf%C3%A9"));
    let args = r.bind_arguments_from_map("post", &params, None).unwrap();
    assert_eq!(args, vec![Argument::Value(json!(42)), Argument::Value(json!("café"))]);
}

#[test]
fn test_bind_arguments_from_map_on_private_route() {
    let methods = MethodTable::uniform("handle");
    let r = Route::new("p", &controller(), "", &methods, None, true).unwrap();
    let args = r.bind_arguments_from_map("get", &Map::new(), None).unwrap();
    assert_eq!(args, vec![Argument::Value(Value::Null), Argument::Value(json!("none"))]);
}

#[test]
fn test_generate_optional_trailing_placeholder() {
    let r = route("/test/{id:int}/{slug}?");
    assert_eq!(r.generate_url(&[("id", "123")]).unwrap(), "/test/123/");
    assert_eq!(
        r.generate_url(&[("id", "123"), ("slug", "lipsum")]).unwrap(),
        "/test/123/lipsum"
    );
}

#[test]
fn test_generate_appends_unused_params_as_query() {
    let r = route("/items/{id:int}/{slug}?");
    let url = r
        .generate_url(&[("id", "7"), ("slug", "foo"), ("extra", "bar"), ("q", "a b&c")])
        .unwrap();
    assert_eq!(url, "/items/7/foo?extra=bar&q=a+b%26c");
}

#[test]
fn test_generate_encodes_values() {
    let r = route("/s/{slug}");
    assert_eq!(r.generate_url(&[("slug", "a b/c")]).unwrap(), "/s/a%20b%2Fc");
}

#[test]
fn test_generate_escapes_tilde_for_segment_class() {
    let r = route("/s/{slug}");
    let url = r.generate_url(&[("slug", "a~b")]).unwrap();
    assert_eq!(url, "/s/a%7Eb");
    assert!(r.matches(&url, "get"));
    let args = r.bind_arguments(&url, "get", None).unwrap();
    assert_eq!(args[1].as_str(), Some("a~b"));
}

#[test]
fn test_generate_missing_parameter() {
    let r = route("/items/{id:int}");
    let err = r.generate_url(&[("slug", "x")]).unwrap_err();
    assert_eq!(
        err,
        RouterError::MissingParameter {
            route: "test".into(),
            parameter: "id".into(),
        }
    );
}

#[test]
fn test_generate_collapses_dropped_optional_segment() {
    let r = route("/a//{x}?");
    assert_eq!(r.generate_url::<&str, &str>(&[]).unwrap(), "/a/");
}

#[test]
fn test_generate_strips_every_literal_question_mark() {
    let r = route("/a?/{x}");
    assert_eq!(r.generate_url(&[("x", "1")]).unwrap(), "/a/1");
}
