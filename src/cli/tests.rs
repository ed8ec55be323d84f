//! Unit tests for CLI commands

use crate::cli::{execute, parse_key_value, Cli, Commands};
use crate::manifest::Manifest;
use clap::Parser;

const MANIFEST: &str = r#"
router:
  host: shop.example
  protocol: https
controllers:
  - type_name: Items
    url: /items/{id:int}/{slug}?
    methods: { get: show, delete: false }
    actions:
      - name: show
        params: [{ name: slug, default: "" }, { name: id }, { name: req, type: Request }]
routes:
  - { name: item, controller: Items }
  - { name: item_view, controller: Items, pattern: "/view/{id:int}/{slug}" }
"#;

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let router = Manifest::from_yaml(MANIFEST)
        .unwrap()
        .build_router()
        .unwrap();
    let mut out = Vec::new();
    execute(&router, &cli.command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_generate_command_with_params() {
    let cli = Cli::try_parse_from([
        "waymark",
        "--manifest",
        "routes.yaml",
        "generate",
        "item",
        "id=7",
        "extra=a=b",
        "--absolute",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            name,
            params,
            absolute,
        } => {
            assert_eq!(name, "item");
            assert_eq!(
                params,
                vec![
                    ("id".to_string(), "7".to_string()),
                    ("extra".to_string(), "a=b".to_string())
                ]
            );
            assert!(absolute);
        }
        _ => panic!("Expected Generate command"),
    }
    assert_eq!(cli.manifest.to_string_lossy(), "routes.yaml");
}

#[test]
fn test_parse_key_value_rejects_missing_equals() {
    assert!(parse_key_value("novalue").is_err());
    assert!(parse_key_value("=x").is_err());
    assert_eq!(parse_key_value("k=").unwrap(), ("k".into(), String::new()));
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["waymark", "routes"],
        vec!["waymark", "match", "/items/1"],
        vec!["waymark", "match", "-X", "POST", "/items/1"],
        vec!["waymark", "generate", "item"],
        vec!["waymark", "expose", "item", "-m", "other.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_execute_generate_absolute() {
    let out = run(&["waymark", "generate", "item", "id=7", "extra=bar", "--absolute"]);
    assert_eq!(out, "https://shop.example/items/7/?extra=bar\n");
}

#[test]
fn test_execute_expose() {
    assert_eq!(run(&["waymark", "expose", "item"]), "/items/{id}/{slug}\n");
}

#[test]
fn test_execute_match_lists_arguments_in_declared_order() {
    let out = run(&["waymark", "match", "/view/3/x?page=2"]);
    assert_eq!(
        out,
        "route: item_view\naction: show\n  slug = \"x\"\n  id = \"3\"\n  req = <request GET /view/3/x>\n"
    );
}

#[test]
fn test_execute_match_reports_unroutable_method() {
    let cli = Cli::try_parse_from(["waymark", "match", "-X", "delete", "/view/3/x"]).unwrap();
    let router = Manifest::from_yaml(MANIFEST).unwrap().build_router().unwrap();
    let mut out = Vec::new();
    let err = execute(&router, &cli.command, &mut out).unwrap_err();
    assert!(err.to_string().contains("/view/3/x"));
    assert!(out.is_empty());
}

#[test]
fn test_execute_routes() {
    let out = run(&["waymark", "routes"]);
    assert_eq!(
        out,
        "item\t/items/{id:int}/{slug}?\tItems\tget=show post=handle put=handle delete=-\n\
         item_view\t/view/{id:int}/{slug}\tItems\tget=show post=handle put=handle delete=-\n"
    );
}
