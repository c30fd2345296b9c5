//! Publisher 통합 테스트 - 등록, 표시 순서, 라우트/탭, 호출
//!
//! `cargo test -p genro-core --test publisher_test`

mod common;

use common::{diamond, Library, Node};
use genro_core::{
    display_order, is_configuration, ApiDescriptor, ApiRegistry, ClassMeta, Error, HttpVerb,
    MethodMeta, ParamLocation, ParamMeta, Publisher, PublisherConfig, ReturnMeta, Target,
    TypeDesc, Widget, READ_PREFIXES,
};
use serde_json::json;
use std::sync::Arc;

fn library_publisher() -> Publisher {
    let mut publisher = Publisher::default();
    publisher.publish(Library::new()).expect("publish library");
    publisher
}

// ============================================================================
// 메타데이터 규칙
// ============================================================================

#[test]
fn test_verb_inferred_from_name_prefix() {
    let publisher = library_publisher();

    for entry in publisher.registry().entries() {
        for method in entry.rest_methods.iter().chain(entry.ui_methods.iter()) {
            if method.meta.has_explicit_verb() {
                continue;
            }
            let is_read = READ_PREFIXES
                .iter()
                .any(|p| method.name().starts_with(p));
            let expected = if is_read { HttpVerb::Get } else { HttpVerb::Post };
            assert_eq!(method.verb(), expected, "verb of {}", method.name());
        }
    }

    let entry = publisher.registry().get("/library").unwrap();
    assert_eq!(
        entry.find_method("delete_shelf").unwrap().verb(),
        HttpVerb::Delete
    );
}

#[test]
fn test_full_path_is_base_path_plus_method_path() {
    let publisher = library_publisher();

    for entry in publisher.registry().entries() {
        for method in &entry.rest_methods {
            assert_eq!(method.meta.endpoint_path(), format!("/{}", method.name()));
            assert_eq!(
                method.full_path,
                format!("{}/{}", entry.base_path, method.name())
            );
        }
    }
}

#[test]
fn test_private_members_are_not_published() {
    let publisher = library_publisher();
    let entry = publisher.registry().get("/library").unwrap();
    assert!(entry.find_method("_rebuild_index").is_none());

    let err = publisher
        .invoke("/library", "_rebuild_index", &json!({}))
        .unwrap_err();
    assert!(matches!(err, Error::MethodNotFound { .. }));
}

// ============================================================================
// 등록 (그래프 순회)
// ============================================================================

#[test]
fn test_child_instances_are_registered() {
    let publisher = library_publisher();
    assert_eq!(
        publisher.published_classes(),
        vec![
            ("Library".to_string(), "/library".to_string()),
            ("ShelfManager".to_string(), "/shelf".to_string()),
        ]
    );
    let shelf = publisher.registry().get("/shelf").unwrap();
    assert_eq!(shelf.parent.as_deref(), Some("/library"));
}

#[test]
fn test_diamond_yields_one_entry_per_path() {
    let mut registry = ApiRegistry::new();
    let report = registry.publish(diamond()).unwrap();

    assert_eq!(report.registered, vec!["/top", "/left", "/bottom", "/right"]);
    assert_eq!(registry.len(), 4);
    // 처음 발견한 부모가 유지됨
    assert_eq!(
        registry.get("/bottom").unwrap().parent.as_deref(),
        Some("/left")
    );
}

#[test]
fn test_publishing_same_graph_twice_is_noop() {
    let mut registry = ApiRegistry::new();
    let top = diamond();

    registry.publish(top.clone()).unwrap();
    let report = registry.publish(top).unwrap();

    assert!(report.is_noop());
    assert_eq!(registry.len(), 4);
}

#[test]
fn test_cycle_terminates() {
    let mut registry = ApiRegistry::new();
    let a = Node::new("Alpha", "/alpha");
    let b = Node::new("Beta", "/beta");
    a.adopt(b.clone());
    b.adopt(a.clone());

    let report = registry.publish(a.clone()).unwrap();
    assert_eq!(report.registered.len(), 2);

    b.release();
}

#[test]
fn test_missing_base_path_leaves_registry_unchanged() {
    let mut publisher = library_publisher();
    let before = publisher.registry().len();

    let err = publisher
        .publish(Node::unrooted("InvalidClass"))
        .unwrap_err();
    assert!(matches!(err, Error::MissingBasePath { ref class } if class == "InvalidClass"));
    assert!(err.to_string().contains("base path"));
    assert_eq!(publisher.registry().len(), before);
}

#[test]
fn test_nested_missing_base_path_registers_nothing() {
    let mut registry = ApiRegistry::new();
    let root = Node::new("Root", "/root");
    root.adopt(Node::new("Child", "/child"));
    root.adopt(Node::unrooted("Orphan"));

    assert!(registry.publish(root).is_err());
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_base_path_from_another_instance() {
    let mut registry = ApiRegistry::new();
    registry.publish(Node::new("Library", "/library")).unwrap();

    let err = registry
        .publish(Node::new("Archive", "/library"))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::DuplicateBasePath { ref existing, ref incoming, .. }
            if existing == "Library" && incoming == "Archive"
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unresolved_model_identifies_method() {
    let mut registry = ApiRegistry::new();
    let node = Node::with(
        ApiDescriptor::new(ClassMeta::new("Shelf").base_path("/shelf")).method(
            MethodMeta::new("get_book").returns(ReturnMeta::new(TypeDesc::model("Missing"))),
        ),
    );

    match registry.publish(node).unwrap_err() {
        Error::UnresolvedType {
            class,
            method,
            annotation,
        } => {
            assert_eq!(class, "Shelf");
            assert_eq!(method, "get_book");
            assert_eq!(annotation, "Missing");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(registry.is_empty());
}

// ============================================================================
// 표시 순서
// ============================================================================

#[test]
fn test_configuration_roots_come_last() {
    let mut registry = ApiRegistry::new();

    let zeta = Node::new("Zeta", "/zeta");
    zeta.adopt(Node::new("ZetaChild", "/zeta_child"));
    let settings = Node::new("AppConfig", "/app_config");
    settings.adopt(Node::new("ConfigDetail", "/b_detail"));
    let alpha = Node::new("Alpha", "/alpha");
    alpha.adopt(Node::new("AlphaChild", "/alpha_child"));
    alpha.adopt(Node::new("AlphaAux", "/alpha_aux"));

    registry.publish(zeta).unwrap();
    registry.publish(settings).unwrap();
    registry.publish(alpha).unwrap();

    let order = display_order(&registry);
    assert_eq!(
        order,
        vec![
            "/alpha",
            "/alpha_aux",
            "/alpha_child",
            "/zeta",
            "/zeta_child",
            "/app_config",
            "/b_detail",
        ]
    );

    // 결정적
    assert_eq!(order, registry.display_order());

    // 모든 설정 루트는 일반 항목 뒤에 위치
    let first_config = order
        .iter()
        .position(|p| is_configuration(&registry.get(p).unwrap().class_name))
        .unwrap();
    assert!(order[first_config..]
        .iter()
        .filter(|p| registry.get(p).unwrap().parent.is_none())
        .all(|p| is_configuration(&registry.get(p).unwrap().class_name)));

    // 부모는 자식보다 앞에
    for (i, path) in order.iter().enumerate() {
        if let Some(parent) = &registry.get(path).unwrap().parent {
            let parent_index = order.iter().position(|p| p == parent).unwrap();
            assert!(parent_index < i, "{} should precede {}", parent, path);
        }
    }
}

/// 부모가 자식보다 앞에 오는지 확인
fn assert_parents_first(registry: &ApiRegistry, order: &[String]) {
    for (i, path) in order.iter().enumerate() {
        if let Some(parent) = &registry.get(path).unwrap().parent {
            let parent_index = order.iter().position(|p| p == parent).unwrap();
            assert!(parent_index < i, "{} should precede {}", parent, path);
        }
    }
}

#[test]
fn test_nested_configuration_follows_configuration_parent() {
    let mut registry = ApiRegistry::new();

    let zone = Node::new("ZoneConfig", "/z_config");
    zone.adopt(Node::new("AuthConfig", "/a_config"));
    registry.publish(zone).unwrap();

    let order = display_order(&registry);
    assert_eq!(order, vec!["/z_config", "/a_config"]);
    assert_parents_first(&registry, &order);
}

#[test]
fn test_configuration_under_regular_root_is_deferred() {
    let mut registry = ApiRegistry::new();

    let app = Node::new("App", "/app");
    let cache = Node::new("CacheConfig", "/app_cache");
    cache.adopt(Node::new("Eviction", "/eviction"));
    cache.adopt(Node::new("TtlConfig", "/a_ttl"));
    app.adopt(cache);
    app.adopt(Node::new("Users", "/users"));
    registry.publish(app).unwrap();
    registry.publish(Node::new("Billing", "/billing")).unwrap();

    let order = display_order(&registry);
    assert_eq!(
        order,
        vec![
            "/app",
            "/users",
            "/billing",
            "/app_cache",
            "/a_ttl",
            "/eviction",
        ]
    );
    assert_parents_first(&registry, &order);
}

#[test]
fn test_diamond_depth_follows_first_parent() {
    let mut publisher = Publisher::default();
    publisher.publish(diamond()).unwrap();

    let tabs = publisher.ui_tabs();
    let layout: Vec<_> = tabs
        .iter()
        .map(|t| (t.base_path.as_str(), t.depth))
        .collect();
    assert_eq!(
        layout,
        vec![("/top", 0), ("/left", 1), ("/bottom", 2), ("/right", 1)]
    );
    assert_parents_first(publisher.registry(), &publisher.display_order());
}

#[test]
fn test_settings_tab_is_last() {
    let mut publisher = Publisher::default();
    publisher.publish_settings().unwrap();
    publisher.publish(Library::new()).unwrap();

    let tabs = publisher.ui_tabs();
    let labels: Vec<_> = tabs.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Library", "ShelfManager", "PublisherConfig"]);
    assert_eq!(tabs[0].depth, 0);
    assert_eq!(tabs[1].depth, 1);
}

// ============================================================================
// 대상별 필터링
// ============================================================================

#[test]
fn test_target_filtering() {
    let publisher = library_publisher();
    let registry = publisher.registry();

    for (_, methods) in registry.rest_listing() {
        assert!(methods.iter().all(|m| m.meta.exposed_to(Target::Rest)));
    }
    for (_, methods) in registry.ui_listing() {
        assert!(methods.iter().all(|m| m.meta.exposed_to(Target::Ui)));
    }

    let entry = registry.get("/library").unwrap();
    let rest: Vec<_> = entry.rest_methods.iter().map(|m| m.name()).collect();
    let ui: Vec<_> = entry.ui_methods.iter().map(|m| m.name()).collect();

    assert!(rest.contains(&"get_stats") && !ui.contains(&"get_stats"));
    assert!(ui.contains(&"get_genres") && !rest.contains(&"get_genres"));
    assert!(rest.contains(&"list_shelves") && ui.contains(&"list_shelves"));
}

#[test]
fn test_rest_routes() {
    let publisher = library_publisher();
    let routes = publisher.rest_routes();

    let read_book = routes.iter().find(|r| r.name == "read_book").unwrap();
    assert_eq!(read_book.verb, HttpVerb::Get);
    assert_eq!(read_book.param_location, ParamLocation::Query);
    assert_eq!(read_book.path, "/library/read_book");
    assert_eq!(read_book.tag, "Library");
    assert_eq!(
        read_book.request_model.as_deref(),
        Some("Library_Read_BookRequest")
    );

    let schema = read_book.request_schema();
    assert_eq!(schema["required"], json!(["title"]));

    let add_shelf = routes.iter().find(|r| r.name == "add_shelf").unwrap();
    assert_eq!(add_shelf.param_location, ParamLocation::Body);

    let delete_shelf = routes.iter().find(|r| r.name == "delete_shelf").unwrap();
    assert_eq!(delete_shelf.verb, HttpVerb::Delete);
    assert_eq!(delete_shelf.param_location, ParamLocation::Body);
    assert_eq!(
        delete_shelf.request_model.as_deref(),
        Some("Library_Delete_ShelfRequest")
    );

    let get_book = routes.iter().find(|r| r.name == "get_book").unwrap();
    assert_eq!(
        get_book.response_schema()["$ref"],
        "#/components/schemas/Book"
    );

    let list_shelves = routes.iter().find(|r| r.name == "list_shelves").unwrap();
    assert!(list_shelves.request_model.is_none());

    assert!(routes.iter().all(|r| r.name != "get_genres"));
    assert!(publisher.schemas().contains_key("Book"));
}

#[test]
fn test_request_models_are_scoped_by_class() {
    let shelf = Node::with(
        ApiDescriptor::new(ClassMeta::new("Shelf").base_path("/shelf")).method(
            MethodMeta::new("get_info").param(ParamMeta::new("shelf_code", TypeDesc::Str)),
        ),
    );
    let book = Node::with(
        ApiDescriptor::new(ClassMeta::new("Book").base_path("/book"))
            .method(MethodMeta::new("get_info").param(ParamMeta::new("book_id", TypeDesc::Int))),
    );

    let mut publisher = Publisher::default();
    publisher.publish(shelf).unwrap();
    publisher.publish(book).unwrap();

    let names: Vec<_> = publisher
        .rest_routes()
        .into_iter()
        .filter_map(|r| r.request_model)
        .collect();
    assert_eq!(names, vec!["Shelf_Get_InfoRequest", "Book_Get_InfoRequest"]);

    let schemas = publisher.schemas();
    assert_eq!(
        schemas["Shelf_Get_InfoRequest"]["required"],
        json!(["shelf_code"])
    );
    assert_eq!(
        schemas["Book_Get_InfoRequest"]["required"],
        json!(["book_id"])
    );
}

#[test]
fn test_disabled_surfaces_produce_nothing() {
    let config = PublisherConfig::default()
        .enable_rest(false)
        .enable_ui(false);
    let mut publisher = Publisher::new(config);
    publisher.publish(Library::new()).unwrap();

    assert!(publisher.rest_routes().is_empty());
    assert!(publisher.ui_tabs().is_empty());
    assert_eq!(publisher.registry().len(), 2);
}

#[test]
fn test_ui_forms() {
    let publisher = library_publisher();
    let tabs = publisher.ui_tabs();
    let library = tabs.iter().find(|t| t.class_name == "Library").unwrap();

    let form = library.forms.iter().find(|f| f.name == "read_book").unwrap();
    assert_eq!(form.title, "Read book");
    let widgets: Vec<_> = form.fields.iter().map(|f| f.widget).collect();
    assert_eq!(widgets, vec![Widget::Text, Widget::Integer, Widget::Integer]);
    assert_eq!(form.fields[1].default, Some(json!(1)));
    assert!(!form.fields[2].required);

    assert!(library.forms.iter().all(|f| f.name != "get_stats"));
}

// ============================================================================
// 호출
// ============================================================================

#[test]
fn test_invoke_child_method() {
    let publisher = library_publisher();
    let count = publisher
        .invoke("/shelf", "count_books", &json!({ "shelf_code": "A1" }))
        .unwrap();
    assert_eq!(count, json!(2));
}

#[test]
fn test_invoke_fills_defaults() {
    let publisher = library_publisher();
    let text = publisher
        .invoke("library", "read_book", &json!({ "title": "Dune" }))
        .unwrap();
    assert_eq!(text, json!("Dune from page 1"));

    let text = publisher
        .invoke(
            "/library",
            "read_book",
            &json!({ "title": "Dune", "from_page": 3, "to_page": 5, "extra": true }),
        )
        .unwrap();
    assert_eq!(text, json!("Dune pages 3-5"));
}

#[test]
fn test_invoke_errors() {
    let publisher = library_publisher();

    let err = publisher.invoke("/nowhere", "get_info", &json!({})).unwrap_err();
    assert!(matches!(err, Error::ClassNotFound(_)));

    let err = publisher.invoke("/library", "missing", &json!({})).unwrap_err();
    assert!(matches!(err, Error::MethodNotFound { .. }));

    let err = publisher
        .invoke("/shelf", "count_books", &json!({}))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArguments { .. }));

    let err = publisher
        .invoke("/shelf", "count_books", &json!({ "shelf_code": 7 }))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArguments { .. }));

    let err = publisher
        .invoke("/shelf", "count_books", &json!({ "shelf_code": "Z9" }))
        .unwrap_err();
    assert!(matches!(err, Error::Invocation { .. }));
    assert!(err.is_user_facing());
}

#[test]
fn test_invoke_mutates_shared_state() {
    let library = Library::new();
    let mut publisher = Publisher::default();
    publisher.publish(library.clone()).unwrap();

    publisher
        .invoke("/library", "add_shelf", &json!({ "code": "C3" }))
        .unwrap();
    assert!(library.list_shelves().contains(&"C3".to_string()));

    let books = publisher
        .invoke("/shelf", "list_books", &json!({ "shelf_code": "C3" }))
        .unwrap();
    assert_eq!(books, json!([]));
}

#[test]
fn test_settings_through_publisher() {
    let mut publisher = Publisher::default();
    let settings = publisher.publish_settings().unwrap();

    publisher
        .invoke(
            "/publisher_config",
            "set_grid_padding",
            &json!({ "config": { "vertical": "6px" } }),
        )
        .unwrap();
    assert_eq!(settings.get_config("grid_cell_padding_vertical"), "6px");
    assert_eq!(settings.get_config("grid_cell_padding_horizontal"), "4px");

    let value = publisher
        .invoke("/publisher_config", "get_config", &json!({ "key": "unknown" }))
        .unwrap();
    assert_eq!(value, json!(""));

    assert!(Arc::strong_count(&settings) >= 2);
}
