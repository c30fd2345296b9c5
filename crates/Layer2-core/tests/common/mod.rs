//! 통합 테스트 공용 픽스처
//!
//! - `Library` / `ShelfManager`: `apiready`로 선언하는 일반적인 게시 클래스
//! - `Node`: 인스턴스마다 선언을 들고 있는 그래프 노드 (다이아몬드/순환 구성용)

#![allow(dead_code)]

use genro_core::{
    apiready, to_value, ApiDescriptor, ApiReady, CallArgs, ClassMeta, Error, HttpVerb,
    MethodMeta, ModelSchema, ParamMeta, Result, ReturnMeta, TargetSet, TypeDesc,
};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// ShelfManager
// ============================================================================

pub struct ShelfManager {
    shelves: Arc<RwLock<BTreeMap<String, Vec<String>>>>,
}

impl ShelfManager {
    pub fn list_books(&self, shelf_code: &str) -> Result<Vec<String>> {
        self.shelves
            .read()
            .get(shelf_code)
            .cloned()
            .ok_or_else(|| Error::invocation("list_books", format!("Shelf {} not found", shelf_code)))
    }

    pub fn count_books(&self, shelf_code: &str) -> Result<usize> {
        self.list_books(shelf_code).map(|books| books.len())
    }
}

fn shelf_descriptor() -> ApiDescriptor {
    ApiDescriptor::new(
        ClassMeta::new("ShelfManager")
            .base_path("/shelf")
            .description("Manages books on a shelf"),
    )
    .method(
        MethodMeta::new("list_books")
            .description("List all books on a shelf.")
            .param(ParamMeta::new("shelf_code", TypeDesc::Str).describe("Shelf code"))
            .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::Str))),
    )
    .method(
        MethodMeta::new("count_books")
            .description("Count books on a shelf.")
            .param(ParamMeta::new("shelf_code", TypeDesc::Str))
            .returns(ReturnMeta::new(TypeDesc::Int)),
    )
}

impl ApiReady for ShelfManager {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        apiready::<Self>(shelf_descriptor)
    }

    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
        match method {
            "list_books" => to_value(self.list_books(&args.get::<String>("shelf_code")?)?),
            "count_books" => to_value(self.count_books(&args.get::<String>("shelf_code")?)?),
            other => Err(Error::invocation(other, "unknown method")),
        }
    }
}

// ============================================================================
// Library
// ============================================================================

pub struct Library {
    shelves: Arc<RwLock<BTreeMap<String, Vec<String>>>>,
    pub shelf: Arc<ShelfManager>,
}

impl Library {
    pub fn new() -> Arc<Self> {
        let mut seed = BTreeMap::new();
        seed.insert(
            "A1".to_string(),
            vec!["Dune".to_string(), "Foundation".to_string()],
        );
        seed.insert("B2".to_string(), vec!["Emma".to_string()]);
        let shelves = Arc::new(RwLock::new(seed));

        Arc::new(Self {
            shelf: Arc::new(ShelfManager {
                shelves: Arc::clone(&shelves),
            }),
            shelves,
        })
    }

    pub fn list_shelves(&self) -> Vec<String> {
        self.shelves.read().keys().cloned().collect()
    }

    pub fn add_shelf(&self, code: &str) -> Result<Value> {
        let mut shelves = self.shelves.write();
        if shelves.contains_key(code) {
            return Err(Error::invocation(
                "add_shelf",
                format!("Shelf with code {} already exists", code),
            ));
        }
        shelves.insert(code.to_string(), Vec::new());
        Ok(json!({ "code": code }))
    }

    pub fn read_book(&self, title: &str, from_page: i64, to_page: Option<i64>) -> String {
        match to_page {
            Some(to) => format!("{} pages {}-{}", title, from_page, to),
            None => format!("{} from page {}", title, from_page),
        }
    }
}

fn library_descriptor() -> ApiDescriptor {
    ApiDescriptor::new(
        ClassMeta::new("Library")
            .base_path("/library")
            .description("Library management"),
    )
    .model(
        ModelSchema::new("Book")
            .field(ParamMeta::new("title", TypeDesc::Str))
            .field(ParamMeta::new("pages", TypeDesc::Int)),
    )
    .method(
        MethodMeta::new("list_shelves").returns(ReturnMeta::new(TypeDesc::list(TypeDesc::Str))),
    )
    .method(
        MethodMeta::new("add_shelf")
            .param(ParamMeta::new("code", TypeDesc::Str))
            .param(ParamMeta::new("name", TypeDesc::Str).default("")),
    )
    .method(
        MethodMeta::new("read_book")
            .param(ParamMeta::new("title", TypeDesc::Str))
            .param(ParamMeta::new("from_page", TypeDesc::Int).default(1))
            .param(ParamMeta::annotated("to_page", "int | None"))
            .returns(ReturnMeta::new(TypeDesc::Str)),
    )
    .method(
        MethodMeta::new("get_book")
            .param(ParamMeta::new("title", TypeDesc::Str))
            .returns(ReturnMeta::new(TypeDesc::model("Book"))),
    )
    .method(
        MethodMeta::new("delete_shelf")
            .verb(HttpVerb::Delete)
            .param(ParamMeta::new("code", TypeDesc::Str)),
    )
    .method(MethodMeta::new("get_stats").targets(TargetSet::rest_only()))
    .method(MethodMeta::new("get_genres").targets(TargetSet::ui_only()))
    .method(MethodMeta::new("_rebuild_index"))
}

impl ApiReady for Library {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        apiready::<Self>(library_descriptor)
    }

    fn children(&self) -> Vec<Arc<dyn ApiReady>> {
        vec![self.shelf.clone() as Arc<dyn ApiReady>]
    }

    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
        match method {
            "list_shelves" => to_value(self.list_shelves()),
            "add_shelf" => self.add_shelf(&args.get::<String>("code")?),
            "read_book" => to_value(self.read_book(
                &args.get::<String>("title")?,
                args.get("from_page")?,
                args.get_opt("to_page")?,
            )),
            "get_stats" => to_value(json!({ "shelves": self.shelves.read().len() })),
            "get_genres" => to_value(vec!["Science Fiction"]),
            other => Err(Error::invocation(other, "not implemented")),
        }
    }
}

// ============================================================================
// Node - 그래프 구성용
// ============================================================================

pub struct Node {
    descriptor: Arc<ApiDescriptor>,
    children: Mutex<Vec<Arc<dyn ApiReady>>>,
}

impl Node {
    pub fn new(class_name: &str, base_path: &str) -> Arc<Self> {
        Self::with(
            ApiDescriptor::new(ClassMeta::new(class_name).base_path(base_path))
                .method(MethodMeta::new("get_info")),
        )
    }

    pub fn with(descriptor: ApiDescriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor: Arc::new(descriptor),
            children: Mutex::new(Vec::new()),
        })
    }

    /// base path 없는 클래스
    pub fn unrooted(class_name: &str) -> Arc<Self> {
        Self::with(ApiDescriptor::new(ClassMeta::new(class_name)))
    }

    pub fn adopt(&self, child: Arc<dyn ApiReady>) {
        self.children.lock().push(child);
    }

    /// 순환 참조 해제
    pub fn release(&self) {
        self.children.lock().clear();
    }
}

impl ApiReady for Node {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        Arc::clone(&self.descriptor)
    }

    fn children(&self) -> Vec<Arc<dyn ApiReady>> {
        self.children.lock().clone()
    }

    fn invoke(&self, method: &str, _args: &CallArgs) -> Result<Value> {
        Ok(json!({ "class": self.descriptor.class_name(), "method": method }))
    }
}

/// /top -> (/left, /right) -> /bottom (같은 인스턴스)
pub fn diamond() -> Arc<Node> {
    let top = Node::new("Top", "/top");
    let left = Node::new("Left", "/left");
    let right = Node::new("Right", "/right");
    let bottom = Node::new("Bottom", "/bottom");

    left.adopt(bottom.clone());
    right.adopt(bottom);
    top.adopt(left);
    top.adopt(right);
    top
}
