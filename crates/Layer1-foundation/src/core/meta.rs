//! API Metadata - 메서드/클래스 메타데이터 정의
//!
//! 선언 시점에 한 번 만들어지고 이후에는 변경되지 않는 레코드들입니다.
//!
//! ## 선언 예시
//!
//! ```rust,ignore
//! let meta = MethodMeta::new("list_books")
//!     .description("List all books on a shelf")
//!     .param(ParamMeta::new("shelf_code", TypeDesc::Str).describe("Shelf code"))
//!     .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::model("Book"))));
//!
//! assert_eq!(meta.verb(), HttpVerb::Get);   // list* -> GET
//! assert_eq!(meta.path(), "/list_books");
//! ```

use super::types::TypeDesc;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// 읽기 동사로 추론되는 메서드 이름 접두사
pub const READ_PREFIXES: [&str; 3] = ["read", "get", "list"];

// ============================================================================
// HttpVerb
// ============================================================================

/// HTTP 동사
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    /// 이름 기반 동사 추론
    ///
    /// `read`/`get`/`list`로 시작하면 GET, 나머지는 POST
    pub fn infer(method_name: &str) -> Self {
        if READ_PREFIXES
            .iter()
            .any(|prefix| method_name.starts_with(prefix))
        {
            Self::Get
        } else {
            Self::Post
        }
    }

    /// 읽기 동사 여부 (파라미터가 query string으로 전달됨)
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::InvalidMetadata(format!("unknown HTTP verb: {}", other))),
        }
    }
}

// ============================================================================
// Target / TargetSet
// ============================================================================

/// 노출 대상 (REST 생성기 / UI 생성기)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Rest,
    Ui,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Ui => write!(f, "ui"),
        }
    }
}

/// 노출 대상 집합 (기본값: 둘 다)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet {
    rest: bool,
    ui: bool,
}

impl TargetSet {
    pub fn both() -> Self {
        Self {
            rest: true,
            ui: true,
        }
    }

    pub fn rest_only() -> Self {
        Self {
            rest: true,
            ui: false,
        }
    }

    pub fn ui_only() -> Self {
        Self {
            rest: false,
            ui: true,
        }
    }

    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Rest => self.rest,
            Target::Ui => self.ui,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.rest && !self.ui
    }

    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        [Target::Rest, Target::Ui]
            .into_iter()
            .filter(move |t| self.contains(*t))
    }
}

impl Default for TargetSet {
    fn default() -> Self {
        Self::both()
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut set = Self {
            rest: false,
            ui: false,
        };
        for target in iter {
            match target {
                Target::Rest => set.rest = true,
                Target::Ui => set.ui = true,
            }
        }
        set
    }
}

// ============================================================================
// ParamMeta / ReturnMeta / ModelSchema
// ============================================================================

/// 파라미터 설명자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDesc,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: String,
}

impl ParamMeta {
    /// 새 파라미터 (`Optional` 타입이면 기본값 `null`로 선택 항목)
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        let optional = matches!(ty, TypeDesc::Optional(_) | TypeDesc::Null);
        Self {
            name: name.into(),
            ty,
            required: !optional,
            default: optional.then_some(Value::Null),
            description: String::new(),
        }
    }

    /// 어노테이션 문자열로 선언 (`"int | None"` 등)
    pub fn annotated(name: impl Into<String>, annotation: &str) -> Self {
        Self::new(name, TypeDesc::annotation(annotation))
    }

    pub fn describe(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// 기본값 설정 (선택 파라미터가 됨)
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }
}

/// 반환 타입 설명자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMeta {
    #[serde(rename = "type")]
    pub ty: TypeDesc,
    #[serde(default)]
    pub description: String,
}

impl ReturnMeta {
    pub fn new(ty: TypeDesc) -> Self {
        Self {
            ty,
            description: String::new(),
        }
    }

    pub fn describe(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

impl Default for ReturnMeta {
    fn default() -> Self {
        Self::new(TypeDesc::Any)
    }
}

/// 이름 있는 요청/응답 모델 (필드 목록)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<ParamMeta>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn describe(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn field(mut self, field: ParamMeta) -> Self {
        self.fields.push(field);
        self
    }

    /// JSON Schema (object)
    pub fn json_schema(&self) -> Value {
        object_schema(&self.fields, &self.description)
    }
}

/// 파라미터 목록 -> JSON Schema object
pub fn object_schema(fields: &[ParamMeta], description: &str) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut schema = field.ty.json_schema();
        if let Some(obj) = schema.as_object_mut() {
            if !field.description.is_empty() {
                obj.insert(
                    "description".to_string(),
                    Value::String(field.description.clone()),
                );
            }
            if let Some(default) = &field.default {
                obj.insert("default".to_string(), default.clone());
            }
        }
        properties.insert(field.name.clone(), schema);
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    if !description.is_empty() {
        schema.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
    }
    schema.insert("properties".to_string(), Value::Object(properties));
    schema.insert("required".to_string(), Value::Array(required));
    Value::Object(schema)
}

// ============================================================================
// MethodMeta
// ============================================================================

/// 노출 메서드 메타데이터 레코드
///
/// 빌더 메서드로 한 번 구성한 뒤 `Arc`로 공유되며, 이후에는 읽기 전용입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMeta {
    name: String,
    verb: HttpVerb,
    path: String,
    params: Vec<ParamMeta>,
    returns: ReturnMeta,
    targets: TargetSet,
    description: String,
    /// 동사를 명시적으로 지정했는지 여부
    explicit_verb: bool,
}

impl MethodMeta {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            verb: HttpVerb::infer(&name),
            path: format!("/{}", name),
            params: Vec::new(),
            returns: ReturnMeta::default(),
            targets: TargetSet::both(),
            description: String::new(),
            explicit_verb: false,
            name,
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// 동사 명시 (추론보다 우선)
    pub fn verb(mut self, verb: HttpVerb) -> Self {
        self.verb = verb;
        self.explicit_verb = true;
        self
    }

    /// 경로 명시 (기본값: `/<name>`)
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = normalize_path(&path.into());
        self
    }

    pub fn param(mut self, param: ParamMeta) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: Vec<ParamMeta>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn returns(mut self, returns: ReturnMeta) -> Self {
        self.returns = returns;
        self
    }

    pub fn targets(mut self, targets: TargetSet) -> Self {
        self.targets = targets;
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn http_verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn has_explicit_verb(&self) -> bool {
        self.explicit_verb
    }

    pub fn endpoint_path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &[ParamMeta] {
        &self.params
    }

    pub fn return_meta(&self) -> &ReturnMeta {
        &self.returns
    }

    pub fn target_set(&self) -> TargetSet {
        self.targets
    }

    pub fn exposed_to(&self, target: Target) -> bool {
        self.targets.contains(target)
    }

    pub fn doc(&self) -> &str {
        &self.description
    }

    /// 비공개 멤버 (`_` 접두사) 여부
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }

    /// 요청 모델 이름 (`Library` + `list_books` -> `Library_List_BooksRequest`)
    ///
    /// 클래스마다 같은 메서드 이름이 있을 수 있으므로 클래스 이름을 앞에 붙입니다.
    pub fn request_model_name(&self, class_name: &str) -> String {
        format!("{}_{}Request", class_name, title_case(&self.name))
    }

    /// 요청 JSON Schema (object)
    pub fn request_schema(&self) -> Value {
        object_schema(&self.params, "")
    }

    /// 참조하는 모든 모델 이름 (파라미터 + 반환)
    pub fn referenced_models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .params
            .iter()
            .flat_map(|p| p.ty.model_names())
            .chain(self.returns.ty.model_names())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// 파싱되지 않은 어노테이션 (첫 번째)
    pub fn unknown_annotation(&self) -> Option<&str> {
        self.params
            .iter()
            .map(|p| &p.ty)
            .chain(std::iter::once(&self.returns.ty))
            .find_map(|ty| ty.unknown_annotation())
    }

    // ========================================================================
    // Argument binding
    // ========================================================================

    /// 호출 인자 검증 및 기본값 채우기
    ///
    /// `null`이나 빈 객체는 "인자 없음"으로 처리합니다.
    /// 선언되지 않은 키는 무시됩니다.
    pub fn bind(&self, args: &Value) -> Result<CallArgs> {
        let empty = Map::new();
        let provided = match args {
            Value::Null => &empty,
            Value::Object(obj) => obj,
            other => {
                return Err(Error::invalid_arguments(
                    &self.name,
                    format!("expected a JSON object, got {}", json_kind(other)),
                ))
            }
        };

        for key in provided.keys() {
            if !self.params.iter().any(|p| &p.name == key) {
                debug!("Ignoring undeclared argument '{}' for {}", key, self.name);
            }
        }

        let mut bound = Map::new();
        for param in &self.params {
            match provided.get(&param.name) {
                Some(value) => {
                    if !param.ty.accepts(value) {
                        return Err(Error::invalid_arguments(
                            &self.name,
                            format!(
                                "'{}' expects {}, got {}",
                                param.name,
                                param.ty,
                                json_kind(value)
                            ),
                        ));
                    }
                    bound.insert(param.name.clone(), value.clone());
                }
                None if param.required => {
                    return Err(Error::invalid_arguments(
                        &self.name,
                        format!("missing required argument '{}'", param.name),
                    ));
                }
                None => {
                    bound.insert(
                        param.name.clone(),
                        param.default.clone().unwrap_or(Value::Null),
                    );
                }
            }
        }

        Ok(CallArgs {
            method: self.name.clone(),
            values: bound,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 단어 첫 글자만 대문자, 나머지는 소문자 (`getURL` -> `Geturl`, `v2api` -> `V2Api`)
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}

/// 경로 정규화: 앞에 `/` 하나, 끝의 `/` 제거
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed)
}

// ============================================================================
// CallArgs
// ============================================================================

/// 바인딩된 호출 인자
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    method: String,
    values: Map<String, Value>,
}

impl CallArgs {
    /// 검증 없이 직접 구성 (테스트/내부 호출용)
    pub fn from_map(method: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            values,
        }
    }

    /// 필수 인자 추출
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.values.get(name).ok_or_else(|| {
            Error::invalid_arguments(&self.method, format!("missing argument '{}'", name))
        })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            Error::invalid_arguments(&self.method, format!("argument '{}': {}", name, e))
        })
    }

    /// 선택 인자 추출 (`null`/없음 -> None)
    pub fn get_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.values.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(name).map(Some),
        }
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

// ============================================================================
// ClassMeta / ApiDescriptor
// ============================================================================

/// 클래스 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl ClassMeta {
    /// base path 없이 생성 (게시 시점에 검증됨)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_path: None,
            description: String::new(),
        }
    }

    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(normalize_path(&path.into()));
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// 클래스 하나의 전체 선언 (클래스 메타 + 메서드 + 모델)
#[derive(Debug, Clone)]
pub struct ApiDescriptor {
    pub class: ClassMeta,
    pub methods: Vec<Arc<MethodMeta>>,
    pub models: Vec<ModelSchema>,
}

impl ApiDescriptor {
    pub fn new(class: ClassMeta) -> Self {
        Self {
            class,
            methods: Vec::new(),
            models: Vec::new(),
        }
    }

    pub fn method(mut self, meta: MethodMeta) -> Self {
        self.methods.push(Arc::new(meta));
        self
    }

    pub fn model(mut self, model: ModelSchema) -> Self {
        self.models.push(model);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    pub fn base_path(&self) -> Option<&str> {
        self.class.base_path.as_deref()
    }

    pub fn find_method(&self, name: &str) -> Option<&Arc<MethodMeta>> {
        self.methods.iter().find(|m| m.name() == name)
    }
}
