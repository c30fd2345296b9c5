//! REST Routes - REST 생성기가 소비하는 라우트 명세

use crate::registry::{ApiRegistry, RegisteredMethod, RegistryEntry};
use genro_foundation::{object_schema, HttpVerb, ParamMeta, ReturnMeta};
use serde::Serialize;
use serde_json::{json, Value};

/// 파라미터 전달 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// 쿼리 문자열 (GET)
    Query,
    /// JSON 본문 (GET 이외)
    Body,
}

impl ParamLocation {
    pub fn for_verb(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => Self::Query,
            HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch | HttpVerb::Delete => Self::Body,
        }
    }
}

/// 라우트 하나의 명세
#[derive(Debug, Clone, Serialize)]
pub struct RouteSpec {
    /// 그룹 태그 (클래스 이름)
    pub tag: String,
    pub base_path: String,
    /// 메서드 이름 (operation id)
    pub name: String,
    pub verb: HttpVerb,
    /// 전체 경로 (`/library/list_books`)
    pub path: String,
    pub summary: String,
    pub description: String,
    pub params: Vec<ParamMeta>,
    pub returns: ReturnMeta,
    pub param_location: ParamLocation,
    /// 본문 요청 모델 이름 (파라미터가 있을 때만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_model: Option<String>,
}

impl RouteSpec {
    pub fn from_entry(entry: &RegistryEntry, method: &RegisteredMethod) -> Self {
        let meta = &method.meta;
        let verb = meta.http_verb();
        let description = meta.doc().to_string();
        let summary = description.lines().next().unwrap_or_default().trim().to_string();

        Self {
            tag: entry.class_name.clone(),
            base_path: entry.base_path.clone(),
            name: meta.name().to_string(),
            verb,
            path: method.full_path.clone(),
            summary,
            description,
            params: meta.parameters().to_vec(),
            returns: meta.return_meta().clone(),
            param_location: ParamLocation::for_verb(verb),
            request_model: (!meta.parameters().is_empty())
                .then(|| meta.request_model_name(&entry.class_name)),
        }
    }

    /// 요청 JSON Schema (object)
    pub fn request_schema(&self) -> Value {
        object_schema(&self.params, "")
    }

    /// 응답 JSON Schema
    pub fn response_schema(&self) -> Value {
        let mut schema = self.returns.ty.json_schema();
        if !self.returns.description.is_empty() {
            if let Value::Object(obj) = &mut schema {
                obj.insert("description".into(), json!(self.returns.description));
            }
        }
        schema
    }
}

/// 등록 순서대로 모든 REST 라우트
pub fn rest_routes(registry: &ApiRegistry) -> Vec<RouteSpec> {
    registry
        .entries()
        .flat_map(|entry| {
            entry
                .rest_methods
                .iter()
                .map(move |method| RouteSpec::from_entry(entry, method))
        })
        .collect()
}
