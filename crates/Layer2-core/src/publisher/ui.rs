//! UI Tabs - UI 생성기가 소비하는 탭/폼 명세

use crate::registry::{ApiRegistry, RegisteredMethod, RegistryEntry};
use genro_foundation::{HttpVerb, ParamMeta, TypeDesc};
use serde::Serialize;
use serde_json::Value;

/// 입력 위젯 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Text,
    Integer,
    Number,
    Checkbox,
    /// 목록/객체/모델 (JSON 편집기)
    Json,
}

impl Widget {
    pub fn for_type(ty: &TypeDesc) -> Self {
        match ty {
            TypeDesc::Str => Self::Text,
            TypeDesc::Int => Self::Integer,
            TypeDesc::Float => Self::Number,
            TypeDesc::Bool => Self::Checkbox,
            TypeDesc::Optional(inner) => Self::for_type(inner),
            _ => Self::Json,
        }
    }
}

/// 폼 입력 필드
#[derive(Debug, Clone, Serialize)]
pub struct UiField {
    pub name: String,
    pub widget: Widget,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub label: String,
}

impl UiField {
    pub fn from_param(param: &ParamMeta) -> Self {
        let label = if param.description.is_empty() {
            humanize(&param.name)
        } else {
            param.description.clone()
        };
        Self {
            name: param.name.clone(),
            widget: Widget::for_type(&param.ty),
            required: param.required,
            default: param.default.clone(),
            label,
        }
    }
}

/// 메서드 하나에 대한 폼
#[derive(Debug, Clone, Serialize)]
pub struct UiForm {
    pub name: String,
    pub title: String,
    pub description: String,
    pub verb: HttpVerb,
    pub path: String,
    pub fields: Vec<UiField>,
    pub returns: TypeDesc,
}

impl UiForm {
    pub fn from_method(method: &RegisteredMethod) -> Self {
        let meta = &method.meta;
        Self {
            name: meta.name().to_string(),
            title: humanize(meta.name()),
            description: meta.doc().to_string(),
            verb: meta.http_verb(),
            path: method.full_path.clone(),
            fields: meta.parameters().iter().map(UiField::from_param).collect(),
            returns: meta.return_meta().ty.clone(),
        }
    }
}

/// 클래스 하나에 대한 탭
#[derive(Debug, Clone, Serialize)]
pub struct UiTab {
    pub base_path: String,
    pub class_name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// 등록된 조상 개수 (들여쓰기)
    pub depth: usize,
    pub forms: Vec<UiForm>,
}

impl UiTab {
    pub fn from_entry(entry: &RegistryEntry, depth: usize) -> Self {
        Self {
            base_path: entry.base_path.clone(),
            class_name: entry.class_name.clone(),
            label: entry.class_name.clone(),
            parent: entry.parent.clone(),
            depth,
            forms: entry.ui_methods.iter().map(UiForm::from_method).collect(),
        }
    }
}

/// 표시 순서대로 모든 UI 탭
pub fn ui_tabs(registry: &ApiRegistry) -> Vec<UiTab> {
    registry
        .display_order()
        .iter()
        .filter_map(|path| registry.get(path))
        .map(|entry| UiTab::from_entry(entry, registry.depth_of(&entry.base_path)))
        .collect()
}

/// `shelf_code` -> `Shelf code`
fn humanize(name: &str) -> String {
    let text = name.trim_matches('_').replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_for_type() {
        assert_eq!(Widget::for_type(&TypeDesc::Str), Widget::Text);
        assert_eq!(
            Widget::for_type(&TypeDesc::optional(TypeDesc::Int)),
            Widget::Integer
        );
        assert_eq!(Widget::for_type(&TypeDesc::model("Book")), Widget::Json);
        assert_eq!(Widget::for_type(&TypeDesc::list(TypeDesc::Str)), Widget::Json);
    }

    #[test]
    fn test_field_label() {
        let field = UiField::from_param(&ParamMeta::new("shelf_code", TypeDesc::Str));
        assert_eq!(field.label, "Shelf code");
        assert!(field.required);

        let field = UiField::from_param(
            &ParamMeta::new("to_page", TypeDesc::optional(TypeDesc::Int)).describe("Last page"),
        );
        assert_eq!(field.label, "Last page");
        assert!(!field.required);
        assert_eq!(field.default, Some(Value::Null));
    }
}
