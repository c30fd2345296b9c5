//! Type Descriptors - 파라미터/반환 타입의 명시적 스키마 표현
//!
//! 런타임 타입 힌트 조회 대신, 게시 가능한 타입이 직접 `TypeDesc`를 제공합니다.
//! 문자열 어노테이션(`"list[str]"`, `"int | None"`, `"Book"` 등)으로도 선언할 수 있으며,
//! 직렬화 시에는 같은 어노테이션 문자열로 표현됩니다.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// 파라미터/반환 타입 설명자
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    /// 임의 값
    Any,
    Str,
    Int,
    Float,
    Bool,
    /// 값 없음 (`None`)
    Null,
    List(Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
    /// `T | None`
    Optional(Box<TypeDesc>),
    /// 이름으로 참조하는 모델 (등록 시점에 해석됨)
    Model(String),
    /// 파싱할 수 없었던 어노테이션 - 등록 시점에 거부됨
    Unknown(String),
}

impl TypeDesc {
    pub fn list(item: TypeDesc) -> Self {
        Self::List(Box::new(item))
    }

    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: TypeDesc) -> Self {
        match inner {
            // Optional[Optional[T]] == Optional[T]
            Self::Optional(_) | Self::Null | Self::Any => inner,
            other => Self::Optional(Box::new(other)),
        }
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    /// 어노테이션 문자열 해석 (실패 시 `Unknown`으로 보관)
    ///
    /// 선언 시점에는 실패하지 않고, 등록 시점에 어떤 메서드의 어노테이션인지와
    /// 함께 에러로 보고됩니다.
    pub fn annotation(raw: &str) -> Self {
        raw.parse()
            .unwrap_or_else(|_| Self::Unknown(raw.trim().to_string()))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Null | Self::Any)
    }

    /// 참조하는 모델 이름들
    pub fn model_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_models(&mut names);
        names
    }

    fn collect_models<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Model(name) => out.push(name),
            Self::List(item) | Self::Optional(item) => item.collect_models(out),
            Self::Map(key, value) => {
                key.collect_models(out);
                value.collect_models(out);
            }
            _ => {}
        }
    }

    /// 해석되지 않은 어노테이션 (파싱 실패 항목)
    pub fn unknown_annotation(&self) -> Option<&str> {
        match self {
            Self::Unknown(raw) => Some(raw),
            Self::List(item) | Self::Optional(item) => item.unknown_annotation(),
            Self::Map(key, value) => key.unknown_annotation().or_else(|| value.unknown_annotation()),
            _ => None,
        }
    }

    /// JSON Schema 조각 생성 (모델은 `$ref`)
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Any | Self::Unknown(_) => json!({}),
            Self::Str => json!({ "type": "string" }),
            Self::Int => json!({ "type": "integer" }),
            Self::Float => json!({ "type": "number" }),
            Self::Bool => json!({ "type": "boolean" }),
            Self::Null => json!({ "type": "null" }),
            Self::List(item) => json!({ "type": "array", "items": item.json_schema() }),
            Self::Map(_, value) => json!({
                "type": "object",
                "additionalProperties": value.json_schema()
            }),
            Self::Optional(inner) => {
                let mut schema = inner.json_schema();
                if let Some(obj) = schema.as_object_mut() {
                    obj.insert("nullable".to_string(), Value::Bool(true));
                }
                schema
            }
            Self::Model(name) => json!({ "$ref": format!("#/components/schemas/{}", name) }),
        }
    }

    /// 호출 인자가 이 타입에 맞는지 얕게 검사
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any | Self::Unknown(_) => true,
            Self::Str => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Null => value.is_null(),
            Self::List(item) => value
                .as_array()
                .map(|items| items.iter().all(|v| item.accepts(v)))
                .unwrap_or(false),
            Self::Map(_, inner) => value
                .as_object()
                .map(|obj| obj.values().all(|v| inner.accepts(v)))
                .unwrap_or(false),
            Self::Optional(inner) => value.is_null() || inner.accepts(value),
            Self::Model(_) => value.is_object(),
        }
    }
}

impl Default for TypeDesc {
    fn default() -> Self {
        Self::Any
    }
}

// ============================================================================
// 어노테이션 문자열 <-> TypeDesc
// ============================================================================

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Str => write!(f, "str"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
            Self::Null => write!(f, "None"),
            Self::List(item) => write!(f, "list[{}]", item),
            Self::Map(key, value) => write!(f, "dict[{}, {}]", key, value),
            Self::Optional(inner) => write!(f, "{} | None", inner),
            Self::Model(name) => write!(f, "{}", name),
            Self::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

impl FromStr for TypeDesc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_union(s.trim())
    }
}

fn syntax_error(raw: &str, reason: &str) -> Error {
    Error::InvalidMetadata(format!("cannot parse type annotation '{}': {}", raw, reason))
}

/// 최상위 `,` 또는 `|` 기준으로 분리 (괄호 안은 무시)
fn split_top_level(s: &str, sep: char) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            c if c == sep && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    parts.push(s[start..].trim());
    Some(parts)
}

fn parse_union(raw: &str) -> Result<TypeDesc> {
    let parts = split_top_level(raw, '|').ok_or_else(|| syntax_error(raw, "unbalanced brackets"))?;

    if parts.len() == 1 {
        return parse_atom(parts[0]);
    }

    let mut non_null = Vec::new();
    let mut has_null = false;
    for part in parts {
        match parse_atom(part)? {
            TypeDesc::Null => has_null = true,
            other => non_null.push(other),
        }
    }

    match (non_null.len(), has_null) {
        (1, true) => Ok(TypeDesc::optional(non_null.remove(0))),
        (0, true) => Ok(TypeDesc::Null),
        _ => Err(syntax_error(raw, "unions other than `T | None` are not supported")),
    }
}

fn parse_atom(raw: &str) -> Result<TypeDesc> {
    // 전방 참조 ("'Book'", "\"Book\"")
    let raw = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    if raw.is_empty() {
        return Err(syntax_error(raw, "empty annotation"));
    }

    let (head, args) = match raw.find('[') {
        Some(open) => {
            if !raw.ends_with(']') {
                return Err(syntax_error(raw, "trailing characters after ']'"));
            }
            let inner = &raw[open + 1..raw.len() - 1];
            let args = split_top_level(inner, ',')
                .ok_or_else(|| syntax_error(raw, "unbalanced brackets"))?;
            (raw[..open].trim(), Some(args))
        }
        None => (raw, None),
    };

    let ty = match (head, args.as_deref()) {
        ("str" | "string", None) => TypeDesc::Str,
        ("int", None) => TypeDesc::Int,
        ("float", None) => TypeDesc::Float,
        ("bool", None) => TypeDesc::Bool,
        ("None" | "NoneType", None) => TypeDesc::Null,
        ("Any" | "any" | "object", None) => TypeDesc::Any,
        ("list" | "List", None) => TypeDesc::list(TypeDesc::Any),
        ("dict" | "Dict", None) => TypeDesc::map(TypeDesc::Str, TypeDesc::Any),
        ("list" | "List", Some([item])) => TypeDesc::list(parse_union(item)?),
        ("dict" | "Dict", Some([key, value])) => {
            TypeDesc::map(parse_union(key)?, parse_union(value)?)
        }
        ("Optional", Some([inner])) => TypeDesc::optional(parse_union(inner)?),
        (_, Some(_)) => return Err(syntax_error(raw, "unsupported generic")),
        (name, None) => {
            if !is_identifier(name) {
                return Err(syntax_error(raw, "not an identifier"));
            }
            TypeDesc::Model(name.to_string())
        }
    };

    Ok(ty)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

impl Serialize for TypeDesc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDesc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::annotation(&raw))
    }
}
