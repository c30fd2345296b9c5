//! Error types for genro-api
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// genro-api 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 게시(publish) 관련
    // ========================================================================
    #[error(
        "Class {class} has no base path. Declare one with ClassMeta::base_path() before publishing it."
    )]
    MissingBasePath { class: String },

    #[error(
        "Base path '{path}' already published by {existing}; {incoming} cannot reuse it. Each published class must have a unique base path."
    )]
    DuplicateBasePath {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("Unresolved type '{annotation}' in {class}.{method}")]
    UnresolvedType {
        class: String,
        method: String,
        annotation: String,
    },

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    // ========================================================================
    // 호출 관련
    // ========================================================================
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Method not found: {path}/{method}")]
    MethodNotFound { path: String, method: String },

    #[error("Invalid arguments for {method}: {message}")]
    InvalidArguments { method: String, message: String },

    #[error("Invocation of {method} failed: {message}")]
    Invocation { method: String, message: String },

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 호출자(REST/UI 사용자)에게 그대로 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::ClassNotFound(_)
                | Error::MethodNotFound { .. }
                | Error::InvalidArguments { .. }
                | Error::Invocation { .. }
        )
    }

    /// 시작 단계에서 치명적인 에러인지 확인 (설정/등록 실패)
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::MissingBasePath { .. }
                | Error::DuplicateBasePath { .. }
                | Error::UnresolvedType { .. }
                | Error::InvalidMetadata(_)
        )
    }

    /// 인자 바인딩 에러 생성 헬퍼
    pub fn invalid_arguments(method: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArguments {
            method: method.into(),
            message: message.into(),
        }
    }

    /// 메서드 실행 에러 생성 헬퍼
    pub fn invocation(method: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Invocation {
            method: method.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_path_message_names_class() {
        let err = Error::MissingBasePath {
            class: "InvalidClass".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("InvalidClass"));
        assert!(msg.contains("base path"));
        assert!(err.is_startup_fatal());
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_helpers() {
        let err = Error::invalid_arguments("count_books", "missing 'shelf_code'");
        assert!(err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "Invalid arguments for count_books: missing 'shelf_code'"
        );
    }
}
