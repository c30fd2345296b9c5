//! Core Traits - 게시 가능한 타입의 인터페이스

use super::meta::{ApiDescriptor, CallArgs};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

/// 게시 가능한 타입 (REST/UI로 노출되는 객체)
///
/// 런타임 속성 스캔 대신 각 타입이 자신의 선언과 하위 인스턴스, 호출 테이블을
/// 직접 제공합니다. 메서드 호출은 감싸지 않고 `invoke`에서 그대로 전달됩니다.
///
/// ```rust,ignore
/// impl ApiReady for Library {
///     fn descriptor(&self) -> Arc<ApiDescriptor> {
///         apiready::<Self>(library_descriptor)
///     }
///
///     fn children(&self) -> Vec<Arc<dyn ApiReady>> {
///         vec![self.shelf.clone()]
///     }
///
///     fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
///         match method {
///             "list_shelves" => to_value(self.list_shelves()),
///             "add_shelf" => to_value(self.add_shelf(args.get("code")?, args.get("name")?)?),
///             _ => Err(Error::invocation(method, "not dispatched")),
///         }
///     }
/// }
/// ```
pub trait ApiReady: Send + Sync {
    /// 클래스/메서드 선언 (보통 `apiready::<Self>(...)`)
    fn descriptor(&self) -> Arc<ApiDescriptor>;

    /// 하위 게시 인스턴스 (계층 구조)
    fn children(&self) -> Vec<Arc<dyn ApiReady>> {
        Vec::new()
    }

    /// 메서드 호출
    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value>;
}

/// 반환값 직렬화 헬퍼 (`invoke` 구현용)
pub fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
