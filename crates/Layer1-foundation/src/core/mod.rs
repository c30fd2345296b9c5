//! Core Module - 메타데이터 모델과 게시 인터페이스
//!
//! ## 구성
//!
//! - `types.rs`: 타입 설명자 (`TypeDesc`)
//! - `meta.rs`: 메서드/클래스 메타데이터 (`MethodMeta`, `ClassMeta`, `ApiDescriptor`)
//! - `catalog.rs`: 타입별 선언 캐시 (`apiready`)
//! - `traits.rs`: 게시 가능한 타입 인터페이스 (`ApiReady`)
//!
//! ## 흐름
//!
//! ```text
//! ┌──────────────────────┐   apiready::<T>()   ┌─────────────────────┐
//! │  impl ApiReady for T │ ──────────────────▶ │  ApiCatalog (1회)    │
//! └──────────┬───────────┘                     └──────────┬──────────┘
//!            │ children()                                 │ Arc<ApiDescriptor>
//!            ▼                                            ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Layer2 RegistryBuilder: 수집 → 검증 → 등록 (base path 기준)       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod meta;
pub mod traits;
pub mod types;

pub use catalog::{apiready, catalog, ApiCatalog};
pub use meta::{
    normalize_path, object_schema, ApiDescriptor, CallArgs, ClassMeta, HttpVerb, MethodMeta,
    ModelSchema, ParamMeta, ReturnMeta, Target, TargetSet, READ_PREFIXES,
};
pub use traits::{to_value, ApiReady};
pub use types::TypeDesc;
