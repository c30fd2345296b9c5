//! # genro-foundation
//!
//! Foundation layer for genro-api:
//! - Core: 메타데이터 모델 (MethodMeta, ClassMeta, TypeDesc) 및 ApiReady trait
//! - Catalog: 타입별 선언 캐시 (`apiready`)
//! - Config: Publisher 설정 (PublisherConfig)
//! - Storage: JsonStore (설정 파일)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  게시 가능한 타입 (impl ApiReady)                        │
//! │  ├── descriptor()  → apiready::<T>() (1회 선언)          │
//! │  ├── children()    → 하위 인스턴스 (계층)                 │
//! │  └── invoke()      → 메서드 호출 전달                     │
//! │                     │                                   │
//! │                     ▼                                   │
//! │          Layer2 Registry / Publisher                    │
//! │          ┌─────────┴─────────┐                         │
//! │          ▼                   ▼                         │
//! │     REST 생성기           UI 생성기                      │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core (메타데이터 모델 및 Trait)
// ============================================================================
pub use self::core::{
    // Catalog (catalog.rs)
    apiready,
    catalog,
    ApiCatalog,
    // Metadata (meta.rs)
    normalize_path,
    object_schema,
    ApiDescriptor,
    CallArgs,
    ClassMeta,
    HttpVerb,
    MethodMeta,
    ModelSchema,
    ParamMeta,
    ReturnMeta,
    Target,
    TargetSet,
    READ_PREFIXES,
    // Traits (traits.rs)
    to_value,
    ApiReady,
    // Types (types.rs)
    TypeDesc,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    PublisherConfig, PublisherConfigFile, ENV_HOST, ENV_PORT, ENV_TITLE, PUBLISHER_CONFIG_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{read_file, JsonStore};
