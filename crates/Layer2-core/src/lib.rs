//! genro-core: Core Runtime for genro-api
//!
//! Layer2 - 등록/표시 순서/게시 레이어
//!
//! # 주요 모듈
//!
//! - `registry`: base path 기준 레지스트리 (2단계 등록, 표시 순서)
//! - `publisher`: Publisher (REST 라우트, UI 탭, 호출 전달)
//! - `settings`: UI 환경설정 클래스 (PublisherConfig 탭)
//!
//! # 사용 예시
//!
//! ```ignore
//! use genro_core::{Publisher, PublisherConfig};
//!
//! let mut publisher = Publisher::new(PublisherConfig::default());
//! publisher.publish(Arc::new(Library::new()))?;
//! publisher.publish_settings()?;
//!
//! for route in publisher.rest_routes() {
//!     println!("{} {}", route.verb, route.path);
//! }
//!
//! for tab in publisher.ui_tabs() {
//!     println!("{}{}", "  ".repeat(tab.depth), tab.label);
//! }
//! ```

pub mod publisher;
pub mod registry;
pub mod settings;

// Re-exports: Registry
pub use registry::{
    display_order, is_configuration, ApiRegistry, PublishReport, RegisteredMethod,
    RegistryBuilder, RegistryEntry, RegistryStats, CONFIGURATION_MARKER,
};

// Re-exports: Publisher
pub use publisher::{
    ParamLocation, Publisher, RouteSpec, UiField, UiForm, UiTab, Widget,
};

// Re-exports: Settings
pub use settings::{
    DialogSizeConfig, GridPaddingConfig, PublisherSettings, SettingEntry, SettingUpdate,
    SETTINGS_BASE_PATH, SETTINGS_DEFAULTS,
};

// Re-exports from Layer1
pub use genro_foundation::{
    apiready, to_value, ApiDescriptor, ApiReady, CallArgs, ClassMeta, Error, HttpVerb,
    MethodMeta, ModelSchema, ParamMeta, PublisherConfig, Result, ReturnMeta, Target, TargetSet,
    TypeDesc, READ_PREFIXES,
};
