//! # API Registry
//!
//! 게시된 클래스를 base path 기준으로 보관하는 레지스트리
//!
//! ## 개요
//!
//! `publish`는 루트 인스턴스와 그 하위 인스턴스를 모두 등록합니다.
//! 시작 단계에서 한 번 채워지고, 이후 REST/UI 생성기가 읽기 전용으로 사용합니다.
//!
//! ## 등록 단계
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  publish(root)                                               │
//! │    │                                                         │
//! │    ▼                                                         │
//! │  RegistryBuilder::collect   (깊이 우선, 방문 집합 = base path)│
//! │    ├── base path 검증       MissingBasePath / Duplicate      │
//! │    ├── 메서드 분류           REST / UI / 비공개(`_`) 제외      │
//! │    └── 타입 해석             UnresolvedType                  │
//! │    │                                                         │
//! │    ▼  (모두 통과한 경우에만)                                   │
//! │  ApiRegistry::commit        항목 + 모델 반영                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용 예시
//!
//! ```ignore
//! use genro_core::registry::ApiRegistry;
//!
//! let mut registry = ApiRegistry::new();
//! let report = registry.publish(Arc::new(Library::new()))?;
//!
//! for (path, methods) in registry.rest_listing() {
//!     println!("{}: {} methods", path, methods.len());
//! }
//!
//! // UI 탭 순서 (설정 클래스는 마지막)
//! let order = registry.display_order();
//! ```

mod builder;
mod entry;
mod order;
mod published;

pub use builder::{CollectedBatch, RegistryBuilder};
pub use entry::{join_path, same_instance, RegisteredMethod, RegistryEntry};
pub use order::{display_order, is_configuration, CONFIGURATION_MARKER};
pub use published::{ApiRegistry, PublishReport, RegistryStats};
