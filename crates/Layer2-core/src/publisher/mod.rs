//! # Publisher
//!
//! 게시 가능한 인스턴스를 등록하고 REST/UI 생성기에 라우트와 탭 명세를 제공합니다.
//!
//! ```text
//! Publisher
//!   ├── config      PublisherConfig (host, port, 표면 on/off)
//!   ├── registry    ApiRegistry (base path -> 항목)
//!   │
//!   ├── rest_routes()  -> Vec<RouteSpec>   (등록 순서)
//!   ├── ui_tabs()      -> Vec<UiTab>       (표시 순서)
//!   └── invoke()       -> 인자 바인딩 후 인스턴스로 전달
//! ```
//!
//! ## 사용 예시
//!
//! ```ignore
//! let mut publisher = Publisher::new(PublisherConfig::load()?);
//! publisher.publish(Arc::new(Library::new()))?;
//! publisher.publish_settings()?;
//!
//! let result = publisher.invoke("/shelf", "count_books", &json!({"shelf_code": "A1"}))?;
//! ```

mod routes;
mod ui;

pub use routes::{rest_routes, ParamLocation, RouteSpec};
pub use ui::{ui_tabs, UiField, UiForm, UiTab, Widget};

use crate::registry::{ApiRegistry, PublishReport};
use crate::settings::PublisherSettings;
use genro_foundation::{normalize_path, ApiReady, Error, PublisherConfig, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 게시 진입점
#[derive(Debug)]
pub struct Publisher {
    config: PublisherConfig,
    registry: ApiRegistry,
}

impl Publisher {
    pub fn new(config: PublisherConfig) -> Self {
        info!(
            "Publisher initialized: {} v{} on {}",
            config.title,
            config.version,
            config.bind_address()
        );
        Self {
            config,
            registry: ApiRegistry::new(),
        }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    pub fn registry(&self) -> &ApiRegistry {
        &self.registry
    }

    // ========================================================================
    // 게시
    // ========================================================================

    /// 인스턴스와 하위 인스턴스를 모두 게시
    pub fn publish(&mut self, instance: Arc<dyn ApiReady>) -> Result<PublishReport> {
        let class_name = instance.descriptor().class_name().to_string();
        let report = self.registry.publish(instance).map_err(|e| {
            error!("Failed to publish {}: {}", class_name, e);
            e
        })?;

        if report.is_noop() {
            debug!("{} was already published", class_name);
        } else {
            info!(
                "Publishing {} ({} classes registered)",
                class_name,
                report.registered.len()
            );
        }
        Ok(report)
    }

    /// 여러 인스턴스 게시 (첫 에러에서 중단, 이전 게시는 유지)
    pub fn publish_all(
        &mut self,
        instances: impl IntoIterator<Item = Arc<dyn ApiReady>>,
    ) -> Result<Vec<PublishReport>> {
        instances
            .into_iter()
            .map(|instance| self.publish(instance))
            .collect()
    }

    /// UI 환경설정 클래스 게시
    pub fn publish_settings(&mut self) -> Result<Arc<PublisherSettings>> {
        let settings = Arc::new(PublisherSettings::new());
        self.publish(settings.clone())?;
        Ok(settings)
    }

    /// (클래스 이름, base path) - 등록 순서 (하위 클래스 포함)
    pub fn published_classes(&self) -> Vec<(String, String)> {
        self.registry.published_classes()
    }

    // ========================================================================
    // 생성기용 명세
    // ========================================================================

    /// REST 라우트 (REST 비활성화 시 빈 목록)
    pub fn rest_routes(&self) -> Vec<RouteSpec> {
        if !self.config.enable_rest {
            return Vec::new();
        }
        rest_routes(&self.registry)
    }

    /// UI 탭 (UI 비활성화 시 빈 목록)
    pub fn ui_tabs(&self) -> Vec<UiTab> {
        if !self.config.enable_ui {
            return Vec::new();
        }
        ui_tabs(&self.registry)
    }

    pub fn display_order(&self) -> Vec<String> {
        self.registry.display_order()
    }

    /// 모델 이름 -> JSON Schema (`#/components/schemas`)
    pub fn schemas(&self) -> BTreeMap<String, Value> {
        let mut schemas: BTreeMap<String, Value> = self
            .registry
            .models()
            .map(|m| (m.name.clone(), m.json_schema()))
            .collect();

        if self.config.enable_rest {
            for route in rest_routes(&self.registry) {
                if let Some(name) = &route.request_model {
                    schemas
                        .entry(name.clone())
                        .or_insert_with(|| route.request_schema());
                }
            }
        }
        schemas
    }

    // ========================================================================
    // 호출
    // ========================================================================

    /// 인자를 바인딩한 뒤 게시된 인스턴스로 그대로 전달
    pub fn invoke(&self, base_path: &str, method: &str, args: &Value) -> Result<Value> {
        let entry = self
            .registry
            .get(base_path)
            .ok_or_else(|| Error::ClassNotFound(normalize_path(base_path)))?;

        let registered = entry
            .find_method(method)
            .ok_or_else(|| Error::MethodNotFound {
                path: entry.base_path.clone(),
                method: method.to_string(),
            })?;

        let bound = registered.meta.bind(args)?;
        debug!("Invoking {}.{}", entry.class_name, method);

        entry.instance.invoke(method, &bound).map_err(|e| {
            error!("Error in {}: {}", method, e);
            e
        })
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(PublisherConfig::default())
    }
}
