//! Publisher Config - 서버/표면 설정

use crate::storage::{read_file, JsonStore};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// 설정 파일명
pub const PUBLISHER_CONFIG_FILE: &str = "publisher.json";

/// 환경 변수 오버라이드
pub const ENV_HOST: &str = "GENRO_HOST";
pub const ENV_PORT: &str = "GENRO_PORT";
pub const ENV_TITLE: &str = "GENRO_TITLE";

// ============================================================================
// PublisherConfig
// ============================================================================

/// Publisher 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherConfig {
    /// 바인딩 호스트
    pub host: String,

    /// 바인딩 포트
    pub port: u16,

    /// API 제목 (문서 UI에 표시)
    pub title: String,

    /// API 버전
    pub version: String,

    /// REST 엔드포인트 노출
    pub enable_rest: bool,

    /// 관리 UI 노출
    pub enable_ui: bool,

    /// Swagger/Redoc 문서 노출
    pub enable_swagger: bool,

    /// 관리 UI 경로
    pub admin_path: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            title: "Genro API".to_string(),
            version: "1.0.0".to_string(),
            enable_rest: true,
            enable_ui: true,
            enable_swagger: true,
            admin_path: "/admin".to_string(),
        }
    }
}

impl PublisherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 기본값 + 글로벌 + 프로젝트 + 환경 변수 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 -> 2. 프로젝트
        for layer in JsonStore::layers() {
            if let Some(file) = layer.read::<PublisherConfigFile>(PUBLISHER_CONFIG_FILE)? {
                debug!(
                    "Loaded {} publisher config from {}",
                    layer.label(),
                    layer.base_dir().display()
                );
                config.merge(file);
            }
        }

        // 3. 환경 변수
        config.apply_env(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// 지정한 파일 하나만 기본값 위에 병합
    pub fn load_from(path: &Path) -> Result<Self> {
        let file: PublisherConfigFile = read_file(path)?;
        let mut config = Self::new();
        config.merge(file);
        config.validate()?;

        info!("Loaded publisher config from {}", path.display());
        Ok(config)
    }

    /// 부분 설정 병합 (지정된 필드만 덮어씀)
    pub fn merge(&mut self, other: PublisherConfigFile) {
        if let Some(host) = other.host {
            self.host = host;
        }
        if let Some(port) = other.port {
            self.port = port;
        }
        if let Some(title) = other.title {
            self.title = title;
        }
        if let Some(version) = other.version {
            self.version = version;
        }
        if let Some(enable_rest) = other.enable_rest {
            self.enable_rest = enable_rest;
        }
        if let Some(enable_ui) = other.enable_ui {
            self.enable_ui = enable_ui;
        }
        if let Some(enable_swagger) = other.enable_swagger {
            self.enable_swagger = enable_swagger;
        }
        if let Some(admin_path) = other.admin_path {
            self.admin_path = admin_path;
        }
    }

    /// 환경 변수 오버라이드 적용
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("{}={} is not a valid port: {}", ENV_PORT, port, e)))?;
        }
        if let Some(title) = lookup(ENV_TITLE) {
            self.title = title;
        }
        Ok(())
    }

    /// 설정 검증
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::Config("title must not be empty".to_string()));
        }
        if !self.admin_path.starts_with('/') {
            return Err(Error::Config(format!(
                "admin path must start with '/': {}",
                self.admin_path
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Derived
    // ========================================================================

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Swagger UI 경로 (비활성 시 None)
    pub fn docs_url(&self) -> Option<&'static str> {
        self.enable_swagger.then_some("/docs")
    }

    /// Redoc 경로 (비활성 시 None)
    pub fn redoc_url(&self) -> Option<&'static str> {
        self.enable_swagger.then_some("/redoc")
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn enable_rest(mut self, enabled: bool) -> Self {
        self.enable_rest = enabled;
        self
    }

    pub fn enable_ui(mut self, enabled: bool) -> Self {
        self.enable_ui = enabled;
        self
    }

    pub fn enable_swagger(mut self, enabled: bool) -> Self {
        self.enable_swagger = enabled;
        self
    }

    pub fn admin_path(mut self, path: impl Into<String>) -> Self {
        self.admin_path = path.into();
        self
    }
}

// ============================================================================
// PublisherConfigFile (부분 설정)
// ============================================================================

/// 설정 파일 내용 - 모든 필드 선택
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_rest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ui: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_swagger: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_path: Option<String>,
}
