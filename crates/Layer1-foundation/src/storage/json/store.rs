//! JSON 설정 레이어
//!
//! 설정 파일은 두 위치에서 읽습니다. 뒤의 레이어가 앞의 레이어를 덮어씁니다.
//!
//! ```text
//! <config_dir>/genro/<file>   (global)
//! ./.genro/<file>             (project)
//! ```

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 글로벌 설정 폴더 이름 (config_dir 하위)
pub const GLOBAL_DIR_NAME: &str = "genro";

/// 프로젝트 설정 폴더 이름
pub const PROJECT_DIR_NAME: &str = ".genro";

/// 설정 파일 하나가 위치한 레이어
#[derive(Debug, Clone)]
pub struct JsonStore {
    label: &'static str,
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new(label: &'static str, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            label,
            base_dir: base_dir.into(),
        }
    }

    /// 글로벌 레이어 (<config_dir>/genro/)
    pub fn global() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new("global", dir.join(GLOBAL_DIR_NAME)))
    }

    /// 프로젝트 레이어 (<root>/.genro/)
    pub fn project(root: &Path) -> Self {
        Self::new("project", root.join(PROJECT_DIR_NAME))
    }

    /// 병합 순서대로의 레이어 (global -> project)
    ///
    /// 위치를 알 수 없는 레이어는 건너뜁니다.
    pub fn layers() -> Vec<Self> {
        let mut layers = Vec::with_capacity(2);
        match Self::global() {
            Some(global) => layers.push(global),
            None => debug!("No config directory; skipping global layer"),
        }
        match std::env::current_dir() {
            Ok(cwd) => layers.push(Self::project(&cwd)),
            Err(e) => debug!("No current directory ({}); skipping project layer", e),
        }
        layers
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 레이어의 파일 읽기 (없으면 `None`)
    pub fn read<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.base_dir.join(filename);
        if !path.is_file() {
            return Ok(None);
        }
        read_file(&path).map(Some)
    }
}

/// 지정한 JSON 파일 읽기
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
