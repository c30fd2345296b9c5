//! Publisher Settings - 관리 UI 표시 설정 (게시 가능한 클래스)
//!
//! 대화상자 크기, 그리드 패딩 등 UI 환경설정을 키/값으로 보관합니다.
//! 프로세스 메모리에만 저장되며, 이름에 `Config`가 들어가므로 탭 순서에서 마지막에 표시됩니다.

use genro_foundation::{
    apiready, to_value, ApiDescriptor, ApiReady, CallArgs, ClassMeta, Error, MethodMeta,
    ModelSchema, ParamMeta, Result, ReturnMeta, TypeDesc,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// 설정 클래스 base path
pub const SETTINGS_BASE_PATH: &str = "/publisher_config";

/// 기본 설정값
pub const SETTINGS_DEFAULTS: [(&str, &str); 5] = [
    ("dialog_width", "90vw"),
    ("dialog_height", "85vh"),
    ("grid_cell_padding_vertical", "2px"),
    ("grid_cell_padding_horizontal", "4px"),
    ("grid_show_borders", "true"),
];

const REFRESH_HINT: &str = "Refresh page to apply.";

// ============================================================================
// 요청/응답 모델
// ============================================================================

/// 대화상자 크기
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogSizeConfig {
    #[serde(default = "default_dialog_width")]
    pub width: String,
    #[serde(default = "default_dialog_height")]
    pub height: String,
}

impl Default for DialogSizeConfig {
    fn default() -> Self {
        Self {
            width: default_dialog_width(),
            height: default_dialog_height(),
        }
    }
}

fn default_dialog_width() -> String {
    "90vw".to_string()
}

fn default_dialog_height() -> String {
    "85vh".to_string()
}

/// 그리드 셀 패딩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPaddingConfig {
    #[serde(default = "default_padding_vertical")]
    pub vertical: String,
    #[serde(default = "default_padding_horizontal")]
    pub horizontal: String,
}

impl Default for GridPaddingConfig {
    fn default() -> Self {
        Self {
            vertical: default_padding_vertical(),
            horizontal: default_padding_horizontal(),
        }
    }
}

fn default_padding_vertical() -> String {
    "2px".to_string()
}

fn default_padding_horizontal() -> String {
    "4px".to_string()
}

/// 설정 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

/// 설정 변경 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingUpdate {
    pub key: String,
    pub value: String,
    pub status: String,
}

// ============================================================================
// PublisherSettings
// ============================================================================

/// UI 환경설정 저장소
#[derive(Debug)]
pub struct PublisherSettings {
    values: RwLock<BTreeMap<String, String>>,
}

impl PublisherSettings {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(defaults()),
        }
    }

    /// 값 조회 (없는 키는 빈 문자열)
    pub fn get_config(&self, key: &str) -> String {
        self.values.read().get(key).cloned().unwrap_or_default()
    }

    /// 값 설정 (새 키도 허용)
    pub fn set_config(&self, key: &str, value: &str) -> SettingUpdate {
        debug!("Setting {} = {}", key, value);
        self.values.write().insert(key.to_string(), value.to_string());
        SettingUpdate {
            key: key.to_string(),
            value: value.to_string(),
            status: "updated".to_string(),
        }
    }

    /// 전체 목록 (키 오름차순)
    pub fn list_all_config(&self) -> Vec<SettingEntry> {
        self.values
            .read()
            .iter()
            .map(|(key, value)| SettingEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    pub fn set_dialog_size(&self, config: &DialogSizeConfig) -> Value {
        self.set_config("dialog_width", &config.width);
        self.set_config("dialog_height", &config.height);
        serde_json::json!({
            "width": config.width,
            "height": config.height,
            "status": format!("Dialog size updated. {}", REFRESH_HINT),
        })
    }

    pub fn set_grid_padding(&self, config: &GridPaddingConfig) -> Value {
        self.set_config("grid_cell_padding_vertical", &config.vertical);
        self.set_config("grid_cell_padding_horizontal", &config.horizontal);
        serde_json::json!({
            "vertical": config.vertical,
            "horizontal": config.horizontal,
            "status": format!("Grid padding updated. {}", REFRESH_HINT),
        })
    }

    /// 기본값 복원 (기본값에 없는 키는 유지)
    pub fn reset_to_defaults(&self) -> Value {
        let mut values = self.values.write();
        for (key, value) in SETTINGS_DEFAULTS {
            values.insert(key.to_string(), value.to_string());
        }
        serde_json::json!({
            "status": format!("Configuration reset to defaults. {}", REFRESH_HINT),
        })
    }
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self::new()
    }
}

fn defaults() -> BTreeMap<String, String> {
    SETTINGS_DEFAULTS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// ApiReady
// ============================================================================

fn settings_descriptor() -> ApiDescriptor {
    let key = || ParamMeta::new("key", TypeDesc::Str).describe("Configuration key");
    let status = || ReturnMeta::new(TypeDesc::map(TypeDesc::Str, TypeDesc::Any));

    ApiDescriptor::new(
        ClassMeta::new("PublisherConfig")
            .base_path(SETTINGS_BASE_PATH)
            .description("Configuration for Publisher UI"),
    )
    .model(
        ModelSchema::new("DialogSizeConfig")
            .describe("Configuration for dialog dimensions.")
            .field(
                ParamMeta::new("width", TypeDesc::Str)
                    .describe("Dialog width (CSS units)")
                    .default("90vw"),
            )
            .field(
                ParamMeta::new("height", TypeDesc::Str)
                    .describe("Dialog height (CSS units)")
                    .default("85vh"),
            ),
    )
    .model(
        ModelSchema::new("GridPaddingConfig")
            .describe("Configuration for grid cell padding.")
            .field(
                ParamMeta::new("vertical", TypeDesc::Str)
                    .describe("Vertical padding")
                    .default("2px"),
            )
            .field(
                ParamMeta::new("horizontal", TypeDesc::Str)
                    .describe("Horizontal padding")
                    .default("4px"),
            ),
    )
    .method(
        MethodMeta::new("get_config")
            .description("Get a configuration value.")
            .param(key())
            .returns(ReturnMeta::new(TypeDesc::Str)),
    )
    .method(
        MethodMeta::new("set_config")
            .description("Set a configuration value.")
            .param(key())
            .param(ParamMeta::new("value", TypeDesc::Str).describe("Configuration value"))
            .returns(status()),
    )
    .method(
        MethodMeta::new("list_all_config")
            .description("List all configuration values.")
            .returns(ReturnMeta::new(TypeDesc::list(TypeDesc::map(
                TypeDesc::Str,
                TypeDesc::Str,
            )))),
    )
    .method(
        MethodMeta::new("set_dialog_size")
            .description("Set dialog size preferences.")
            .param(ParamMeta::new("config", TypeDesc::model("DialogSizeConfig")))
            .returns(status()),
    )
    .method(
        MethodMeta::new("set_grid_padding")
            .description("Set grid cell padding.")
            .param(ParamMeta::new("config", TypeDesc::model("GridPaddingConfig")))
            .returns(status()),
    )
    .method(
        MethodMeta::new("reset_to_defaults")
            .description("Reset all configuration to default values.")
            .returns(status()),
    )
}

impl ApiReady for PublisherSettings {
    fn descriptor(&self) -> Arc<ApiDescriptor> {
        apiready::<Self>(settings_descriptor)
    }

    fn invoke(&self, method: &str, args: &CallArgs) -> Result<Value> {
        match method {
            "get_config" => to_value(self.get_config(&args.get::<String>("key")?)),
            "set_config" => to_value(
                self.set_config(&args.get::<String>("key")?, &args.get::<String>("value")?),
            ),
            "list_all_config" => to_value(self.list_all_config()),
            "set_dialog_size" => Ok(self.set_dialog_size(&args.get("config")?)),
            "set_grid_padding" => Ok(self.set_grid_padding(&args.get("config")?)),
            "reset_to_defaults" => Ok(self.reset_to_defaults()),
            other => Err(Error::invocation(other, "not dispatched by PublisherConfig")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = PublisherSettings::new();
        assert_eq!(settings.get_config("dialog_width"), "90vw");
        assert_eq!(settings.get_config("grid_show_borders"), "true");
        assert_eq!(settings.get_config("nonexistent"), "");
        assert_eq!(settings.list_all_config().len(), 5);
    }

    #[test]
    fn test_set_and_reset() {
        let settings = PublisherSettings::new();
        let update = settings.set_config("dialog_width", "70vw");
        assert_eq!(update.status, "updated");
        assert_eq!(settings.get_config("dialog_width"), "70vw");

        settings.reset_to_defaults();
        assert_eq!(settings.get_config("dialog_width"), "90vw");
    }

    #[test]
    fn test_list_is_sorted() {
        let settings = PublisherSettings::new();
        let keys: Vec<_> = settings
            .list_all_config()
            .into_iter()
            .map(|e| e.key)
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_invoke_dialog_size_with_model_defaults() {
        let settings = PublisherSettings::new();
        let meta = settings.descriptor();
        let method = meta.find_method("set_dialog_size").unwrap();
        let args = method.bind(&json!({"config": {"width": "50vw"}})).unwrap();

        let result = settings.invoke("set_dialog_size", &args).unwrap();
        assert_eq!(result["width"], "50vw");
        assert_eq!(result["height"], "85vh");
        assert_eq!(settings.get_config("dialog_width"), "50vw");
    }
}
