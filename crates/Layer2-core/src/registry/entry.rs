//! Registry Entry - 게시된 클래스 경로별 항목

use chrono::{DateTime, Utc};
use genro_foundation::{ApiDescriptor, ApiReady, HttpVerb, MethodMeta, Target};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// RegisteredMethod - 등록된 메서드
// ============================================================================

/// 클래스 base path 아래로 확정된 메서드
#[derive(Debug, Clone)]
pub struct RegisteredMethod {
    /// 선언 시점 메타데이터 (불변)
    pub meta: Arc<MethodMeta>,

    /// base path + 메서드 경로
    pub full_path: String,
}

impl RegisteredMethod {
    pub fn new(meta: Arc<MethodMeta>, base_path: &str) -> Self {
        let full_path = join_path(base_path, meta.endpoint_path());
        Self { meta, full_path }
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn verb(&self) -> HttpVerb {
        self.meta.http_verb()
    }
}

/// `/library` + `/list_books` -> `/library/list_books`
pub fn join_path(base_path: &str, method_path: &str) -> String {
    match (base_path, method_path) {
        ("/", path) => path.to_string(),
        (base, "/") => base.to_string(),
        (base, path) => format!("{}{}", base, path),
    }
}

// ============================================================================
// RegistryEntry - 레지스트리 항목
// ============================================================================

/// 게시된 클래스 경로 하나에 대한 항목
///
/// 인스턴스와 선언, 대상별로 걸러진 메서드 목록, 부모 경로를 함께 보관합니다.
/// 시작 단계에서 만들어지고 이후에는 읽기 전용입니다.
pub struct RegistryEntry {
    /// 클래스 base path (레지스트리 키)
    pub base_path: String,

    /// 클래스 이름 (탭 표시 이름)
    pub class_name: String,

    /// 클래스 설명
    pub description: String,

    /// 게시된 인스턴스
    pub instance: Arc<dyn ApiReady>,

    /// 클래스 선언
    pub descriptor: Arc<ApiDescriptor>,

    /// 부모 base path (계층 탭 표시용)
    pub parent: Option<String>,

    /// REST 대상 메서드 (선언 순서)
    pub rest_methods: Vec<RegisteredMethod>,

    /// UI 대상 메서드 (선언 순서)
    pub ui_methods: Vec<RegisteredMethod>,

    /// 등록 시간
    pub registered_at: DateTime<Utc>,
}

impl RegistryEntry {
    /// 대상별 메서드 목록
    pub fn methods_for(&self, target: Target) -> &[RegisteredMethod] {
        match target {
            Target::Rest => &self.rest_methods,
            Target::Ui => &self.ui_methods,
        }
    }

    /// 이름으로 메서드 조회 (어느 대상이든 노출된 것)
    pub fn find_method(&self, name: &str) -> Option<&RegisteredMethod> {
        self.rest_methods
            .iter()
            .chain(self.ui_methods.iter())
            .find(|m| m.name() == name)
    }

    /// 노출된 메서드 개수 (중복 제외)
    pub fn method_count(&self) -> usize {
        let ui_only = self
            .ui_methods
            .iter()
            .filter(|m| !m.meta.exposed_to(Target::Rest))
            .count();
        self.rest_methods.len() + ui_only
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 같은 인스턴스인지 확인
    pub fn holds(&self, instance: &Arc<dyn ApiReady>) -> bool {
        same_instance(&self.instance, instance)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("base_path", &self.base_path)
            .field("class_name", &self.class_name)
            .field("parent", &self.parent)
            .field("rest_methods", &self.rest_methods.len())
            .field("ui_methods", &self.ui_methods.len())
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// 두 `Arc`가 같은 인스턴스를 가리키는지 (vtable 무시, 데이터 주소만 비교)
pub fn same_instance(a: &Arc<dyn ApiReady>, b: &Arc<dyn ApiReady>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const u8,
        Arc::as_ptr(b) as *const u8,
    )
}
