//! Decoration Side-table - 타입별 API 선언 캐시
//!
//! 함수 객체에 속성을 붙이는 대신, 구체 타입(`TypeId`)을 키로 하는 전역 테이블에
//! `ApiDescriptor`를 한 번만 만들어 보관합니다. 이후 호출은 같은 `Arc`를 반환하므로
//! 선언된 메타데이터는 변경되지 않습니다.
//!
//! ```rust,ignore
//! impl ApiReady for ShelfManager {
//!     fn descriptor(&self) -> Arc<ApiDescriptor> {
//!         apiready::<Self>(|| {
//!             ApiDescriptor::new(ClassMeta::new("ShelfManager").base_path("/shelf"))
//!                 .method(MethodMeta::new("count_books")
//!                     .param(ParamMeta::new("shelf_code", TypeDesc::Str)))
//!         })
//!     }
//!     // ...
//! }
//! ```

use super::meta::ApiDescriptor;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// 타입별 API 선언 테이블
pub struct ApiCatalog {
    descriptors: RwLock<HashMap<TypeId, Arc<ApiDescriptor>>>,
}

impl ApiCatalog {
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    /// 캐시된 선언 반환, 없으면 `build`로 만들어 저장
    ///
    /// `build`는 락 밖에서 실행됩니다. 동시에 두 번 만들어지면 먼저 저장된 쪽이 유지됩니다.
    pub fn get_or_describe<T: 'static>(
        &self,
        build: impl FnOnce() -> ApiDescriptor,
    ) -> Arc<ApiDescriptor> {
        let key = TypeId::of::<T>();
        if let Some(found) = self.descriptors.read().get(&key) {
            return Arc::clone(found);
        }

        let descriptor = Arc::new(build());
        let mut descriptors = self.descriptors.write();
        let stored = descriptors.entry(key).or_insert_with(|| {
            debug!(
                "Described {} ({} methods)",
                descriptor.class_name(),
                descriptor.methods.len()
            );
            Arc::clone(&descriptor)
        });
        Arc::clone(stored)
    }

    /// 이미 선언된 타입 조회
    pub fn get<T: 'static>(&self) -> Option<Arc<ApiDescriptor>> {
        self.descriptors.read().get(&TypeId::of::<T>()).cloned()
    }

    /// 선언된 클래스 이름 (정렬)
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .descriptors
            .read()
            .values()
            .map(|d| d.class_name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}

impl Default for ApiCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// 전역 테이블
static CATALOG: OnceLock<ApiCatalog> = OnceLock::new();

/// 전역 선언 테이블 접근
pub fn catalog() -> &'static ApiCatalog {
    CATALOG.get_or_init(ApiCatalog::new)
}

/// 타입 `T`의 API 선언 (최초 1회만 `build` 실행)
pub fn apiready<T: 'static>(build: impl FnOnce() -> ApiDescriptor) -> Arc<ApiDescriptor> {
    catalog().get_or_describe::<T>(build)
}
