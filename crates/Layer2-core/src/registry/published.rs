//! ApiRegistry - 게시된 클래스 테이블

use super::builder::{CollectedBatch, RegistryBuilder};
use super::entry::{RegisteredMethod, RegistryEntry};
use super::order::display_order;
use genro_foundation::{normalize_path, ApiReady, ModelSchema, Result, Target};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// PublishReport
// ============================================================================

/// publish 한 번의 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// 새로 등록된 base path (발견 순서)
    pub registered: Vec<String>,

    /// 이미 등록된 인스턴스라 건너뛴 base path
    pub skipped: Vec<String>,
}

impl PublishReport {
    /// 아무것도 등록되지 않았는지 (재게시)
    pub fn is_noop(&self) -> bool {
        self.registered.is_empty()
    }
}

/// 레지스트리 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryStats {
    pub classes: usize,
    pub roots: usize,
    pub rest_methods: usize,
    pub ui_methods: usize,
    pub models: usize,
}

// ============================================================================
// ApiRegistry
// ============================================================================

/// base path -> 항목 테이블
///
/// 시작 단계에서 `publish`로 채워지고, 이후에는 조회 전용입니다.
/// base path는 항목을 구분하는 유일한 키입니다.
#[derive(Debug, Default)]
pub struct ApiRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    /// 등록 순서
    order: Vec<String>,
    models: BTreeMap<String, ModelSchema>,
}

impl ApiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // 등록
    // ========================================================================

    /// 인스턴스와 하위 인스턴스를 모두 등록
    ///
    /// 검증이 모두 끝난 뒤에 한 번에 반영합니다. 에러가 나면 레지스트리는 변경되지 않습니다.
    pub fn publish(&mut self, root: Arc<dyn ApiReady>) -> Result<PublishReport> {
        let batch = RegistryBuilder::new(self).collect(root)?;
        Ok(self.commit(batch))
    }

    fn commit(&mut self, batch: CollectedBatch) -> PublishReport {
        let registered = batch.paths();

        for model in batch.models {
            debug!("Registering model: {}", model.name);
            self.models.insert(model.name.clone(), model);
        }
        for entry in batch.entries {
            info!(
                "Published {} at {} ({} methods)",
                entry.class_name,
                entry.base_path,
                entry.method_count()
            );
            self.order.push(entry.base_path.clone());
            self.entries.insert(entry.base_path.clone(), entry);
        }

        PublishReport {
            registered,
            skipped: batch.skipped,
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// base path로 조회 (`library`, `/library/` 모두 허용)
    pub fn get(&self, base_path: &str) -> Option<&RegistryEntry> {
        self.entries.get(base_path).or_else(|| {
            let normalized = normalize_path(base_path);
            self.entries.get(&normalized)
        })
    }

    pub fn contains(&self, base_path: &str) -> bool {
        self.get(base_path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 등록 순서대로 항목 순회
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.order.iter().filter_map(|path| self.entries.get(path))
    }

    /// 경로 오름차순으로 항목 순회
    pub fn entries_by_path(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// 등록된 base path (등록 순서)
    pub fn paths(&self) -> &[String] {
        &self.order
    }

    /// 대상별 (base path, 메서드 목록) - 등록 순서
    pub fn listing(&self, target: Target) -> Vec<(&str, &[RegisteredMethod])> {
        self.entries()
            .map(|entry| (entry.base_path.as_str(), entry.methods_for(target)))
            .collect()
    }

    pub fn rest_listing(&self) -> Vec<(&str, &[RegisteredMethod])> {
        self.listing(Target::Rest)
    }

    pub fn ui_listing(&self) -> Vec<(&str, &[RegisteredMethod])> {
        self.listing(Target::Ui)
    }

    /// 직계 자식 항목 (경로 오름차순)
    pub fn children_of(&self, base_path: &str) -> Vec<&RegistryEntry> {
        self.entries
            .values()
            .filter(|e| e.parent.as_deref() == Some(base_path))
            .collect()
    }

    /// 부모가 없거나 부모가 등록되지 않은 항목 (경로 오름차순)
    pub fn roots(&self) -> Vec<&RegistryEntry> {
        self.entries
            .values()
            .filter(|e| match &e.parent {
                None => true,
                Some(parent) => !self.entries.contains_key(parent),
            })
            .collect()
    }

    /// 등록된 조상 개수 (탭 깊이)
    pub fn depth_of(&self, base_path: &str) -> usize {
        let mut depth = 0;
        let mut current = self.get(base_path).and_then(|e| e.parent.as_deref());
        while let Some(parent) = current {
            match self.entries.get(parent) {
                Some(entry) if depth < self.entries.len() => {
                    depth += 1;
                    current = entry.parent.as_deref();
                }
                _ => break,
            }
        }
        depth
    }

    pub fn model(&self, name: &str) -> Option<&ModelSchema> {
        self.models.get(name)
    }

    /// 선언된 모델 (이름 오름차순)
    pub fn models(&self) -> impl Iterator<Item = &ModelSchema> {
        self.models.values()
    }

    /// (클래스 이름, base path) - 등록 순서
    pub fn published_classes(&self) -> Vec<(String, String)> {
        self.entries()
            .map(|e| (e.class_name.clone(), e.base_path.clone()))
            .collect()
    }

    /// 타입 어노테이션에서 참조 가능한 이름 (클래스 + 모델)
    pub fn known_type_names(&self) -> HashSet<&str> {
        self.entries
            .values()
            .map(|e| e.class_name.as_str())
            .chain(self.models.keys().map(String::as_str))
            .collect()
    }

    /// 표시 순서 (설정 클래스는 마지막)
    pub fn display_order(&self) -> Vec<String> {
        display_order(self)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            classes: self.entries.len(),
            roots: self.roots().len(),
            rest_methods: self.entries.values().map(|e| e.rest_methods.len()).sum(),
            ui_methods: self.entries.values().map(|e| e.ui_methods.len()).sum(),
            models: self.models.len(),
        }
    }
}
