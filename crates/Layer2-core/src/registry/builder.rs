//! Registry Builder - 2단계 등록 (수집/검증 -> 반영)
//!
//! 루트 인스턴스에서 시작해 하위 인스턴스를 깊이 우선으로 따라가며 항목을 모읍니다.
//! 모든 검증이 끝난 뒤에만 레지스트리에 반영하므로, 실패하면 레지스트리는 그대로입니다.

use super::entry::{same_instance, RegisteredMethod, RegistryEntry};
use super::published::ApiRegistry;
use chrono::Utc;
use genro_foundation::{ApiDescriptor, ApiReady, Error, ModelSchema, Result, Target};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// CollectedBatch - 검증된 등록 묶음
// ============================================================================

/// 수집 단계 결과 (아직 레지스트리에 반영되지 않음)
#[derive(Debug, Default)]
pub struct CollectedBatch {
    /// 새로 등록될 항목 (발견 순서)
    pub entries: Vec<RegistryEntry>,

    /// 선언된 모델
    pub models: Vec<ModelSchema>,

    /// 이미 등록된 인스턴스라서 건너뛴 경로
    pub skipped: Vec<String>,
}

impl CollectedBatch {
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.base_path.clone()).collect()
    }
}

// ============================================================================
// RegistryBuilder
// ============================================================================

/// 한 번의 publish 호출에 대한 수집기
///
/// 방문 집합은 base path 기준입니다. 같은 인스턴스를 다시 만나면(다이아몬드, 순환)
/// 건너뛰고, 다른 인스턴스가 같은 경로를 쓰면 `DuplicateBasePath` 에러입니다.
pub struct RegistryBuilder<'a> {
    registry: &'a ApiRegistry,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(registry: &'a ApiRegistry) -> Self {
        Self { registry }
    }

    /// 루트부터 하위 인스턴스까지 수집 및 검증
    pub fn collect(&self, root: Arc<dyn ApiReady>) -> Result<CollectedBatch> {
        let mut batch = CollectedBatch::default();
        let mut visited: HashMap<String, Arc<dyn ApiReady>> = HashMap::new();
        let mut stack: Vec<(Arc<dyn ApiReady>, Option<String>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let descriptor = node.descriptor();
            let class_name = descriptor.class_name().to_string();
            let base_path = descriptor
                .base_path()
                .ok_or_else(|| Error::MissingBasePath {
                    class: class_name.clone(),
                })?
                .to_string();

            if let Some(existing) = self.registry.get(&base_path) {
                if existing.holds(&node) {
                    debug!("{} already published at {}, skipping", class_name, base_path);
                    batch.skipped.push(base_path);
                    continue;
                }
                return Err(Error::DuplicateBasePath {
                    path: base_path,
                    existing: existing.class_name.clone(),
                    incoming: class_name,
                });
            }

            if let Some(seen) = visited.get(&base_path) {
                if same_instance(seen, &node) {
                    debug!("{} reached again at {}, skipping", class_name, base_path);
                    continue;
                }
                let existing = seen.descriptor().class_name().to_string();
                return Err(Error::DuplicateBasePath {
                    path: base_path,
                    existing,
                    incoming: class_name,
                });
            }
            visited.insert(base_path.clone(), Arc::clone(&node));

            let (rest_methods, ui_methods) = partition_methods(&descriptor, &base_path)?;
            batch.models.extend(descriptor.models.iter().cloned());

            // 선언 순서대로 방문하도록 역순으로 쌓음
            for child in node.children().into_iter().rev() {
                stack.push((child, Some(base_path.clone())));
            }

            debug!(
                "Collected {} at {} ({} rest, {} ui)",
                class_name,
                base_path,
                rest_methods.len(),
                ui_methods.len()
            );

            batch.entries.push(RegistryEntry {
                base_path,
                class_name,
                description: descriptor.class.description.clone(),
                instance: node,
                descriptor,
                parent,
                rest_methods,
                ui_methods,
                registered_at: Utc::now(),
            });
        }

        self.resolve_types(&batch)?;
        Ok(batch)
    }

    /// 모든 어노테이션이 알려진 타입으로 해석되는지 확인
    ///
    /// 모델 이름은 선언된 모델, 레지스트리의 클래스/모델, 이번 묶음의 클래스 이름으로 해석됩니다.
    fn resolve_types(&self, batch: &CollectedBatch) -> Result<()> {
        let mut known: HashSet<&str> = self.registry.known_type_names();
        known.extend(batch.entries.iter().map(|e| e.class_name.as_str()));
        known.extend(batch.models.iter().map(|m| m.name.as_str()));

        for entry in &batch.entries {
            for meta in entry.descriptor.methods.iter().filter(|m| !m.is_private()) {
                if let Some(raw) = meta.unknown_annotation() {
                    return Err(Error::UnresolvedType {
                        class: entry.class_name.clone(),
                        method: meta.name().to_string(),
                        annotation: raw.to_string(),
                    });
                }
                if let Some(missing) = meta
                    .referenced_models()
                    .into_iter()
                    .find(|name| !known.contains(name))
                {
                    return Err(Error::UnresolvedType {
                        class: entry.class_name.clone(),
                        method: meta.name().to_string(),
                        annotation: missing.to_string(),
                    });
                }
            }
        }

        for model in &batch.models {
            for field in &model.fields {
                if let Some(raw) = field.ty.unknown_annotation() {
                    return Err(Error::InvalidMetadata(format!(
                        "model {} field '{}' has unparseable type '{}'",
                        model.name, field.name, raw
                    )));
                }
            }
        }

        Ok(())
    }
}

/// 공개 메서드를 대상별로 분류하고 선언을 검증
fn partition_methods(
    descriptor: &ApiDescriptor,
    base_path: &str,
) -> Result<(Vec<RegisteredMethod>, Vec<RegisteredMethod>)> {
    let class = descriptor.class_name();
    let mut names = HashSet::new();
    let mut rest = Vec::new();
    let mut ui = Vec::new();

    for meta in &descriptor.methods {
        if meta.name().is_empty() {
            return Err(Error::InvalidMetadata(format!(
                "{} declares a method without a name",
                class
            )));
        }
        if meta.is_private() {
            debug!("Skipping private member {}.{}", class, meta.name());
            continue;
        }
        if !names.insert(meta.name()) {
            return Err(Error::InvalidMetadata(format!(
                "{} declares method '{}' more than once",
                class,
                meta.name()
            )));
        }
        if meta.target_set().is_empty() {
            return Err(Error::InvalidMetadata(format!(
                "{}.{} has an empty target set",
                class,
                meta.name()
            )));
        }

        let mut params = HashSet::new();
        for param in meta.parameters() {
            if !params.insert(param.name.as_str()) {
                return Err(Error::InvalidMetadata(format!(
                    "{}.{} declares parameter '{}' more than once",
                    class,
                    meta.name(),
                    param.name
                )));
            }
        }

        let method = RegisteredMethod::new(Arc::clone(meta), base_path);
        if meta.exposed_to(Target::Rest) {
            rest.push(method.clone());
        }
        if meta.exposed_to(Target::Ui) {
            ui.push(method);
        }
    }

    Ok((rest, ui))
}
