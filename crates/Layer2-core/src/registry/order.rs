//! Display Ordering - UI 탭 표시 순서
//!
//! 1. 일반 루트 클래스: 경로 오름차순, 각 루트 뒤에 하위 트리 (깊이 우선)
//! 2. 설정 클래스 (이름에 `config` 포함): 경로 오름차순, 각 항목 뒤에 하위 트리
//!    (설정 클래스 아래의 설정 클래스는 부모의 하위 트리로 방문)
//! 3. 남은 항목: 경로 오름차순
//!
//! 부모는 항상 자식보다 앞에 오고, 같은 레지스트리는 항상 같은 순서를 만듭니다.

use super::published::ApiRegistry;
use std::collections::{BTreeMap, HashSet};

/// 설정 클래스 표식 (대소문자 무시)
pub const CONFIGURATION_MARKER: &str = "config";

/// 설정 클래스인지 확인
pub fn is_configuration(class_name: &str) -> bool {
    class_name.to_lowercase().contains(CONFIGURATION_MARKER)
}

/// 레지스트리 전체의 표시 순서 (base path 목록)
pub fn display_order(registry: &ApiRegistry) -> Vec<String> {
    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in registry.entries_by_path() {
        if let Some(parent) = entry.parent.as_deref() {
            children
                .entry(parent)
                .or_default()
                .push(entry.base_path.as_str());
        }
    }

    let mut walk = Walk {
        registry,
        children,
        visited: HashSet::new(),
        order: Vec::with_capacity(registry.len()),
    };

    // 일반 루트 (설정 클래스는 건너뜀)
    for root in registry.roots() {
        if !is_configuration(&root.class_name) {
            walk.visit(&root.base_path, true);
        }
    }

    // 설정 클래스: 부모가 설정 클래스인 항목은 부모를 통해 방문
    for entry in registry.entries_by_path() {
        if !is_configuration(&entry.class_name) {
            continue;
        }
        let nested_in_config = entry
            .parent
            .as_deref()
            .and_then(|parent| registry.get(parent))
            .is_some_and(|parent| is_configuration(&parent.class_name));
        if !nested_in_config {
            walk.visit(&entry.base_path, false);
        }
    }

    // 남은 항목
    for entry in registry.entries_by_path() {
        if walk.visited.insert(entry.base_path.as_str()) {
            walk.order.push(entry.base_path.clone());
        }
    }

    walk.order
}

struct Walk<'a> {
    registry: &'a ApiRegistry,
    children: BTreeMap<&'a str, Vec<&'a str>>,
    visited: HashSet<&'a str>,
    order: Vec<String>,
}

impl<'a> Walk<'a> {
    /// `start`부터 깊이 우선 (자식은 경로 오름차순)
    fn visit(&mut self, start: &'a str, defer_config: bool) {
        let mut stack = vec![start];

        while let Some(path) = stack.pop() {
            let Some(entry) = self.registry.get(path) else {
                continue;
            };
            if self.visited.contains(path) {
                continue;
            }
            if defer_config && is_configuration(&entry.class_name) {
                continue;
            }

            self.visited.insert(path);
            self.order.push(path.to_string());

            if let Some(kids) = self.children.get(path) {
                stack.extend(kids.iter().rev().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configuration() {
        assert!(is_configuration("PublisherConfig"));
        assert!(is_configuration("CONFIGURATION"));
        assert!(is_configuration("app_config"));
        assert!(!is_configuration("Library"));
        assert!(!is_configuration("Conf"));
    }
}
