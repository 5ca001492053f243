//! 发布方法过滤

use std::collections::HashSet;

const ALL_METHODS: &str = "*";

/// 根据 include / exclude 计算哪些方法对外发布
///
/// 两个列表均以 `,` 或 `;` 分隔。include 为 `*` 或空时表示全部方法，
/// exclude 优先于 include。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFilter {
    include_all: bool,
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl MethodFilter {
    pub fn parse(include: &str, exclude: &str) -> Self {
        let include_set = split_names(include);
        let include_all = include_set.is_empty() || include_set.contains(ALL_METHODS);
        Self {
            include_all,
            include: include_set,
            exclude: split_names(exclude),
        }
    }

    /// 方法是否对外发布
    pub fn is_published(&self, method: &str) -> bool {
        if self.exclude.contains(method) {
            return false;
        }
        self.include_all || self.include.contains(method)
    }

    pub fn includes_all(&self) -> bool {
        self.include_all
    }
}

fn split_names(raw: &str) -> HashSet<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
