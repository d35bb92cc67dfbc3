//! 列表筛选与输入辅助

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::models::Searchable;

use super::time_parser::is_expired_at;

/// 解析逗号分隔的短码输入，去除空白与空项
pub fn parse_short_codes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// 列表状态筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FilterType {
    #[default]
    All,
    Active,
    Expired,
    Public,
    Private,
}

impl FilterType {
    /// 循环切换到下一个筛选
    pub fn next(self) -> Self {
        let all: Vec<FilterType> = FilterType::iter().collect();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterType::All => "All",
            FilterType::Active => "Active",
            FilterType::Expired => "Expired",
            FilterType::Public => "Public",
            FilterType::Private => "Private",
        }
    }

    fn accepts<T: Searchable>(self, item: &T, now: DateTime<Utc>) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Active => !is_expired_at(item.expires_at(), now),
            FilterType::Expired => is_expired_at(item.expires_at(), now),
            // 没有可见性字段的记录视为公开
            FilterType::Public => item.is_public() != Some(false),
            FilterType::Private => item.is_public() == Some(false),
        }
    }
}

fn matches_query<T: Searchable>(item: &T, query_lower: &str) -> bool {
    query_lower.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(query_lower))
}

/// 返回通过搜索与筛选的元素下标（保持原有顺序）
pub fn filter_indices<T: Searchable>(
    items: &[T],
    query: &str,
    filter: FilterType,
    now: DateTime<Utc>,
) -> Vec<usize> {
    let query_lower = query.trim().to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches_query(*item, &query_lower) && filter.accepts(*item, now))
        .map(|(idx, _)| idx)
        .collect()
}

/// 按搜索词（不区分大小写的子串）与状态筛选
pub fn filter_items<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    filter: FilterType,
) -> Vec<&'a T> {
    filter_indices(items, query, filter, Utc::now())
        .into_iter()
        .map(|idx| &items[idx])
        .collect()
}

/// 搜索防抖：最后一次输入 `wait` 之后才触发
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// 重新计时
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    /// 到期时返回 true 并清除计时
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_short_codes() {
        assert_eq!(parse_short_codes(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_short_codes("").is_empty());
        assert!(parse_short_codes(" , ").is_empty());
    }

    #[test]
    fn test_filter_type_parse_and_cycle() {
        assert_eq!(FilterType::from_str("expired").unwrap(), FilterType::Expired);
        assert_eq!(FilterType::from_str("Private").unwrap(), FilterType::Private);
        assert!(FilterType::from_str("bogus").is_err());
        assert_eq!(FilterType::Active.to_string(), "active");
        assert_eq!(FilterType::Private.next(), FilterType::All);
        assert_eq!(FilterType::All.next(), FilterType::Active);
    }

    #[test]
    fn test_debouncer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(!debouncer.poll(start));

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(200));
        assert!(!debouncer.poll(start + Duration::from_millis(350)));
        assert!(debouncer.poll(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());

        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}
