//! 视图状态定义

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::utils::helpers::FilterType;

/// 仪表盘标签页
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Tab {
    #[default]
    Links,
    Files,
    Tokens,
    Analytics,
}

impl Tab {
    /// Ctrl+1..4 对应的标签页
    pub fn from_number(n: u8) -> Option<Self> {
        Tab::iter().nth(usize::from(n).checked_sub(1)?)
    }

    pub fn number(self) -> u8 {
        match self {
            Tab::Links => 1,
            Tab::Files => 2,
            Tab::Tokens => 3,
            Tab::Analytics => 4,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tab::Links => "🔗",
            Tab::Files => "📁",
            Tab::Tokens => "🔑",
            Tab::Analytics => "📊",
        }
    }

    /// 是否有搜索与筛选
    pub fn is_list(self) -> bool {
        !matches!(self, Tab::Analytics)
    }
}

/// 当前标签页、搜索词与筛选条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub search: String,
    pub filter: FilterType,
}

/// 顶层页面
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    SignIn,
    Dashboard,
}

/// 键盘输入的去向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Search,
    /// 当前标签页的创建表单
    Form,
}

/// 全局快捷键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    SwitchTab(Tab),
    Refresh,
    Logout,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_numbers() {
        assert_eq!(Tab::from_number(1), Some(Tab::Links));
        assert_eq!(Tab::from_number(4), Some(Tab::Analytics));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(5), None);
        for tab in Tab::iter() {
            assert_eq!(Tab::from_number(tab.number()), Some(tab));
        }
    }
}
