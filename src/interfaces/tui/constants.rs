//! TUI 常量定义
//!
//! 集中管理 UI 相关的常量，避免魔法数字分散在代码各处

/// URL 显示截断长度
pub const URL_TRUNCATE_LENGTH: usize = 50;

/// 同时显示的通知上限
pub const MAX_VISIBLE_TOASTS: usize = 4;

/// 通知宽度
pub const TOAST_WIDTH: u16 = 48;

/// 弹窗尺寸配置
#[derive(Debug, Clone, Copy)]
pub struct PopupSize {
    /// 宽度百分比 (0-100)
    pub width: u16,
    /// 高度百分比 (0-100)
    pub height: u16,
}

impl PopupSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// 各弹窗的尺寸配置
pub mod popup {
    use super::PopupSize;

    pub const SIGN_IN: PopupSize = PopupSize::new(50, 60);
    pub const CONFIRM: PopupSize = PopupSize::new(55, 30);
    pub const TOKEN: PopupSize = PopupSize::new(75, 45);
    pub const EDIT: PopupSize = PopupSize::new(70, 75);
    pub const INFO: PopupSize = PopupSize::new(70, 60);
}

/// 颜色主题
pub mod colors {
    use ratatui::style::Color;

    /// 主色调
    pub const PRIMARY: Color = Color::Cyan;
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const INFO: Color = Color::Blue;
    /// 次要文本色
    pub const MUTED: Color = Color::DarkGray;
    /// 高亮背景色
    pub const HIGHLIGHT_BG: Color = Color::Yellow;
    /// 高亮前景色
    pub const HIGHLIGHT_FG: Color = Color::Black;
}

/// 记录状态文本
pub mod status_text {
    pub const PRIVATE: &str = "PRIVATE";
    pub const ACTIVE: &str = "ACTIVE";
    /// 即将过期（24小时内）
    pub const EXPIRING: &str = "EXPIRING";
    pub const EXPIRED: &str = "EXPIRED";
}
