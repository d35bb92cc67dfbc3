//! 剪贴板访问，放在 trait 之后以便无界面测试

use parking_lot::Mutex;

use crate::errors::{LinkerError, Result};

pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// 基于 arboard 的系统剪贴板，每次复制打开新句柄
#[cfg(feature = "tui")]
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(feature = "tui")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| LinkerError::clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| LinkerError::clipboard(e.to_string()))
    }
}

/// 没有可用剪贴板时使用（无界面或未启用 `tui` feature）
#[derive(Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(LinkerError::clipboard("Clipboard is not available"))
    }
}

/// 记录复制的文本，通过 `Arc` 与调用方共享
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: std::sync::Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> std::sync::Arc<Mutex<Vec<String>>> {
        self.contents.clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents.lock().push(text.to_string());
        Ok(())
    }
}

/// 当前构建可用的最佳剪贴板
pub fn default_clipboard() -> Box<dyn Clipboard> {
    #[cfg(feature = "tui")]
    {
        Box::new(SystemClipboard)
    }
    #[cfg(not(feature = "tui"))]
    {
        Box::new(NoClipboard)
    }
}
