//! Panic 处理
//!
//! 两种模式都把报告追加到 `crash.log` 并打印一行提示。
//! TUI 占用终端，打印前先把终端交还。

use std::any::Any;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::panic::{self, PanicHookInfo};

use chrono::Utc;

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Tui,
}

pub const CRASH_LOG_FILE: &str = "crash.log";

/// 写入 crash.log 的内容
#[derive(Debug)]
struct CrashReport {
    mode: RunMode,
    message: String,
    location: String,
    backtrace: String,
}

impl CrashReport {
    fn from_hook(mode: RunMode, info: &PanicHookInfo<'_>) -> Self {
        let location = match info.location() {
            Some(loc) => format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
            None => "<unknown>".to_string(),
        };
        Self {
            mode,
            message: payload_text(info.payload()),
            location,
            backtrace: std::backtrace::Backtrace::force_capture().to_string(),
        }
    }

    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "---- linker crash {} ----", Utc::now().to_rfc3339())?;
        writeln!(out, "version:  {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "mode:     {:?}", self.mode)?;
        writeln!(out, "message:  {}", self.message)?;
        writeln!(out, "location: {}", self.location)?;
        writeln!(out, "{}", self.backtrace)?;
        writeln!(out)
    }
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unknown panic".to_string())
}

/// 为 `mode` 安装 hook，替换已有的 hook
pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |info| {
        if mode == RunMode::Tui {
            restore_terminal();
        }

        let report = CrashReport::from_hook(mode, info);
        tracing::error!("panic at {}: {}", report.location, report.message);

        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(CRASH_LOG_FILE)
            .and_then(|mut file| report.write_to(&mut file));
        if let Err(e) = written {
            eprintln!("Failed to write {}: {}", CRASH_LOG_FILE, e);
        }

        print_panic(&report.message);
    }));
}

/// 退出 raw mode 和备用屏幕，未进入时调用也无副作用
#[cfg(feature = "tui")]
pub fn restore_terminal() {
    use crossterm::event::DisableMouseCapture;
    use crossterm::execute;
    use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};

    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
}

#[cfg(not(feature = "tui"))]
pub fn restore_terminal() {}

fn print_panic(message: &str) {
    use colored::Colorize;

    eprintln!(
        "\n{} {}\n{}\n",
        "linker crashed:".red().bold(),
        message,
        format!("A report was appended to {}", CRASH_LOG_FILE).dimmed()
    );
}
