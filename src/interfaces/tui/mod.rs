//! 终端用户界面（TUI）模块
//!
//! 管理链接、文件、API 令牌和统计的交互式仪表盘

use std::io::{self, Stderr};
use std::time::{Duration, Instant};

use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use tracing::{error, info};

mod constants;
mod event_handler;
mod input_handler;
mod ui;

use crate::app::Application;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::system::clipboard::default_clipboard;
use ui::{HitAreas, ui};

/// 运行 TUI 应用
pub async fn run_tui(config: &AppConfig, api_url: Option<&str>) -> Result<()> {
    let mut app = Application::from_config(config, api_url, default_clipboard())?;

    // 初始化终端
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    info!("TUI started against {}", app.api().base_url());
    app.init().await;
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms.max(10));
    let res = run_app(&mut terminal, &mut app, tick_rate).await;

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("TUI loop failed: {}", err);
    }
    res
}

/// 主循环
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    app: &mut Application,
    tick_rate: Duration,
) -> Result<()> {
    let mut hit = HitAreas::default();

    while !app.should_quit() {
        // 渲染
        terminal.draw(|f| ui(f, app, &mut hit))?;

        // 处理事件
        if event::poll(tick_rate)? {
            let event = event::read()?;
            event_handler::handle_event(app, &hit, event).await;
        }

        app.tick(Instant::now()).await;
    }

    info!("TUI exited");
    Ok(())
}
