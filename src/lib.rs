//! # Persona Dashboard
//!
//! 合成角色（模拟的日本居民画像）仪表盘的终端版客户端
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与角色服务通信，只暴露能力
//! - `PersonaClient` - 所有 HTTP 接口，失败统一分类为配额 / 状态码错误
//! - `streaming/` - 一括提问响应体的增量解码
//!
//! ### ② 业务能力层（Services）
//! - `PersonaDirectory` - 角色列表 / 画像查询，带缓存
//! - `InterviewSession` - 单个角色的访谈历史
//! - `UsageMonitor` - API 用量定期轮询
//!
//! ### ③ 流程层（Workflow）
//! - `BulkRunController` - 一次一括提问的完整流程（重入保护、计时、逐条显示、收尾）
//!
//! ### ④ 界面层（UI）
//! - `ui/` - 终端渲染与 `TerminalPresenter`
//! - `app` / `cli` - 子命令
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod streaming;
pub mod ui;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{BulkQuestionSource, InterviewApi, PersonaApi, PersonaClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{InterviewSession, PersonaDirectory, UsageMonitor};
pub use workflow::{BulkRunController, BulkRunPresenter, BulkRunState, RunOutcome, RunPhase};
