//! 终端显示层
//!
//! 回答卡片逐条追加到输出；计时行用 `\r` 原地刷新，下一次输出前换行

use crate::models::{BulkQuestionRequest, UsageStatus};
use crate::ui::render;
use crate::workflow::{BulkRunPresenter, ProgressUpdate, RunPhase, RunReport, TickSnapshot};
use std::io::Write;
use tracing::warn;

pub struct TerminalPresenter<W: Write> {
    out: W,
    /// 计时行尚未换行
    tick_open: bool,
    last_usage: Option<UsageStatus>,
    write_errors: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tick_open: false,
            last_usage: None,
            write_errors: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// 最近一次随进度附带的用量
    pub fn last_usage(&self) -> Option<&UsageStatus> {
        self.last_usage.as_ref()
    }

    /// 输出失败的次数
    pub fn write_errors(&self) -> usize {
        self.write_errors
    }

    fn line(&mut self, text: &str) {
        let prefix = if self.tick_open { "\n" } else { "" };
        self.tick_open = false;
        let result = writeln!(self.out, "{}{}", prefix, text);
        self.check(result);
    }

    fn flush(&mut self) {
        let result = self.out.flush();
        self.check(result);
    }

    // 输出失败不中断运行，只记日志
    fn check(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            self.write_errors += 1;
            warn!("终端输出失败: {}", e);
        }
    }
}

impl<W: Write + Send> BulkRunPresenter for TerminalPresenter<W> {
    fn on_started(&mut self, request: &BulkQuestionRequest) {
        let target = request.prefecture_filter.as_deref().unwrap_or("全国");
        self.line(&format!("📡 質問中...（対象: {}）", target));
    }

    fn on_tick(&mut self, tick: &TickSnapshot) {
        let result = write!(self.out, "\r{}", render::tick_line(tick));
        self.check(result);
        self.flush();
        self.tick_open = true;
    }

    fn on_usage(&mut self, usage: &UsageStatus) {
        self.last_usage = Some(usage.clone());
    }

    fn on_progress(&mut self, update: &ProgressUpdate<'_>) {
        self.line(&render::progress_line(update));
        self.line(&render::result_card(update.event));
    }

    fn on_finished(&mut self, report: &RunReport, tick: &TickSnapshot) {
        self.line(&render::tick_line(tick));
        self.line(&report.status);
        if report.phase == RunPhase::Completed {
            self.line(&format!("{}件", report.result_count));
        }
        if let Some(usage) = self.last_usage.clone() {
            self.line(&render::usage(&usage));
        }
        self.flush();
    }
}
