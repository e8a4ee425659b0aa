/// 日志工具模块
///
/// 一括提问运行的横幅日志，以及日志用的文本截断
use crate::error::AppError;
use crate::models::BulkQuestionRequest;
use crate::workflow::progress::format_clock;
use crate::workflow::RunReport;
use tracing::{error, info};

/// 记录运行开始
///
/// # 参数
/// - `request`: 本次一括提问的请求
pub fn log_run_start(request: &BulkQuestionRequest) {
    info!("{}", "=".repeat(60));
    info!("🚀 一括提问开始 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("❓ 问题: {}", truncate_text(&request.question, 60));
    info!(
        "🗾 筛选: {}",
        request.prefecture_filter.as_deref().unwrap_or("全部")
    );
    info!("{}", "=".repeat(60));
}

/// 记录运行完成
///
/// # 参数
/// - `report`: 运行汇总
pub fn log_run_complete(report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 一括提问完成");
    info!("✅ 回答数: {}", report.result_count);
    info!("⏱ 耗时: {}", format_clock(report.elapsed));
    info!("{}", "=".repeat(60));
}

/// 记录运行失败
///
/// # 参数
/// - `report`: 运行汇总（已累积的结果数）
/// - `err`: 导致失败的错误
pub fn log_run_failed(report: &RunReport, err: &AppError) {
    info!("\n{}", "─".repeat(60));
    if err.is_quota_exceeded() {
        error!("🚫 配额耗尽，一括提问中断: {}", err);
    } else {
        error!("❌ 一括提问失败: {}", err);
    }
    info!(
        "已收到 {} 条回答，耗时 {}",
        report.result_count,
        format_clock(report.elapsed)
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
