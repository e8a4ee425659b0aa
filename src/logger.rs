//! 日志初始化
//!
//! 输出到 stderr，stdout 留给终端界面。
//! `RUST_LOG` 优先；未设置时按 verbose 选择 info / debug。

use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// # 参数
/// - `verbose`: 未设置 `RUST_LOG` 时是否输出 debug 日志
///
/// 重复调用是无害的，后续调用直接忽略
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "persona_dashboard=debug"
    } else {
        "persona_dashboard=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .try_init();
}
