//! 流程层：一括提问运行的编排与进度计算

pub mod bulk_run;
pub mod progress;

pub use bulk_run::{
    BulkRunController, BulkRunPresenter, BulkRunState, ProgressUpdate, RunOutcome, RunPhase,
    RunReport,
};
pub use progress::{estimated_duration, format_clock, format_percent, Remaining, TickSnapshot};
