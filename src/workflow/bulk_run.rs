//! 一括提问运行控制器 - 流程层
//!
//! ## 职责
//!
//! 1. **重入保护**：同一时间只允许一次运行，运行中再次启动直接忽略
//! 2. **状态管理**：每次启动时重置 `BulkRunState`，逐条累积结果
//! 3. **计时**：每秒推送已耗时 / 剩余时间，收到第一条进度后开始估算剩余
//! 4. **增量显示**：每条结果只通知一次显示层，不重绘已有结果
//! 5. **收尾**：正常结束或出错都会结束运行并重新允许启动，已有结果保留
//!
//! ## 状态机
//!
//! ```text
//! Idle → Running → Completed
//!              ↘ Failed
//! ```
//!
//! Completed / Failed 都可以再次启动。
//!
//! 计时器与流在同一个任务里用 `tokio::select!` 交替驱动，循环退出时计时器随之销毁。

use crate::clients::BulkQuestionSource;
use crate::error::{AppError, AppResult, StreamError, ValidationError};
use crate::models::{BulkQuestionRequest, ProgressEvent, StreamRecord, UsageStatus};
use crate::utils::logging::{log_run_complete, log_run_failed, log_run_start};
use crate::workflow::progress::{
    estimated_duration, format_percent, TickSnapshot, DEFAULT_RPM_LIMIT,
};
use chrono::{DateTime, Local};
use futures::StreamExt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// 一次运行的状态
#[derive(Debug, Clone, Default)]
pub struct BulkRunState {
    /// 按到达顺序排列的结果
    pub results: Vec<ProgressEvent>,
    pub phase: RunPhase,
    pub started_at: Option<DateTime<Local>>,
    /// 收到第一条进度后确定的估算总耗时
    pub estimated: Option<Duration>,
    /// 运行结束时冻结的耗时
    pub elapsed: Option<Duration>,
    /// 状态行
    pub status: String,
    /// 失败时的错误信息
    pub error: Option<String>,
}

impl BulkRunState {
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    fn reset(&mut self, started_at: DateTime<Local>) {
        *self = Self {
            phase: RunPhase::Running,
            started_at: Some(started_at),
            ..Self::default()
        };
    }

    fn report(&self) -> RunReport {
        RunReport {
            phase: self.phase,
            result_count: self.results.len(),
            elapsed: self.elapsed.unwrap_or_default(),
            status: self.status.clone(),
        }
    }

    /// 结果筛选
    ///
    /// 关键词为空、回答（不区分大小写）包含关键词、或都道府县包含关键词时匹配；
    /// 地区为空或与结果的地区相同时匹配
    pub fn filter_results(&self, query: &str, region: Option<&str>) -> Vec<&ProgressEvent> {
        let query = query.trim().to_lowercase();
        let region = region.map(str::trim).filter(|r| !r.is_empty());

        self.results
            .iter()
            .filter(|event| {
                query.is_empty()
                    || event.answer.to_lowercase().contains(&query)
                    || event.prefecture.contains(&query)
            })
            .filter(|event| match region {
                None => true,
                Some(region) => event.region.as_deref() == Some(region),
            })
            .collect()
    }
}

/// 推送给显示层的单条进度
#[derive(Debug, Clone)]
pub struct ProgressUpdate<'a> {
    pub event: &'a ProgressEvent,
    /// 百分比，一位小数
    pub percent: String,
    /// `completed / total`
    pub count_label: String,
    /// `最新: …が回答しました`
    pub status: String,
    /// 已累积的结果数
    pub result_count: usize,
}

/// 运行结束时的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub phase: RunPhase,
    pub result_count: usize,
    pub elapsed: Duration,
    pub status: String,
}

/// 启动请求的结果
#[derive(Debug)]
pub enum RunOutcome {
    /// 已有运行在进行，本次调用被忽略
    AlreadyRunning,
    Completed(RunReport),
    /// 已累积的结果仍保留在状态中
    Failed { report: RunReport, error: AppError },
}

/// 显示层
///
/// 所有回调都在控制器所在的任务中同步调用
pub trait BulkRunPresenter {
    fn on_started(&mut self, _request: &BulkQuestionRequest) {}

    fn on_tick(&mut self, _tick: &TickSnapshot) {}

    fn on_usage(&mut self, _usage: &UsageStatus) {}

    fn on_progress(&mut self, update: &ProgressUpdate<'_>);

    fn on_finished(&mut self, report: &RunReport, tick: &TickSnapshot);
}

/// 运行被中途丢弃时的错误信息
pub const INTERRUPTED_MESSAGE: &str = "実行が中断されました";

/// 运行期间的守卫
///
/// `start_run` 的 future 在结束前被 drop（超时、任务被中止等）时，
/// 把仍处于 Running 的状态收尾为 Failed，使之后的启动不被拒绝
struct RunGuard<'a> {
    state: &'a Mutex<BulkRunState>,
    clock: Instant,
    armed: bool,
}

impl<'a> RunGuard<'a> {
    fn new(state: &'a Mutex<BulkRunState>, clock: Instant) -> Self {
        Self {
            state,
            clock,
            armed: true,
        }
    }

    /// 正常收尾后调用
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.is_running() {
            return;
        }
        state.phase = RunPhase::Failed;
        state.elapsed = Some(self.clock.elapsed());
        state.status = format!("エラー: {}", INTERRUPTED_MESSAGE);
        state.error = Some(INTERRUPTED_MESSAGE.to_string());
        warn!(
            "⚠️ 一括提问在结束前被中断，已收到 {} 条回答",
            state.results.len()
        );
    }
}

/// 一括提问运行控制器
pub struct BulkRunController<S> {
    source: S,
    rpm_limit: u32,
    tick_interval: Duration,
    state: Mutex<BulkRunState>,
}

impl<S: BulkQuestionSource> BulkRunController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            rpm_limit: DEFAULT_RPM_LIMIT,
            tick_interval: Duration::from_secs(1),
            state: Mutex::new(BulkRunState::default()),
        }
    }

    pub fn with_rpm_limit(mut self, rpm_limit: u32) -> Self {
        self.rpm_limit = rpm_limit;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// 当前状态的快照
    pub fn state(&self) -> BulkRunState {
        self.lock_state().clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().is_running()
    }

    // 锁只在同步代码中短暂持有，不会跨越 await
    fn lock_state(&self) -> MutexGuard<'_, BulkRunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 启动一次一括提问
    ///
    /// # 参数
    /// - `question`: 问题，去掉首尾空白后不能为空
    /// - `prefecture_filter`: 都道府县筛选，None 或空字符串表示全部
    /// - `presenter`: 显示层
    ///
    /// # 返回
    /// - `Err`：只有输入校验失败，此时不发出请求
    /// - `Ok(RunOutcome)`：忽略 / 完成 / 失败
    pub async fn start_run<P>(
        &self,
        question: &str,
        prefecture_filter: Option<&str>,
        presenter: &mut P,
    ) -> AppResult<RunOutcome>
    where
        P: BulkRunPresenter + Send,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        let request = BulkQuestionRequest::new(question, prefecture_filter);
        let clock = Instant::now();
        {
            let mut state = self.lock_state();
            if state.is_running() {
                debug!("已有一括提问在运行，忽略本次启动");
                return Ok(RunOutcome::AlreadyRunning);
            }
            state.reset(Local::now());
        }
        let mut guard = RunGuard::new(&self.state, clock);

        log_run_start(&request);
        presenter.on_started(&request);

        let mut stream = match self.source.open_bulk_question(&request).await {
            Ok(stream) => stream,
            Err(e) => return Ok(self.fail(e, clock.elapsed(), &mut guard, presenter)),
        };

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut estimated: Option<Duration> = None;

        loop {
            tokio::select! {
                item = stream.next() => match item {
                    Some(Ok(StreamRecord::Progress(event))) => {
                        if estimated.is_none() {
                            let est = estimated_duration(event.total, self.rpm_limit);
                            info!("⏱ 共 {} 人，预计耗时 {} 秒", event.total, est.as_secs());
                            estimated = Some(est);
                        }
                        self.record_progress(event, estimated, presenter);
                    }
                    Some(Ok(StreamRecord::Done)) => debug!("收到服务端完成标记"),
                    Some(Ok(StreamRecord::ServerError(message))) => {
                        let error = StreamError::ServerReported { message }.into();
                        return Ok(self.fail(error, clock.elapsed(), &mut guard, presenter));
                    }
                    Some(Err(e)) => {
                        return Ok(self.fail(e, clock.elapsed(), &mut guard, presenter));
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    presenter.on_tick(&TickSnapshot::new(clock.elapsed(), estimated));
                }
            }
        }

        Ok(self.complete(clock.elapsed(), &mut guard, presenter))
    }

    fn record_progress<P: BulkRunPresenter>(
        &self,
        event: ProgressEvent,
        estimated: Option<Duration>,
        presenter: &mut P,
    ) {
        let percent = format_percent(event.completed, event.total);
        let count_label = format!("{} / {}", event.completed, event.total);
        let status = format!(
            "最新: {}（{}）が回答しました",
            event.persona_name, event.prefecture
        );

        let result_count = {
            let mut state = self.lock_state();
            state.estimated = estimated;
            state.status = status.clone();
            state.results.push(event.clone());
            state.results.len()
        };

        debug!(
            "[{}] {} {}",
            count_label,
            event.persona_id,
            crate::utils::truncate_text(&event.answer, 30)
        );

        if let Some(usage) = &event.usage {
            presenter.on_usage(usage);
        }
        presenter.on_progress(&ProgressUpdate {
            event: &event,
            percent,
            count_label,
            status,
            result_count,
        });
    }

    fn complete<P: BulkRunPresenter>(
        &self,
        elapsed: Duration,
        guard: &mut RunGuard<'_>,
        presenter: &mut P,
    ) -> RunOutcome {
        guard.disarm();
        let report = {
            let mut state = self.lock_state();
            state.phase = RunPhase::Completed;
            state.elapsed = Some(elapsed);
            state.status = format!("✅ 全{}人の回答が完了しました！", state.results.len());
            state.report()
        };

        log_run_complete(&report);
        presenter.on_finished(&report, &TickSnapshot::finished(elapsed));
        RunOutcome::Completed(report)
    }

    fn fail<P: BulkRunPresenter>(
        &self,
        error: AppError,
        elapsed: Duration,
        guard: &mut RunGuard<'_>,
        presenter: &mut P,
    ) -> RunOutcome {
        guard.disarm();
        let (report, estimated) = {
            let mut state = self.lock_state();
            state.phase = RunPhase::Failed;
            state.elapsed = Some(elapsed);
            state.status = format!("エラー: {}", error);
            state.error = Some(error.to_string());
            (state.report(), state.estimated)
        };

        log_run_failed(&report, &error);
        presenter.on_finished(&report, &TickSnapshot::new(elapsed, estimated));
        RunOutcome::Failed { report, error }
    }
}
