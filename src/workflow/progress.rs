//! 进度显示用的计算：耗时估算、百分比、时钟格式

use std::fmt;
use std::time::Duration;

/// 服务端默认的每分钟请求上限
pub const DEFAULT_RPM_LIMIT: u32 = 15;

/// 根据角色总数估算整次运行的耗时
///
/// `ceil(total / rpm_limit) * 60` 秒，仅用于显示
pub fn estimated_duration(total: u32, rpm_limit: u32) -> Duration {
    let rpm = rpm_limit.max(1);
    let minutes = total.div_ceil(rpm);
    Duration::from_secs(u64::from(minutes) * 60)
}

/// 进度百分比，保留一位小数
pub fn format_percent(completed: u32, total: u32) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", f64::from(completed) / f64::from(total) * 100.0)
}

/// `m:ss` 格式，秒数向下取整
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// 剩余时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// 尚未收到第一条进度，无法估算
    Unknown,
    Left(Duration),
    Done,
}

impl Remaining {
    /// 由估算总耗时和已耗时计算剩余时间
    pub fn from_estimate(estimated: Option<Duration>, elapsed: Duration) -> Self {
        match estimated {
            None => Remaining::Unknown,
            Some(total) => {
                let left = total.saturating_sub(elapsed);
                if left.as_secs() == 0 {
                    Remaining::Done
                } else {
                    Remaining::Left(left)
                }
            }
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remaining::Unknown => write!(f, "--:--"),
            Remaining::Left(left) => write!(f, "{}", format_clock(*left)),
            Remaining::Done => write!(f, "完了"),
        }
    }
}

/// 每秒推送给显示层的计时快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSnapshot {
    pub elapsed: Duration,
    pub remaining: Remaining,
}

impl TickSnapshot {
    pub fn new(elapsed: Duration, estimated: Option<Duration>) -> Self {
        Self {
            elapsed,
            remaining: Remaining::from_estimate(estimated, elapsed),
        }
    }

    /// 运行结束时的快照：耗时冻结，剩余显示为完成
    pub fn finished(elapsed: Duration) -> Self {
        Self {
            elapsed,
            remaining: Remaining::Done,
        }
    }
}
