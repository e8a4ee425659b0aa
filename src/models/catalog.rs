use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /api/prefectures` 的响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefectureSummary {
    /// 都道府县 → 角色数量
    #[serde(default)]
    pub prefectures: BTreeMap<String, usize>,
    /// 地区 → 都道府县列表
    #[serde(default)]
    pub regions: Option<BTreeMap<String, Vec<String>>>,
}

impl PrefectureSummary {
    /// 角色总数
    pub fn total(&self) -> usize {
        self.prefectures.values().sum()
    }

    /// 某个都道府县的角色数量
    pub fn count_for(&self, prefecture: &str) -> usize {
        self.prefectures.get(prefecture).copied().unwrap_or(0)
    }
}

/// 用量等级，对应仪表盘进度条的颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Normal,
    Warning,
    Critical,
}

/// `GET /api/usage` 的响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStatus {
    pub quota_pct_used: f64,
    pub requests_today: u32,
    pub rpd_limit: u32,
    pub rpm_current: u32,
    #[serde(default)]
    pub rpm_limit: Option<u32>,
    pub requests_remaining_today: u32,
}

impl UsageStatus {
    pub fn level(&self) -> UsageLevel {
        if self.quota_pct_used > 80.0 {
            UsageLevel::Critical
        } else if self.quota_pct_used > 50.0 {
            UsageLevel::Warning
        } else {
            UsageLevel::Normal
        }
    }

    /// 今日剩余请求数是否偏少
    pub fn remaining_is_low(&self) -> bool {
        self.requests_remaining_today < 100
    }
}
