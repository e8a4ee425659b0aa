//! API 用量监视 - 业务能力层
//!
//! 后台任务定期拉取 `/api/usage`，最新值通过 watch 通道发布

use crate::clients::PersonaApi;
use crate::models::UsageStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// 用量监视器
///
/// 创建后立即拉取一次，之后按固定间隔拉取；失败只记 debug 日志，继续轮询。
/// 监视器被 drop 时后台任务随之终止。
pub struct UsageMonitor {
    rx: watch::Receiver<Option<UsageStatus>>,
    handle: JoinHandle<()>,
}

impl UsageMonitor {
    /// 启动轮询
    ///
    /// # 参数
    /// - `api`: 角色服务
    /// - `period`: 轮询间隔
    pub fn spawn<A>(api: Arc<A>, period: Duration) -> Self
    where
        A: PersonaApi + ?Sized + 'static,
    {
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match api.usage().await {
                    Ok(usage) => {
                        if tx.send(Some(usage)).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!("用量获取失败，等待下次轮询: {}", e),
                }
            }
        });

        Self { rx, handle }
    }

    /// 最近一次成功拉取的用量
    pub fn latest(&self) -> Option<UsageStatus> {
        self.rx.borrow().clone()
    }

    /// 订阅用量更新
    pub fn subscribe(&self) -> watch::Receiver<Option<UsageStatus>> {
        self.rx.clone()
    }
}

impl Drop for UsageMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
