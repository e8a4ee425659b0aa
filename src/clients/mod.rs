//! 客户端层
//!
//! 只负责与角色服务通信，不关心流程。
//! 两个 trait 是上层（services / workflow）依赖的能力边界，测试中可替换为假实现。

pub mod persona_client;

pub use persona_client::PersonaClient;

use crate::error::AppResult;
use crate::models::{
    BulkQuestionRequest, ChatMessage, InterviewReply, Persona, PersonaList, PersonaProfile,
    UsageStatus,
};
use crate::streaming::RecordStream;
use async_trait::async_trait;

/// 角色查询能力
#[async_trait]
pub trait PersonaApi: Send + Sync {
    /// 按都道府县 / 地区筛选角色列表
    async fn list_personas(
        &self,
        prefecture: Option<&str>,
        region: Option<&str>,
    ) -> AppResult<PersonaList>;

    async fn get_persona(&self, id: &str) -> AppResult<Persona>;

    async fn get_profile(&self, id: &str) -> AppResult<PersonaProfile>;

    async fn usage(&self) -> AppResult<UsageStatus>;
}

/// 一括提问能力：打开一次流式请求
#[async_trait]
pub trait BulkQuestionSource: Send + Sync {
    /// 请求失败或状态码非成功时直接返回错误，不产生任何记录
    async fn open_bulk_question(&self, request: &BulkQuestionRequest) -> AppResult<RecordStream>;
}

/// 访谈能力：发送一条消息并取得回答
#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// # 参数
    /// - `id`: 角色 ID
    /// - `message`: 本次消息
    /// - `history`: 此前的全部对话，按时间顺序
    async fn interview(
        &self,
        id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> AppResult<InterviewReply>;
}
