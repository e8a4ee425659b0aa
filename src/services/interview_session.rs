//! 访谈会话 - 业务能力层
//!
//! 保存与单个角色的对话历史，每次提问都带上完整历史

use crate::clients::InterviewApi;
use crate::error::{AppResult, ValidationError};
use crate::models::ChatMessage;
use tracing::debug;

/// 与一个角色的访谈
pub struct InterviewSession {
    persona_id: String,
    history: Vec<ChatMessage>,
}

impl InterviewSession {
    /// 创建访谈会话
    ///
    /// # 参数
    /// - `persona_id`: 角色 ID，不能为空
    pub fn new(persona_id: &str) -> AppResult<Self> {
        let persona_id = persona_id.trim();
        if persona_id.is_empty() {
            return Err(ValidationError::MissingPersonaId.into());
        }
        Ok(Self {
            persona_id: persona_id.to_string(),
            history: Vec::new(),
        })
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// 提问
    ///
    /// # 参数
    /// - `api`: 访谈接口
    /// - `message`: 问题，去掉首尾空白后不能为空
    ///
    /// # 返回
    /// 角色的回答。成功时历史追加两条，失败时历史不变
    pub async fn ask<A: InterviewApi + ?Sized>(&mut self, api: &A, message: &str) -> AppResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let reply = api.interview(&self.persona_id, message, &self.history).await?;
        debug!("访谈 {} 第 {} 轮完成", self.persona_id, self.history.len() / 2 + 1);

        self.history.push(ChatMessage::user(message));
        self.history.push(ChatMessage::model(reply.answer.clone()));
        Ok(reply.answer)
    }
}
