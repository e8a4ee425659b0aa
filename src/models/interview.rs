use serde::{Deserialize, Serialize};

/// 对话中的发言方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

/// `POST /api/interview/{id}` 的请求体
#[derive(Debug, Clone, Serialize)]
pub struct InterviewRequest<'a> {
    pub message: &'a str,
    pub history: &'a [ChatMessage],
}

/// `POST /api/interview/{id}` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewReply {
    pub answer: String,
    #[serde(default)]
    pub persona_id: Option<String>,
}
