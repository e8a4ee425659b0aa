//! 一括提问（流式）相关类型

use super::catalog::UsageStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// `POST /api/bulk-question` 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkQuestionRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture_filter: Option<String>,
}

impl BulkQuestionRequest {
    /// 空字符串的筛选条件视为不筛选
    pub fn new(question: impl Into<String>, prefecture_filter: Option<&str>) -> Self {
        Self {
            question: question.into(),
            prefecture_filter: prefecture_filter
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }
}

/// 一括提问过程中，每完成一个角色的回答就推送一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 已完成数（从 1 开始）
    pub completed: u32,
    /// 本次运行的总数
    pub total: u32,
    pub persona_id: String,
    pub persona_name: String,
    pub prefecture: String,
    #[serde(default)]
    pub region: Option<String>,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub answer: String,
    /// 服务端附带的用量快照
    #[serde(default)]
    pub usage: Option<UsageStatus>,
}

/// 一条 `data:` 记录解析后的形态
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord {
    /// 某个角色的回答
    Progress(ProgressEvent),
    /// 服务端的完成标记
    Done,
    /// 服务端中止运行时发送的错误
    ServerError(String),
}

impl StreamRecord {
    /// 从 JSON 值识别记录类型；形态不明的对象返回 None
    pub fn from_value(value: Value) -> Option<Self> {
        if value.get("event").and_then(Value::as_str) == Some("done") {
            return Some(StreamRecord::Done);
        }
        if value.get("total").is_some() {
            return match serde_json::from_value::<ProgressEvent>(value) {
                Ok(event) => Some(StreamRecord::Progress(event)),
                Err(e) => {
                    debug!("进度记录字段不完整，已跳过: {}", e);
                    None
                }
            };
        }
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Some(StreamRecord::ServerError(message.to_string()));
        }
        if value.get("message").is_some() {
            return Some(StreamRecord::Done);
        }
        debug!("未知的流记录，已跳过: {}", value);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_skips_empty_filter() {
        let request = BulkQuestionRequest::new("AI規制についてどう思いますか", Some("  "));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"question": "AI規制についてどう思いますか"})
        );

        let request = BulkQuestionRequest::new("物価は？", Some("大阪府"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"question": "物価は？", "prefecture_filter": "大阪府"})
        );
    }

    #[test]
    fn test_record_kinds() {
        let progress = json!({
            "completed": 1, "total": 10, "persona_id": "P-27-003",
            "persona_name": "大阪府の52歳女性", "prefecture": "大阪府",
            "age": 52, "gender": "女性", "occupation": "パート", "answer": "よう分からんわ"
        });
        match StreamRecord::from_value(progress) {
            Some(StreamRecord::Progress(event)) => {
                assert_eq!(event.completed, 1);
                assert_eq!(event.region, None);
                assert_eq!(event.usage, None);
            }
            other => panic!("unexpected record: {:?}", other),
        }

        assert_eq!(StreamRecord::from_value(json!({"event": "done"})), Some(StreamRecord::Done));
        assert_eq!(StreamRecord::from_value(json!({"message": "完了"})), Some(StreamRecord::Done));
        assert_eq!(
            StreamRecord::from_value(json!({"error": "quota"})),
            Some(StreamRecord::ServerError("quota".into()))
        );
        assert_eq!(StreamRecord::from_value(json!({"ping": 1})), None);
        assert_eq!(StreamRecord::from_value(json!({"total": 3})), None);
    }
}
