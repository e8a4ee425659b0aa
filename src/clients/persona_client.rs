//! 角色服务 HTTP 客户端
//!
//! 封装所有与角色服务相关的调用，并把失败响应统一分类为
//! 配额错误 / 状态码错误（见 `AppError::from_status`）

use crate::clients::{BulkQuestionSource, InterviewApi, PersonaApi};
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{
    BulkQuestionRequest, ChatMessage, EnhancedProfile, InterviewReply, InterviewRequest, Persona,
    PersonaList, PersonaProfile, PrefectureSummary, UsageStatus,
};
use crate::streaming::{decode_records, RecordStream};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const BULK_QUESTION_PATH: &str = "/api/bulk-question";

/// 角色服务客户端
///
/// 内部的 `reqwest::Client` 自带连接池，clone 开销很小
#[derive(Debug, Clone)]
pub struct PersonaClient {
    http: reqwest::Client,
    base_url: String,
}

impl PersonaClient {
    /// 根据配置创建客户端
    ///
    /// 只设置连接超时：一括提问的响应体可能持续数十分钟
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| AppError::request_failed("client-builder", e))?;
        Ok(Self::with_http(http, &config.api_base_url))
    }

    /// 使用已有的 HTTP 客户端
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 生成 `/api/personas/{id}{suffix}`，id 做百分号编码
    fn persona_path(id: &str, suffix: &str) -> String {
        format!("/api/personas/{}{}", urlencoding::encode(id), suffix)
    }

    /// 发送请求并检查状态码
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> AppResult<Response> {
        debug!("请求 {}", endpoint);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // 读取失败响应体只为提取 detail，读不到就当作空
        let body = response.text().await.unwrap_or_default();
        warn!("⚠️ {} 返回状态码 {}", endpoint, status.as_u16());
        Err(AppError::from_status(endpoint, status.as_u16(), &body))
    }

    /// 发送请求并把响应体反序列化为指定类型
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = self.send(endpoint, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::request_failed(endpoint, e))?;

        serde_json::from_slice(&bytes).map_err(|source| {
            ApiError::JsonParseFailed {
                endpoint: endpoint.to_string(),
                source,
            }
            .into()
        })
    }

    /// 使用服务端 LLM 扩充画像（消耗配额）
    pub async fn enhance_profile(&self, id: &str) -> AppResult<EnhancedProfile> {
        let path = Self::persona_path(id, "/profile/enhance");
        self.fetch_json(&path, self.http.post(self.url(&path))).await
    }

    /// 都道府县列表及角色数量
    pub async fn list_prefectures(&self) -> AppResult<PrefectureSummary> {
        let path = "/api/prefectures";
        self.fetch_json(path, self.http.get(self.url(path))).await
    }
}

#[async_trait]
impl PersonaApi for PersonaClient {
    async fn list_personas(
        &self,
        prefecture: Option<&str>,
        region: Option<&str>,
    ) -> AppResult<PersonaList> {
        let path = "/api/personas";
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(prefecture) = prefecture.filter(|p| !p.is_empty()) {
            query.push(("prefecture", prefecture));
        }
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            query.push(("region", region));
        }
        self.fetch_json(path, self.http.get(self.url(path)).query(&query))
            .await
    }

    async fn get_persona(&self, id: &str) -> AppResult<Persona> {
        let path = Self::persona_path(id, "");
        self.fetch_json(&path, self.http.get(self.url(&path))).await
    }

    async fn get_profile(&self, id: &str) -> AppResult<PersonaProfile> {
        let path = Self::persona_path(id, "/profile");
        self.fetch_json(&path, self.http.get(self.url(&path))).await
    }

    async fn usage(&self) -> AppResult<UsageStatus> {
        let path = "/api/usage";
        self.fetch_json(path, self.http.get(self.url(path))).await
    }
}

#[async_trait]
impl InterviewApi for PersonaClient {
    async fn interview(
        &self,
        id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> AppResult<InterviewReply> {
        let path = format!("/api/interview/{}", urlencoding::encode(id));
        let body = InterviewRequest { message, history };
        debug!("访谈请求: 历史 {} 条", history.len());
        self.fetch_json(&path, self.http.post(self.url(&path)).json(&body))
            .await
    }
}

#[async_trait]
impl BulkQuestionSource for PersonaClient {
    async fn open_bulk_question(&self, request: &BulkQuestionRequest) -> AppResult<RecordStream> {
        info!(
            "📡 打开一括提问流 (筛选: {})",
            request.prefecture_filter.as_deref().unwrap_or("全部")
        );

        let response = self
            .send(
                BULK_QUESTION_PATH,
                self.http.post(self.url(BULK_QUESTION_PATH)).json(request),
            )
            .await?;

        let body = response
            .bytes_stream()
            .map_err(|e| AppError::stream_interrupted(e));
        Ok(decode_records(body))
    }
}
