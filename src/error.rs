use thiserror::Error;

/// 服务端在配额耗尽时写入 detail 的标记
pub const QUOTA_MARKER: &str = "RESOURCE_EXHAUSTED";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（不会发出网络请求）
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// API 调用错误
    #[error(transparent)]
    Api(#[from] ApiError),
    /// 流式响应错误
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 终端读写错误
    #[error("入出力エラー: {0}")]
    Io(#[from] std::io::Error),
}

/// 输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 问题为空
    #[error("質問を入力してください")]
    EmptyQuestion,
    /// 对话消息为空
    #[error("メッセージを入力してください")]
    EmptyMessage,
    /// 未指定角色 ID
    #[error("ペルソナIDが指定されていません")]
    MissingPersonaId,
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("通信エラー ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非成功状态码
    #[error("サーバーエラー ({status}): {detail}")]
    BadStatus {
        endpoint: String,
        status: u16,
        detail: String,
    },
    /// 配额 / 频率限制
    #[error("APIの無料枠の上限に達しました。しばらく待ってから再試行してください（1分〜数時間）。")]
    QuotaExceeded {
        endpoint: String,
        /// 实际收到的状态码（429，或 detail 带配额标记的其他状态码）
        status: u16,
        detail: String,
    },
    /// 响应 JSON 与预期类型不符
    #[error("レスポンスの解析に失敗しました ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 流式响应错误
#[derive(Debug, Error)]
pub enum StreamError {
    /// 读取响应体的过程中连接中断
    #[error("ストリームが中断されました: {source}")]
    Interrupted {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端在流中报告错误
    #[error("{message}")]
    ServerReported { message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("環境変数 {var_name} の値 '{value}' を {expected_type} に変換できません")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("設定ファイルを読み込めません ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("設定ファイルの解析に失敗しました ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 根据状态码和响应体对失败响应分类
    ///
    /// 429 或 detail 中含有配额标记时归为配额错误，其余归为状态码错误
    pub fn from_status(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        let endpoint = endpoint.into();
        let detail = extract_detail(body);
        if status == 429 || detail.contains(QUOTA_MARKER) {
            AppError::Api(ApiError::QuotaExceeded {
                endpoint,
                status,
                detail,
            })
        } else {
            AppError::Api(ApiError::BadStatus {
                endpoint,
                status,
                detail,
            })
        }
    }

    /// 创建流中断错误
    pub fn stream_interrupted(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Stream(StreamError::Interrupted {
            source: Box::new(source),
        })
    }

    /// 是否为配额错误（提示用户稍后再试）
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, AppError::Api(ApiError::QuotaExceeded { .. }))
    }

    /// HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api(ApiError::BadStatus { status, .. })
            | AppError::Api(ApiError::QuotaExceeded { status, .. }) => Some(*status),
            AppError::Api(ApiError::RequestFailed { source, .. }) => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }
}

/// 从失败响应体中提取 detail 文本
///
/// - JSON 且 `detail` 为字符串：直接使用
/// - JSON 且 `detail` 为其他类型：使用其 JSON 文本
/// - JSON 但没有 `detail`：使用整个 JSON 文本
/// - 非 JSON：使用原始文本
pub fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
