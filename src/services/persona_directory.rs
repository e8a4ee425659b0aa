//! 角色目录服务 - 业务能力层
//!
//! 只负责"查角色"能力，带进程内缓存，不关心界面

use crate::clients::PersonaApi;
use crate::error::AppResult;
use crate::models::{Persona, PersonaList, PersonaProfile};
use std::collections::HashMap;
use tracing::debug;

/// 角色目录
///
/// 职责：
/// - 按都道府县缓存角色列表（空字符串表示全部）
/// - 按 ID 缓存画像
/// - 失败结果不缓存
pub struct PersonaDirectory<A> {
    api: A,
    lists: HashMap<String, PersonaList>,
    profiles: HashMap<String, PersonaProfile>,
}

impl<A: PersonaApi> PersonaDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            lists: HashMap::new(),
            profiles: HashMap::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 角色列表
    ///
    /// # 参数
    /// - `prefecture`: 都道府县，None 或空字符串表示全部
    ///
    /// # 返回
    /// 命中缓存时不发请求
    pub async fn personas(&mut self, prefecture: Option<&str>) -> AppResult<&PersonaList> {
        let key = prefecture.unwrap_or_default().trim().to_string();

        if !self.lists.contains_key(&key) {
            let filter = Some(key.as_str()).filter(|k| !k.is_empty());
            let list = self.api.list_personas(filter, None).await?;
            debug!("缓存角色列表 [{}]: {} 人", key, list.personas.len());
            self.lists.insert(key.clone(), list);
        } else {
            debug!("角色列表命中缓存 [{}]", key);
        }

        Ok(&self.lists[&key])
    }

    /// 画像（生活记录 + 心理画像），按 ID 缓存
    pub async fn profile(&mut self, id: &str) -> AppResult<&PersonaProfile> {
        if !self.profiles.contains_key(id) {
            let profile = self.api.get_profile(id).await?;
            self.profiles.insert(id.to_string(), profile);
        }
        Ok(&self.profiles[id])
    }

    /// 单个角色，不缓存
    pub async fn persona(&self, id: &str) -> AppResult<Persona> {
        self.api.get_persona(id).await
    }

    /// 按地区列出角色，不缓存
    pub async fn region(&self, region: &str) -> AppResult<PersonaList> {
        self.api.list_personas(None, Some(region)).await
    }
}
