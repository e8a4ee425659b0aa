use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 合成角色记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub prefecture: String,
    #[serde(default)]
    pub region: String,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    #[serde(default)]
    pub employment_type: String,
    /// 年收（万日元）
    pub annual_income: u32,
    pub household_type: String,
    pub housing: String,
    pub monthly_food: u32,
    pub monthly_housing: u32,
    pub monthly_entertainment: u32,
    pub commute_minutes: u32,
    #[serde(default)]
    pub sleep_hours: f32,
    pub daily_routine: String,
    pub political_leaning: String,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub major_industry: String,
    #[serde(default)]
    pub preferred_brands: HashMap<String, String>,
}

impl Persona {
    /// 列表中显示的名字，例如 `東京都の34歳男性`
    pub fn display_name(&self) -> String {
        format!("{}の{}歳{}", self.prefecture, self.age, self.gender)
    }
}

/// `GET /api/personas` 的响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaList {
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub total: usize,
}
