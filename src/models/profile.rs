use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 经历事件的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifelogCategory {
    Education,
    Work,
    Family,
    Residence,
    /// 未知分类统一归入此项
    #[serde(other)]
    Other,
}

impl LifelogCategory {
    /// 时间线上使用的图标
    pub fn icon(self) -> &'static str {
        match self {
            LifelogCategory::Education => "🎓",
            LifelogCategory::Work => "💼",
            LifelogCategory::Family => "👨‍👩‍👧",
            LifelogCategory::Residence => "🏠",
            LifelogCategory::Other => "📌",
        }
    }
}

/// 经历（生活日志）中的一条事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifelogEvent {
    pub year: i32,
    pub age: u32,
    pub category: LifelogCategory,
    pub event: String,
}

/// 心理画像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychProfile {
    pub life_satisfaction: String,
    #[serde(default)]
    pub future_anxiety: Vec<String>,
    pub work_values: String,
    #[serde(default)]
    pub lifestyle_habits: Vec<String>,
    pub values_shift: String,
    /// 平台 → 使用频率描述
    #[serde(default)]
    pub sns_usage: BTreeMap<String, String>,
    pub media_trust: String,
    #[serde(default)]
    pub info_sources: Vec<String>,
}

/// `GET /api/personas/{id}/profile` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaProfile {
    #[serde(default)]
    pub lifelog: Vec<LifelogEvent>,
    pub psych: PsychProfile,
}

/// `POST /api/personas/{id}/profile/enhance` 的响应：画像加上自我介绍文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedProfile {
    #[serde(flatten)]
    pub profile: PersonaProfile,
    #[serde(default)]
    pub narrative: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const PROFILE_JSON: &str = r#"{
        "lifelog": [
            {"year": 2008, "age": 18, "category": "education", "event": "地元の大学に進学"},
            {"year": 2012, "age": 22, "category": "work", "event": "IT企業に就職"},
            {"year": 2019, "age": 29, "category": "hobby", "event": "ランニングを始める"}
        ],
        "psych": {
            "life_satisfaction": "概ね満足しているが将来は不安",
            "future_anxiety": ["老後資金", "物価上昇"],
            "work_values": "安定重視",
            "lifestyle_habits": ["自炊", "週末ジョギング"],
            "values_shift": "コロナ禍で家族時間を重視するように",
            "sns_usage": {"X": "毎日", "Instagram": "週数回"},
            "media_trust": "テレビより専門家の発信を信頼",
            "info_sources": ["ニュースアプリ", "YouTube"]
        }
    }"#;

    #[test]
    fn test_unknown_category_maps_to_other() {
        let profile: PersonaProfile = serde_json::from_str(PROFILE_JSON).unwrap();
        assert_eq!(profile.lifelog.len(), 3);
        assert_eq!(profile.lifelog[0].category, LifelogCategory::Education);
        assert_eq!(profile.lifelog[2].category, LifelogCategory::Other);
        assert_eq!(profile.lifelog[2].category.icon(), "📌");
        assert_eq!(profile.psych.sns_usage.get("X").map(String::as_str), Some("毎日"));
    }

    #[test]
    fn test_enhanced_profile_flattens() {
        let mut value: serde_json::Value = serde_json::from_str(PROFILE_JSON).unwrap();
        value["narrative"] = serde_json::Value::String("私は地元で育ちました。".into());
        let enhanced: EnhancedProfile = serde_json::from_value(value).unwrap();
        assert_eq!(enhanced.profile.lifelog.len(), 3);
        assert_eq!(enhanced.narrative, "私は地元で育ちました。");
    }
}
