//! 文本渲染：把模型转换为终端上显示的行
//!
//! 只做字符串拼接，不做任何 I/O

use crate::models::{
    LifelogEvent, Persona, PrefectureSummary, ProgressEvent, PsychProfile, UsageLevel,
    UsageStatus, REGIONS,
};
use crate::workflow::progress::{estimated_duration, format_clock};
use crate::workflow::{ProgressUpdate, TickSnapshot};
use std::fmt::Write;

const NO_DATA: &str = "データなし";

pub fn gender_emoji(gender: &str) -> &'static str {
    if gender == "男性" {
        "👨"
    } else {
        "👩"
    }
}

/// 千位分隔，例如 `98,000`
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 一括提问前显示的所需时间目安
///
/// # 参数
/// - `count`: 对象角色数
/// - `whole_country`: 是否未按都道府县筛选
/// - `rpm_limit`: 每分钟请求上限
pub fn estimate_label(count: usize, whole_country: bool, rpm_limit: u32) -> String {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let minutes = estimated_duration(count, rpm_limit).as_secs() / 60;
    if whole_country {
        format!("⏱ 所要時間の目安：約{}分（全{}人）", minutes, count)
    } else if minutes <= 1 {
        format!("⏱ 所要時間の目安：約1分以内（{}人対象）", count)
    } else {
        format!("⏱ 所要時間の目安：約{}分（{}人対象）", minutes, count)
    }
}

/// 都道府县一览，按地区分组
pub fn prefecture_table(summary: &PrefectureSummary) -> String {
    let mut out = String::new();
    for region in REGIONS {
        let cells: Vec<String> = region
            .prefectures
            .iter()
            .filter(|p| summary.prefectures.contains_key(**p))
            .map(|p| format!("{}（{}人）", p, summary.count_for(p)))
            .collect();
        if cells.is_empty() {
            continue;
        }
        let _ = writeln!(out, "【{}】 {}", region.name, cells.join(" "));
    }
    let _ = write!(out, "合計 {}人", summary.total());
    out
}

/// 角色列表中的一张卡片（一行）
pub fn persona_card(p: &Persona) -> String {
    format!(
        "{} {}  {}歳・{}  {}  [年収{}万円] [{}] [{}]",
        gender_emoji(&p.gender),
        p.id,
        p.age,
        p.gender,
        p.occupation,
        p.annual_income,
        p.household_type,
        p.political_leaning
    )
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {:<8} {}", label, value);
}

/// 角色详细资料
pub fn persona_detail(p: &Persona) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}歳 {}  {} / {}",
        gender_emoji(&p.gender),
        p.age,
        p.gender,
        p.prefecture,
        p.region
    );

    let _ = writeln!(out, "■ 仕事・収入");
    row(&mut out, "職業", &p.occupation);
    row(&mut out, "年収", format!("{}万円", p.annual_income));
    row(&mut out, "雇用形態", &p.employment_type);

    let _ = writeln!(out, "■ 生活");
    row(&mut out, "世帯構成", &p.household_type);
    row(&mut out, "住居", &p.housing);
    row(&mut out, "月の食費", format!("{}円", group_thousands(p.monthly_food)));
    row(&mut out, "月の住居費", format!("{}円", group_thousands(p.monthly_housing)));
    row(&mut out, "月の娯楽費", format!("{}円", group_thousands(p.monthly_entertainment)));
    row(&mut out, "通勤時間", format!("{}分", p.commute_minutes));

    let _ = writeln!(out, "■ 価値観");
    row(&mut out, "政治的傾向", &p.political_leaning);
    row(&mut out, "性格", p.personality_traits.join("・"));

    let _ = writeln!(out, "■ 日常");
    let _ = write!(out, "  {}", p.daily_routine);
    out
}

/// 经历时间线
pub fn lifelog(events: &[LifelogEvent]) -> String {
    if events.is_empty() {
        return NO_DATA.to_string();
    }
    events
        .iter()
        .map(|e| {
            format!(
                "{}年（{}歳） {} {}",
                e.year,
                e.age,
                e.category.icon(),
                e.event
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 心理画像
pub fn psych(p: &PsychProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "💭 内面・悩み");
    row(&mut out, "生活満足度", &p.life_satisfaction);
    row(&mut out, "将来の不安", p.future_anxiety.join(" / "));
    row(&mut out, "仕事観", &p.work_values);

    let _ = writeln!(out, "🔄 習慣・変化");
    for habit in &p.lifestyle_habits {
        let _ = writeln!(out, "  ・{}", habit);
    }
    row(&mut out, "価値観の変遷", &p.values_shift);

    let _ = writeln!(out, "📱 情報収集");
    for (platform, usage) in &p.sns_usage {
        row(&mut out, platform, usage);
    }
    row(&mut out, "メディア信頼", &p.media_trust);
    let _ = write!(out, "  {:<8} {}", "主な情報源", p.info_sources.join(" / "));
    out
}

/// API 用量
pub fn usage(u: &UsageStatus) -> String {
    let marker = match u.level() {
        UsageLevel::Normal => "🟢",
        UsageLevel::Warning => "🟡",
        UsageLevel::Critical => "🔴",
    };
    let remain_marker = if u.remaining_is_low() { "⚠️" } else { "" };
    let rpm_limit = u
        .rpm_limit
        .map(|limit| format!("/{}", limit))
        .unwrap_or_default();
    format!(
        "{} 本日 {}/{} ({:.1}%)  RPM {}{}  残り {}{}",
        marker,
        u.requests_today,
        u.rpd_limit,
        u.quota_pct_used,
        u.rpm_current,
        rpm_limit,
        u.requests_remaining_today,
        remain_marker
    )
}

/// 一括提问的一条回答
pub fn result_card(item: &ProgressEvent) -> String {
    format!(
        "{} {}歳 {}・{}  {}  [{}]\n   {}",
        gender_emoji(&item.gender),
        item.age,
        item.gender,
        item.occupation,
        item.persona_id,
        item.prefecture,
        item.answer.trim()
    )
}

/// 进度行：`[ 0.6%] 3 / 470  最新: …`
pub fn progress_line(update: &ProgressUpdate<'_>) -> String {
    format!(
        "[{:>5}%] {}  {}",
        update.percent, update.count_label, update.status
    )
}

/// 计时行：`経過 0:42 / 残り 20:18`
pub fn tick_line(tick: &TickSnapshot) -> String {
    format!(
        "⏱ 経過 {} / 残り {}",
        format_clock(tick.elapsed),
        tick.remaining
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::persona::tests::sample;
    use crate::models::LifelogCategory;
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(98000), "98,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_estimate_label() {
        assert_eq!(estimate_label(470, true, 15), "⏱ 所要時間の目安：約32分（全470人）");
        assert_eq!(estimate_label(10, false, 15), "⏱ 所要時間の目安：約1分以内（10人対象）");
        assert_eq!(estimate_label(40, false, 15), "⏱ 所要時間の目安：約3分（40人対象）");
    }

    #[test]
    fn test_persona_card_and_detail() {
        let persona = sample("P-13-001", "東京都");
        let card = persona_card(&persona);
        assert!(card.starts_with("👨 P-13-001  34歳・男性"));
        assert!(card.contains("[年収480万円]"));

        let detail = persona_detail(&persona);
        assert!(detail.contains("98,000円"));
        assert!(detail.contains("慎重・倹約家"));
        assert!(detail.contains("東京都 / 関東"));
    }

    #[test]
    fn test_lifelog_icons() {
        assert_eq!(lifelog(&[]), "データなし");
        let events = vec![LifelogEvent {
            year: 2008,
            age: 18,
            category: LifelogCategory::Other,
            event: "上京".to_string(),
        }];
        assert_eq!(lifelog(&events), "2008年（18歳） 📌 上京");
    }

    #[test]
    fn test_prefecture_table_groups_by_region() {
        let summary = PrefectureSummary {
            prefectures: BTreeMap::from([
                ("東京都".to_string(), 10),
                ("沖縄県".to_string(), 10),
            ]),
            regions: None,
        };
        let table = prefecture_table(&summary);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "【関東】 東京都（10人）");
        assert_eq!(lines[1], "【九州・沖縄】 沖縄県（10人）");
        assert_eq!(lines[2], "合計 20人");
    }

    #[test]
    fn test_usage_line() {
        let u = UsageStatus {
            quota_pct_used: 85.0,
            requests_today: 1275,
            rpd_limit: 1500,
            rpm_current: 14,
            rpm_limit: Some(15),
            requests_remaining_today: 225,
        };
        assert_eq!(usage(&u), "🔴 本日 1275/1500 (85.0%)  RPM 14/15  残り 225");
    }

    #[test]
    fn test_tick_line() {
        let tick = TickSnapshot::new(Duration::from_secs(42), None);
        assert_eq!(tick_line(&tick), "⏱ 経過 0:42 / 残り --:--");
    }
}
