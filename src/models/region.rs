//! 地区 / 都道府县静态表（仪表盘地图使用）

use phf::phf_map;

/// 地区及其下属都道府县
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub prefectures: &'static [&'static str],
}

/// 地图上的显示顺序
pub const REGIONS: &[Region] = &[
    Region {
        name: "北海道",
        prefectures: &["北海道"],
    },
    Region {
        name: "東北",
        prefectures: &["青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県"],
    },
    Region {
        name: "関東",
        prefectures: &["茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県"],
    },
    Region {
        name: "中部",
        prefectures: &[
            "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県", "静岡県", "愛知県",
        ],
    },
    Region {
        name: "近畿",
        prefectures: &["三重県", "滋賀県", "京都府", "大阪府", "兵庫県", "奈良県", "和歌山県"],
    },
    Region {
        name: "中国",
        prefectures: &["鳥取県", "島根県", "岡山県", "広島県", "山口県"],
    },
    Region {
        name: "四国",
        prefectures: &["徳島県", "香川県", "愛媛県", "高知県"],
    },
    Region {
        name: "九州・沖縄",
        prefectures: &[
            "福岡県", "佐賀県", "長崎県", "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
        ],
    },
];

static PREFECTURE_REGION: phf::Map<&'static str, &'static str> = phf_map! {
    "北海道" => "北海道",
    "青森県" => "東北", "岩手県" => "東北", "宮城県" => "東北",
    "秋田県" => "東北", "山形県" => "東北", "福島県" => "東北",
    "茨城県" => "関東", "栃木県" => "関東", "群馬県" => "関東", "埼玉県" => "関東",
    "千葉県" => "関東", "東京都" => "関東", "神奈川県" => "関東",
    "新潟県" => "中部", "富山県" => "中部", "石川県" => "中部", "福井県" => "中部",
    "山梨県" => "中部", "長野県" => "中部", "岐阜県" => "中部", "静岡県" => "中部",
    "愛知県" => "中部",
    "三重県" => "近畿", "滋賀県" => "近畿", "京都府" => "近畿", "大阪府" => "近畿",
    "兵庫県" => "近畿", "奈良県" => "近畿", "和歌山県" => "近畿",
    "鳥取県" => "中国", "島根県" => "中国", "岡山県" => "中国", "広島県" => "中国",
    "山口県" => "中国",
    "徳島県" => "四国", "香川県" => "四国", "愛媛県" => "四国", "高知県" => "四国",
    "福岡県" => "九州・沖縄", "佐賀県" => "九州・沖縄", "長崎県" => "九州・沖縄",
    "熊本県" => "九州・沖縄", "大分県" => "九州・沖縄", "宮崎県" => "九州・沖縄",
    "鹿児島県" => "九州・沖縄", "沖縄県" => "九州・沖縄",
};

/// 查询都道府县所属地区
pub fn region_of(prefecture: &str) -> Option<&'static str> {
    PREFECTURE_REGION.get(prefecture).copied()
}
