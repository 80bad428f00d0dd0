use serde::{Deserialize, Serialize};

/// The four cuisines a bracket is balanced across.
///
/// [`FoodCategory::ALL`] is the canonical order. Selection walks categories in
/// this order, never in the order a result map happens to iterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Korean,
    Japanese,
    Chinese,
    Western,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 4] = [
        FoodCategory::Korean,
        FoodCategory::Japanese,
        FoodCategory::Chinese,
        FoodCategory::Western,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            FoodCategory::Korean => "korean",
            FoodCategory::Japanese => "japanese",
            FoodCategory::Chinese => "chinese",
            FoodCategory::Western => "western",
        }
    }

    /// Display label shown on cards.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FoodCategory::Korean => "한식",
            FoodCategory::Japanese => "일식",
            FoodCategory::Chinese => "중식",
            FoodCategory::Western => "양식",
        }
    }

    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            FoodCategory::Korean => "🍚",
            FoodCategory::Japanese => "🍣",
            FoodCategory::Chinese => "🥟",
            FoodCategory::Western => "🍔",
        }
    }

    /// Place types passed to a nearby search for this cuisine.
    #[must_use]
    pub fn included_types(self) -> &'static [&'static str] {
        match self {
            FoodCategory::Korean => &["korean_restaurant"],
            FoodCategory::Japanese => &[
                "japanese_restaurant",
                "sushi_restaurant",
                "ramen_restaurant",
            ],
            FoodCategory::Chinese => &["chinese_restaurant"],
            FoodCategory::Western => &[
                "american_restaurant",
                "italian_restaurant",
                "french_restaurant",
                "pizza_restaurant",
                "hamburger_restaurant",
                "mediterranean_restaurant",
                "steak_house",
            ],
        }
    }

    /// Free-text query used by text search, which has no type filter.
    #[must_use]
    pub fn search_query(self) -> &'static str {
        match self {
            FoodCategory::Korean => "한식 맛집",
            FoodCategory::Japanese => "일식 맛집",
            FoodCategory::Chinese => "중식 맛집",
            FoodCategory::Western => "양식 맛집",
        }
    }

    /// Parse a category key such as `"korean"`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Map a dish label from the fallback catalog (`한우`, `스시`, `양꼬치`, ...)
    /// to its cuisine. Unknown labels are treated as Korean.
    #[must_use]
    pub fn from_dish_label(label: &str) -> Self {
        match label {
            "스시" | "일식" => FoodCategory::Japanese,
            "중식" | "양꼬치" => FoodCategory::Chinese,
            "양식" | "이탈리안" | "브런치" | "카페" | "쌀국수" => FoodCategory::Western,
            _ => FoodCategory::Korean,
        }
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
