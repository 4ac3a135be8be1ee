//! Store categories used for filtering and display.

use serde::Serialize;

/// Icon shown for stores that belong to no known category.
pub const DEFAULT_ICON: &str = "🎁";

/// A named group of stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub stores: &'static [&'static str],
    pub icon: &'static str,
}

impl StoreCategory {
    /// Whether `store` is a member of this category (exact match).
    #[must_use]
    pub fn contains(&self, store: &str) -> bool {
        self.stores.contains(&store)
    }
}

const CATEGORIES: &[StoreCategory] = &[
    StoreCategory {
        id: "cafe",
        name: "카페",
        stores: &["스타벅스", "이디야", "커피빈", "할리스", "메가커피", "투썸플레이스"],
        icon: "☕",
    },
    StoreCategory {
        id: "convenience",
        name: "편의점",
        stores: &["GS25", "CU", "세븐일레븐", "이마트24", "미니스톱"],
        icon: "🏪",
    },
    StoreCategory {
        id: "fastfood",
        name: "패스트푸드",
        stores: &["맥도날드", "버거킹", "KFC", "롯데리아", "맘스터치", "서브웨이"],
        icon: "🍔",
    },
    StoreCategory {
        id: "bakery",
        name: "베이커리",
        stores: &["파리바게뜨", "뚜레쥬르", "던킨도너츠", "크라운베이커리", "성심당"],
        icon: "🥖",
    },
    StoreCategory {
        id: "icecream",
        name: "아이스크림",
        stores: &["배스킨라빈스", "하겐다즈", "콜드스톤"],
        icon: "🍦",
    },
    StoreCategory {
        id: "online",
        name: "온라인",
        stores: &["네이버페이", "카카오페이", "쿠팡", "11번가", "G마켓"],
        icon: "💻",
    },
    StoreCategory {
        id: "activity",
        name: "문화/여가",
        stores: &["CGV", "롯데시네마", "메가박스", "노래방", "PC방"],
        icon: "🎬",
    },
];

/// All known store categories.
#[must_use]
pub const fn store_categories() -> &'static [StoreCategory] {
    CATEGORIES
}

/// Find the category a store belongs to.
#[must_use]
pub fn category_for_store(store: &str) -> Option<&'static StoreCategory> {
    CATEGORIES.iter().find(|category| category.contains(store))
}

/// Icon for a store, falling back to [`DEFAULT_ICON`].
#[must_use]
pub fn category_icon(store: &str) -> &'static str {
    category_for_store(store).map_or(DEFAULT_ICON, |category| category.icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup() {
        let cafe = category_for_store("스타벅스").expect("cafe");
        assert_eq!(cafe.id, "cafe");
        assert_eq!(category_for_store("CU").map(|c| c.id), Some("convenience"));
    }

    #[test]
    fn test_unknown_store_gets_default_icon() {
        assert!(category_for_store("동네빵집").is_none());
        assert_eq!(category_icon("동네빵집"), DEFAULT_ICON);
        assert_eq!(category_icon("CGV"), "🎬");
    }

    #[test]
    fn test_lookup_is_exact_match() {
        // "CU" must not match stores that merely contain the letters.
        assert!(category_for_store("cu").is_none());
    }

    #[test]
    fn test_seven_categories() {
        assert_eq!(store_categories().len(), 7);
    }
}
