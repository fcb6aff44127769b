//! テスト用のアイテム生成ヘルパー

use crate::catalog::{Category, Season, Style};
use crate::types::{ClothingItem, ItemDetails};

pub fn details(name: &str, category: Category) -> ItemDetails {
    ItemDetails {
        name: name.to_string(),
        category,
        subcategory: category.subcategories()[0].to_string(),
        color: "Preto".to_string(),
        style: Style::Casual,
        fabric: "Algodão".to_string(),
        fit: "Regular".to_string(),
        formality_level: 4,
        season: vec![Season::AllYear],
        versatility: 7,
    }
}

pub fn item(id: &str, category: Category) -> ClothingItem {
    ClothingItem::new(id, details(id, category), "data:image/jpeg;base64,AAAA")
}
