//! ワードローブの型定義
//!
//! CLIと永続化層で共有される型:
//! - ItemDetails: 画像解析（AI）の出力（10属性）
//! - ClothingItem: ワードローブの1アイテム（メタデータ + 画像）
//! - SavedLook: 保存済みルック
//! - StylistRequest: 「このアイテムでルックを作る」一回限りの依頼

use crate::catalog::{Category, Season, Style};
use serde::{Deserialize, Serialize};

/// 解析で得られるアイテム属性（idと画像を除く）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub name: String,
    pub category: Category,
    pub subcategory: String,
    pub color: String,
    pub style: Style,
    pub fabric: String,
    pub fit: String,
    pub formality_level: u8,
    pub season: Vec<Season>,
    pub versatility: u8,
}

impl ItemDetails {
    /// 登録に必要な項目がすべて埋まっているか
    pub fn is_complete(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();

        filled(&self.name)
            && filled(&self.subcategory)
            && filled(&self.color)
            && filled(&self.fabric)
            && filled(&self.fit)
            && self.formality_level > 0
            && self.versatility > 0
            && !self.season.is_empty()
    }
}

/// ワードローブのアイテム
///
/// 画像はメタデータとは別に保存されるため、シリアライズ対象外。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,

    #[serde(flatten)]
    pub details: ItemDetails,

    /// data URI形式の画像（別ストアから結合される）
    #[serde(skip)]
    pub image: String,
}

impl ClothingItem {
    pub fn new(id: impl Into<String>, details: ItemDetails, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            details,
            image: image.into(),
        }
    }

    /// 画像が読み込めていないアイテムは一覧から除外する
    pub fn is_usable(&self) -> bool {
        !self.image.is_empty()
    }

    pub fn category(&self) -> Category {
        self.details.category
    }
}

/// 保存済みルック
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLook {
    pub id: String,

    #[serde(skip)]
    pub image: String,

    pub commentary: String,

    /// 参照のみ（アイテムを所有しない）
    pub item_ids: Vec<String>,

    #[serde(default)]
    pub occasion: String,

    #[serde(default)]
    pub style: String,
}

impl SavedLook {
    pub fn is_usable(&self) -> bool {
        !self.image.is_empty()
    }
}

/// アイテム詳細画面からスタイリストへの一回限りの依頼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylistRequest {
    pub main_piece_id: String,
    pub occasion: String,
    pub style: String,
    pub num_looks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_details() -> ItemDetails {
        ItemDetails {
            name: "Camisa de linho".to_string(),
            category: Category::Top,
            subcategory: "Camisas".to_string(),
            color: "Branco".to_string(),
            style: Style::Minimalista,
            fabric: "Linho".to_string(),
            fit: "Regular".to_string(),
            formality_level: 6,
            season: vec![Season::Summer, Season::Spring],
            versatility: 8,
        }
    }

    #[test]
    fn test_item_details_complete() {
        assert!(sample_details().is_complete());
    }

    #[test]
    fn test_item_details_incomplete() {
        let mut details = sample_details();
        details.fabric = "  ".to_string();
        assert!(!details.is_complete());

        let mut details = sample_details();
        details.season.clear();
        assert!(!details.is_complete());

        let mut details = sample_details();
        details.versatility = 0;
        assert!(!details.is_complete());
    }

    #[test]
    fn test_clothing_item_serialize_without_image() {
        let item = ClothingItem::new("item-1-0", sample_details(), "data:image/jpeg;base64,AAAA");
        let json = serde_json::to_string(&item).expect("シリアライズ失敗");

        assert!(json.contains("\"id\":\"item-1-0\""));
        assert!(json.contains("\"category\":\"Parte de Cima\""));
        assert!(json.contains("\"formality_level\":6"));
        assert!(json.contains("\"season\":[\"Verão\",\"Primavera\"]"));
        assert!(!json.contains("image"));
    }

    #[test]
    fn test_clothing_item_deserialize() {
        let json = r#"{
            "id": "item-1700000000000-2",
            "name": "Tênis branco",
            "category": "Calçados",
            "subcategory": "Tênis",
            "color": "Branco",
            "style": "Casual",
            "fabric": "Couro",
            "fit": "Regular",
            "formality_level": 3,
            "season": ["Todo ano"],
            "versatility": 10
        }"#;

        let item: ClothingItem = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.id, "item-1700000000000-2");
        assert_eq!(item.category(), Category::Shoes);
        assert_eq!(item.details.season, vec![Season::AllYear]);
        assert!(item.image.is_empty());
        assert!(!item.is_usable());
    }

    #[test]
    fn test_saved_look_camel_case() {
        let look = SavedLook {
            id: "look-1".to_string(),
            image: "data:image/png;base64,AAAA".to_string(),
            commentary: "Perfeito".to_string(),
            item_ids: vec!["a".to_string(), "b".to_string()],
            occasion: "Trabalho".to_string(),
            style: "Elegante".to_string(),
        };

        let json = serde_json::to_string(&look).unwrap();
        assert!(json.contains("\"itemIds\":[\"a\",\"b\"]"));
        assert!(!json.contains("image"));
    }
}
