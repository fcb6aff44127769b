//! ルック選定結果の検証
//!
//! AIの返答をワードローブと照合し、描画してよいルックかを判定する。

use crate::parser::LookSelection;
use crate::types::ClothingItem;
use std::collections::HashMap;

/// コメントが空だった場合の説明文
pub const DEFAULT_NO_LOOK_MESSAGE: &str =
    "Não foi possível gerar um look. Tente adicionar mais peças ou mudar o estilo/ocasião.";

/// 検証結果
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome<'a> {
    /// 描画可能なルック（レスポンスのID順）
    Look {
        items: Vec<&'a ClothingItem>,
        commentary: String,
    },
    /// itemIdsが空: 見つからなかった理由の説明
    NoLook { commentary: String },
    /// 必須アイテムが含まれていない（描画しない）
    MissingMandatory { commentary: String },
    /// ワードローブに存在しないIDがある（候補ごと破棄）
    Unresolved { missing: Vec<String> },
}

impl SelectionOutcome<'_> {
    pub fn is_look(&self) -> bool {
        matches!(self, SelectionOutcome::Look { .. })
    }
}

/// ルック選定結果を検証
///
/// # Arguments
/// * `selection` - AIの返答
/// * `wardrobe` - 照合対象のワードローブ
/// * `mandatory_id` - 必須アイテムID（指定時）
pub fn validate_selection<'a>(
    selection: &LookSelection,
    wardrobe: &'a [ClothingItem],
    mandatory_id: Option<&str>,
) -> SelectionOutcome<'a> {
    if selection.item_ids.is_empty() {
        let commentary = if selection.commentary.trim().is_empty() {
            DEFAULT_NO_LOOK_MESSAGE.to_string()
        } else {
            selection.commentary.clone()
        };
        return SelectionOutcome::NoLook { commentary };
    }

    if let Some(mandatory) = mandatory_id {
        if !selection.item_ids.iter().any(|id| id == mandatory) {
            return SelectionOutcome::MissingMandatory {
                commentary: selection.commentary.clone(),
            };
        }
    }

    let by_id: HashMap<&str, &ClothingItem> =
        wardrobe.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut items = Vec::with_capacity(selection.item_ids.len());
    let mut missing = Vec::new();
    for id in &selection.item_ids {
        match by_id.get(id.as_str()) {
            Some(item) => items.push(*item),
            None => missing.push(id.clone()),
        }
    }

    if !missing.is_empty() {
        return SelectionOutcome::Unresolved { missing };
    }

    SelectionOutcome::Look {
        items,
        commentary: selection.commentary.clone(),
    }
}

/// 重複回避用にID組み合わせを正規化（ソート済み）
pub fn combination_key(item_ids: &[String]) -> Vec<String> {
    let mut key = item_ids.to_vec();
    key.sort();
    key
}
