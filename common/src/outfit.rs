//! コーディネート組み立て
//!
//! 選ばれたアイテム列をカテゴリごとのスロットに振り分ける純粋関数。
//! 単数スロットは入力順で後勝ち、アクセサリーは順に蓄積する。
//! 完全性（トップス+ボトムス+靴など）の検証はここでは行わない。

use crate::catalog::Category;
use crate::types::ClothingItem;

/// スロット構造のコーディネート（永続化しない）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outfit<'a> {
    pub top: Option<&'a ClothingItem>,
    pub bottom: Option<&'a ClothingItem>,
    pub dress: Option<&'a ClothingItem>,
    pub outerwear: Option<&'a ClothingItem>,
    pub shoes: Option<&'a ClothingItem>,
    pub accessories: Vec<&'a ClothingItem>,
}

impl<'a> Outfit<'a> {
    /// 試着画像生成に渡す順序で全アイテムを列挙
    ///
    /// ワンピース → トップス → ボトムス → アウター → 靴 → アクセサリー
    pub fn pieces(&self) -> Vec<&'a ClothingItem> {
        [self.dress, self.top, self.bottom, self.outerwear, self.shoes]
            .into_iter()
            .flatten()
            .chain(self.accessories.iter().copied())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
            && self.bottom.is_none()
            && self.dress.is_none()
            && self.outerwear.is_none()
            && self.shoes.is_none()
            && self.accessories.is_empty()
    }
}

/// アイテム列からコーディネートを組み立てる
pub fn assemble_outfit<'a, I>(items: I) -> Outfit<'a>
where
    I: IntoIterator<Item = &'a ClothingItem>,
{
    let mut outfit = Outfit::default();

    for item in items {
        match item.category() {
            Category::Top => outfit.top = Some(item),
            Category::Bottom => outfit.bottom = Some(item),
            Category::Dress => outfit.dress = Some(item),
            Category::Outerwear => outfit.outerwear = Some(item),
            Category::Shoes => outfit.shoes = Some(item),
            Category::Accessories => outfit.accessories.push(item),
            // 対応スロットなし
            Category::IntimatesAndBeach | Category::Sportswear => {}
        }
    }

    outfit
}
