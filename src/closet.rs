//! ワードローブのアプリケーション状態
//!
//! メモリ上のワードローブ・保存済みルック・画像ストア・スタイリスト依頼を保持する。
//! 永続化は「画像を先に書き、次にメタデータ」の順で行う。

use crate::error::{Result, WardrobeError};
use crate::store::{ImageKind, ImageStore, MetadataFile};
use std::path::Path;
use wardrobe_ai_common::{Category, ClothingItem, ItemDetails, SavedLook, Style, StylistRequest};

/// スタイリングに必要な最低アイテム数
pub const MIN_WARDROBE_FOR_STYLIST: usize = 3;

const WARDROBE_KEY: &str = "wardrobe";
const SAVED_LOOKS_KEY: &str = "saved_looks";

/// メタデータ保存の結果
///
/// 保存に失敗してもメモリ上の状態は維持される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    MemoryOnly,
}

impl PersistOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistOutcome::Saved)
    }
}

/// 保存前のルック（IDは保存時に採番）
#[derive(Debug, Clone)]
pub struct LookDraft {
    pub image: String,
    pub commentary: String,
    pub item_ids: Vec<String>,
    pub occasion: String,
    pub style: String,
}

/// 一覧の絞り込み条件（Noneは「すべて」）
#[derive(Debug, Clone, Default)]
pub struct WardrobeFilter {
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub style: Option<Style>,
}

impl WardrobeFilter {
    pub fn matches(&self, item: &ClothingItem) -> bool {
        let category_ok = self.category.map_or(true, |c| item.details.category == c);
        let subcategory_ok = self
            .subcategory
            .as_deref()
            .map_or(true, |s| item.details.subcategory.eq_ignore_ascii_case(s));
        let style_ok = self.style.map_or(true, |s| item.details.style == s);

        category_ok && subcategory_ok && style_ok
    }
}

pub struct Closet {
    images: ImageStore,
    wardrobe_file: MetadataFile<ClothingItem>,
    looks_file: MetadataFile<SavedLook>,
    wardrobe: Vec<ClothingItem>,
    /// 画像が見つからないアイテム（表示しないが保存は維持）
    orphan_items: Vec<ClothingItem>,
    looks: Vec<SavedLook>,
    orphan_looks: Vec<SavedLook>,
    pending_request: Option<StylistRequest>,
    last_id_millis: i64,
}

impl Closet {
    /// データディレクトリからワードローブを読み込む
    ///
    /// 画像ストアを開けない場合は読み取り専用で開き、変更操作はすべて拒否する。
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;

        let images = match ImageStore::open(data_dir) {
            Ok(images) => images,
            Err(e) => {
                tracing::error!(error = %e, "画像ストアを開けません。読み取り専用で続行します");
                ImageStore::read_only(data_dir)
            }
        };
        let wardrobe_file: MetadataFile<ClothingItem> = MetadataFile::new(data_dir, WARDROBE_KEY);
        let looks_file: MetadataFile<SavedLook> = MetadataFile::new(data_dir, SAVED_LOOKS_KEY);

        let mut wardrobe = Vec::new();
        let mut orphan_items = Vec::new();
        for mut item in wardrobe_file.load() {
            item.image = load_image(&images, ImageKind::Clothing, &item.id);
            if item.is_usable() {
                wardrobe.push(item);
            } else {
                orphan_items.push(item);
            }
        }

        let mut looks = Vec::new();
        let mut orphan_looks = Vec::new();
        for mut look in looks_file.load() {
            look.image = load_image(&images, ImageKind::Look, &look.id);
            if look.is_usable() {
                looks.push(look);
            } else {
                orphan_looks.push(look);
            }
        }

        if !orphan_items.is_empty() || !orphan_looks.is_empty() {
            tracing::warn!(
                items = orphan_items.len(),
                looks = orphan_looks.len(),
                "画像が見つからないレコードを一覧から除外しました"
            );
        }
        tracing::debug!(items = wardrobe.len(), looks = looks.len(), "ワードローブを読み込みました");

        Ok(Self {
            images,
            wardrobe_file,
            looks_file,
            wardrobe,
            orphan_items,
            looks,
            orphan_looks,
            pending_request: None,
            last_id_millis: 0,
        })
    }

    pub fn is_read_only(&self) -> bool {
        !self.images.is_writable()
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(WardrobeError::Storage("読み取り専用のため変更できません".to_string()));
        }
        Ok(())
    }

    /// 画像付きのアイテム一覧（新しい順）
    pub fn wardrobe(&self) -> &[ClothingItem] {
        &self.wardrobe
    }

    pub fn saved_looks(&self) -> &[SavedLook] {
        &self.looks
    }

    pub fn item(&self, id: &str) -> Option<&ClothingItem> {
        self.wardrobe.iter().find(|item| item.id == id)
    }

    pub fn look(&self, id: &str) -> Option<&SavedLook> {
        self.looks.iter().find(|look| look.id == id)
    }

    pub fn filter_wardrobe(&self, filter: &WardrobeFilter) -> Vec<&ClothingItem> {
        self.wardrobe.iter().filter(|item| filter.matches(item)).collect()
    }

    /// ルックで使われているアイテム（削除済みの参照は省略）
    pub fn items_for_look(&self, look: &SavedLook) -> Vec<&ClothingItem> {
        look.item_ids.iter().filter_map(|id| self.item(id)).collect()
    }

    /// スタイリングできるだけのアイテムがあるか確認
    pub fn ensure_stylable(&self) -> Result<()> {
        match self.wardrobe.len() {
            0 => Err(WardrobeError::EmptyWardrobe),
            n if n < MIN_WARDROBE_FOR_STYLIST => Err(WardrobeError::WardrobeTooSmall {
                required: MIN_WARDROBE_FOR_STYLIST,
                actual: n,
            }),
            _ => Ok(()),
        }
    }

    /// 解析済みアイテムを一括登録
    ///
    /// 画像をすべて書き込んでからメタデータを先頭に追加する。
    /// 画像の書き込みに失敗した場合、メタデータは変更しない。
    pub fn add_items(
        &mut self,
        entries: Vec<(ItemDetails, String)>,
    ) -> Result<(Vec<ClothingItem>, PersistOutcome)> {
        self.ensure_writable()?;
        if entries.is_empty() {
            return Ok((Vec::new(), PersistOutcome::Saved));
        }

        let millis = self.next_millis();
        let new_items: Vec<ClothingItem> = entries
            .into_iter()
            .enumerate()
            .map(|(index, (details, image))| {
                ClothingItem::new(format!("item-{}-{}", millis, index), details, image)
            })
            .collect();

        for (written, item) in new_items.iter().enumerate() {
            if let Err(e) = self.images.put(ImageKind::Clothing, &item.id, &item.image) {
                // 書き込み済みの画像を片付ける
                for done in &new_items[..written] {
                    if let Err(cleanup) = self.images.delete(ImageKind::Clothing, &done.id) {
                        tracing::warn!(id = %done.id, error = %cleanup, "画像の後片付けに失敗");
                    }
                }
                return Err(e);
            }
        }

        let mut wardrobe = new_items.clone();
        wardrobe.append(&mut self.wardrobe);
        self.wardrobe = wardrobe;

        tracing::info!(count = new_items.len(), "アイテムを登録しました");
        let outcome = self.persist_wardrobe();
        Ok((new_items, outcome))
    }

    /// メタデータを更新（画像はそのまま）
    pub fn update_item(&mut self, id: &str, details: ItemDetails) -> Result<PersistOutcome> {
        self.ensure_writable()?;
        let item = self
            .wardrobe
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| WardrobeError::ItemNotFound(id.to_string()))?;

        item.details = details;
        Ok(self.persist_wardrobe())
    }

    /// アイテムを削除（画像→メタデータの順、存在しなくてもOK）
    pub fn delete_item(&mut self, id: &str) -> Result<PersistOutcome> {
        self.ensure_writable()?;
        self.images.delete(ImageKind::Clothing, id)?;

        let before = self.wardrobe.len() + self.orphan_items.len();
        self.wardrobe.retain(|item| item.id != id);
        self.orphan_items.retain(|item| item.id != id);

        if self.wardrobe.len() + self.orphan_items.len() == before {
            tracing::debug!(id, "削除対象のアイテムはありません");
            return Ok(PersistOutcome::Saved);
        }
        Ok(self.persist_wardrobe())
    }

    /// ルックを保存（画像→メタデータの順）
    pub fn save_look(&mut self, draft: LookDraft) -> Result<(SavedLook, PersistOutcome)> {
        self.ensure_writable()?;
        let look = SavedLook {
            id: format!("look-{}", self.next_millis()),
            image: draft.image,
            commentary: draft.commentary,
            item_ids: draft.item_ids,
            occasion: draft.occasion,
            style: draft.style,
        };

        self.images.put(ImageKind::Look, &look.id, &look.image)?;
        self.looks.insert(0, look.clone());

        tracing::info!(id = %look.id, "ルックを保存しました");
        let outcome = self.persist_looks();
        Ok((look, outcome))
    }

    pub fn delete_look(&mut self, id: &str) -> Result<PersistOutcome> {
        self.ensure_writable()?;
        self.images.delete(ImageKind::Look, id)?;

        let before = self.looks.len() + self.orphan_looks.len();
        self.looks.retain(|look| look.id != id);
        self.orphan_looks.retain(|look| look.id != id);

        if self.looks.len() + self.orphan_looks.len() == before {
            return Ok(PersistOutcome::Saved);
        }
        Ok(self.persist_looks())
    }

    /// 「このアイテムでルックを作る」依頼を登録
    pub fn request_looks_with(
        &mut self,
        item_id: &str,
        occasion: &str,
        style: &str,
        num_looks: usize,
    ) -> Result<()> {
        if self.item(item_id).is_none() {
            return Err(WardrobeError::ItemNotFound(item_id.to_string()));
        }

        self.pending_request = Some(StylistRequest {
            main_piece_id: item_id.to_string(),
            occasion: occasion.to_string(),
            style: style.to_string(),
            num_looks,
        });
        Ok(())
    }

    /// 依頼を取り出す（一度だけ）
    pub fn take_stylist_request(&mut self) -> Option<StylistRequest> {
        self.pending_request.take()
    }

    fn persist_wardrobe(&self) -> PersistOutcome {
        let all: Vec<ClothingItem> = self
            .wardrobe
            .iter()
            .chain(self.orphan_items.iter())
            .cloned()
            .collect();

        match self.wardrobe_file.save(&all) {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                tracing::error!(error = %e, "ワードローブの保存に失敗しました（メモリ上の変更は維持）");
                PersistOutcome::MemoryOnly
            }
        }
    }

    fn persist_looks(&self) -> PersistOutcome {
        let all: Vec<SavedLook> = self
            .looks
            .iter()
            .chain(self.orphan_looks.iter())
            .cloned()
            .collect();

        match self.looks_file.save(&all) {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                tracing::error!(error = %e, "ルックの保存に失敗しました（メモリ上の変更は維持）");
                PersistOutcome::MemoryOnly
            }
        }
    }

    /// 採番用のミリ秒（同一ミリ秒内の衝突を避ける）
    fn next_millis(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id_millis = now.max(self.last_id_millis + 1);
        self.last_id_millis
    }
}

fn load_image(images: &ImageStore, kind: ImageKind, id: &str) -> String {
    match images.get(kind, id) {
        Ok(image) => image.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(id, error = %e, "画像の読み込みに失敗");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wardrobe_ai_common::Season;

    fn details(name: &str, category: Category) -> ItemDetails {
        ItemDetails {
            name: name.to_string(),
            category,
            subcategory: category.subcategories()[0].to_string(),
            color: "Azul".to_string(),
            style: Style::Casual,
            fabric: "Algodão".to_string(),
            fit: "Regular".to_string(),
            formality_level: 4,
            season: vec![Season::AllYear],
            versatility: 7,
        }
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();

        let (first, _) = closet
            .add_items(vec![(details("A", Category::Top), "img-a".into())])
            .unwrap();
        let (second, _) = closet
            .add_items(vec![(details("B", Category::Top), "img-b".into())])
            .unwrap();

        assert_ne!(first[0].id, second[0].id);
        assert!(first[0].id.starts_with("item-"));
        assert!(first[0].id.ends_with("-0"));
    }

    #[test]
    fn test_newest_first() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();

        closet
            .add_items(vec![(details("Old", Category::Top), "img".into())])
            .unwrap();
        closet
            .add_items(vec![
                (details("New 1", Category::Bottom), "img".into()),
                (details("New 2", Category::Shoes), "img".into()),
            ])
            .unwrap();

        let names: Vec<&str> = closet.wardrobe().iter().map(|i| i.details.name.as_str()).collect();
        assert_eq!(names, vec!["New 1", "New 2", "Old"]);
    }

    #[test]
    fn test_filter_wardrobe() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();

        let mut elegant = details("Blazer", Category::Outerwear);
        elegant.style = Style::Elegante;
        closet
            .add_items(vec![
                (details("Camiseta", Category::Top), "img".into()),
                (elegant, "img".into()),
                (details("Jeans", Category::Bottom), "img".into()),
            ])
            .unwrap();

        let all = closet.filter_wardrobe(&WardrobeFilter::default());
        assert_eq!(all.len(), 3);

        let tops = closet.filter_wardrobe(&WardrobeFilter {
            category: Some(Category::Top),
            ..Default::default()
        });
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].details.name, "Camiseta");

        let elegant = closet.filter_wardrobe(&WardrobeFilter {
            style: Some(Style::Elegante),
            ..Default::default()
        });
        assert_eq!(elegant.len(), 1);
        assert_eq!(elegant[0].details.name, "Blazer");
    }

    #[test]
    fn test_update_unknown_item() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();

        let err = closet.update_item("item-x", details("X", Category::Top)).unwrap_err();
        assert!(matches!(err, WardrobeError::ItemNotFound(_)));
    }

    #[test]
    fn test_stylist_request_is_one_shot() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();
        let (items, _) = closet
            .add_items(vec![(details("Saia", Category::Bottom), "img".into())])
            .unwrap();

        closet
            .request_looks_with(&items[0].id, "Trabalho", "Elegante", 2)
            .unwrap();

        let request = closet.take_stylist_request().unwrap();
        assert_eq!(request.main_piece_id, items[0].id);
        assert_eq!(request.num_looks, 2);
        assert!(closet.take_stylist_request().is_none());
    }

    #[test]
    fn test_ensure_stylable() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::open(dir.path()).unwrap();
        assert!(matches!(closet.ensure_stylable(), Err(WardrobeError::EmptyWardrobe)));

        closet
            .add_items(vec![
                (details("A", Category::Top), "img".into()),
                (details("B", Category::Bottom), "img".into()),
            ])
            .unwrap();
        assert!(matches!(
            closet.ensure_stylable(),
            Err(WardrobeError::WardrobeTooSmall { required: 3, actual: 2 })
        ));

        closet
            .add_items(vec![(details("C", Category::Shoes), "img".into())])
            .unwrap();
        assert!(closet.ensure_stylable().is_ok());
    }
}
