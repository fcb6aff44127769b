//! スタイリストAIの抽象化
//!
//! ルック選定・アイテム解析・画像生成の3操作だけを持つ狭いインターフェース。
//! 実装は `gemini::GeminiClient`、テストではモックを差し込む。
//! 自動リトライは行わない。

use crate::error::{Result, WardrobeError};
use async_trait::async_trait;
use wardrobe_ai_common::media::{InlineImage, DEFAULT_MIME_TYPE};
use wardrobe_ai_common::{
    build_try_on_prompt, ClothingItem, ItemDetails, LookSelection, Outfit,
    BACKGROUND_REMOVAL_PROMPT,
};

/// ルック選定の入力
#[derive(Debug, Clone, Copy)]
pub struct LookRequest<'a> {
    pub wardrobe: &'a [ClothingItem],
    pub occasion: &'a str,
    pub style: &'a str,
    /// 提案済みの組み合わせ（ソート済みID列）
    pub existing: &'a [Vec<String>],
    /// 必ず含めるアイテム
    pub mandatory_id: Option<&'a str>,
}

#[async_trait]
pub trait StylistAi: Send + Sync {
    /// ワードローブから1ルックを選ぶ
    async fn select_look(&self, request: &LookRequest<'_>) -> Result<LookSelection>;

    /// アイテム画像から10属性を解析
    async fn analyze_item(&self, image: &str) -> Result<ItemDetails>;

    /// 画像列と指示文から画像を1枚生成
    ///
    /// 呼び出しは成功したが画像が返らなかった場合は `None`。
    async fn generate_image(&self, images: &[String], instruction: &str) -> Result<Option<String>>;
}

/// 背景除去（失敗時は元画像をそのまま返す）
///
/// 出力は常に image/jpeg の data URI として扱う。
pub async fn remove_background(ai: &dyn StylistAi, image: &str) -> String {
    match ai
        .generate_image(&[image.to_string()], BACKGROUND_REMOVAL_PROMPT)
        .await
    {
        Ok(Some(generated)) => {
            let parsed = InlineImage::parse(&generated);
            InlineImage::new(DEFAULT_MIME_TYPE, parsed.data).to_data_uri()
        }
        Ok(None) => {
            tracing::warn!("背景除去で画像が返らなかったため元画像を使用します");
            image.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "背景除去に失敗したため元画像を使用します");
            image.to_string()
        }
    }
}

/// バーチャル試着画像を生成
///
/// モデル写真を先頭に、コーディネートの各アイテム画像を続けて渡す。
pub async fn virtual_try_on(
    ai: &dyn StylistAi,
    model_photo: &str,
    outfit: &Outfit<'_>,
) -> Result<String> {
    if outfit.is_empty() {
        return Err(WardrobeError::EmptyOutfit);
    }

    let images: Vec<String> = std::iter::once(model_photo.to_string())
        .chain(outfit.pieces().iter().map(|item| item.image.clone()))
        .collect();
    let prompt = build_try_on_prompt(outfit);

    ai.generate_image(&images, &prompt)
        .await?
        .ok_or(WardrobeError::NoImageReturned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use wardrobe_ai_common::{assemble_outfit, Category, Season, Style};

    /// generate_imageの結果だけを差し替えるモック
    struct ImageOnlyAi {
        reply: fn() -> Result<Option<String>>,
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl ImageOnlyAi {
        fn new(reply: fn() -> Result<Option<String>>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StylistAi for ImageOnlyAi {
        async fn select_look(&self, _request: &LookRequest<'_>) -> Result<LookSelection> {
            Err(WardrobeError::ApiCall("unused".into()))
        }

        async fn analyze_item(&self, _image: &str) -> Result<ItemDetails> {
            Err(WardrobeError::ApiCall("unused".into()))
        }

        async fn generate_image(&self, images: &[String], instruction: &str) -> Result<Option<String>> {
            self.calls.lock().push((images.len(), instruction.to_string()));
            (self.reply)()
        }
    }

    fn piece(id: &str, category: Category) -> ClothingItem {
        let details = ItemDetails {
            name: format!("Peça {}", id),
            category,
            subcategory: category.subcategories()[0].to_string(),
            color: "Preto".to_string(),
            style: Style::Casual,
            fabric: "Algodão".to_string(),
            fit: "Regular".to_string(),
            formality_level: 4,
            season: vec![Season::AllYear],
            versatility: 7,
        };
        ClothingItem::new(id, details, format!("data:image/png;base64,{}", id))
    }

    #[tokio::test]
    async fn test_remove_background_forces_jpeg() {
        let ai = ImageOnlyAi::new(|| Ok(Some("data:image/png;base64,CLEAN".to_string())));
        let result = remove_background(&ai, "data:image/jpeg;base64,ORIG").await;
        assert_eq!(result, "data:image/jpeg;base64,CLEAN");

        let calls = ai.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, BACKGROUND_REMOVAL_PROMPT);
    }

    #[tokio::test]
    async fn test_remove_background_fallback_on_error() {
        let ai = ImageOnlyAi::new(|| Err(WardrobeError::ApiCall("500".into())));
        let result = remove_background(&ai, "data:image/jpeg;base64,ORIG").await;
        assert_eq!(result, "data:image/jpeg;base64,ORIG");
    }

    #[tokio::test]
    async fn test_remove_background_fallback_on_no_image() {
        let ai = ImageOnlyAi::new(|| Ok(None));
        let result = remove_background(&ai, "data:image/jpeg;base64,ORIG").await;
        assert_eq!(result, "data:image/jpeg;base64,ORIG");
    }

    #[tokio::test]
    async fn test_virtual_try_on_sends_model_first() {
        let ai = ImageOnlyAi::new(|| Ok(Some("data:image/png;base64,LOOK".to_string())));
        let top = piece("top", Category::Top);
        let shoes = piece("shoes", Category::Shoes);
        let outfit = assemble_outfit([&top, &shoes]);

        let result = virtual_try_on(&ai, "data:image/jpeg;base64,MODEL", &outfit).await.unwrap();
        assert_eq!(result, "data:image/png;base64,LOOK");

        let calls = ai.calls.lock();
        assert_eq!(calls[0].0, 3);
        assert!(calls[0].1.contains("virtual fitting room"));
    }

    #[tokio::test]
    async fn test_virtual_try_on_no_image_is_error() {
        let ai = ImageOnlyAi::new(|| Ok(None));
        let top = piece("top", Category::Top);
        let outfit = assemble_outfit([&top]);

        let err = virtual_try_on(&ai, "MODEL", &outfit).await.unwrap_err();
        assert!(matches!(err, WardrobeError::NoImageReturned));
    }

    #[tokio::test]
    async fn test_virtual_try_on_empty_outfit() {
        let ai = ImageOnlyAi::new(|| Ok(Some("x".to_string())));
        let outfit = Outfit::default();

        let err = virtual_try_on(&ai, "MODEL", &outfit).await.unwrap_err();
        assert!(matches!(err, WardrobeError::EmptyOutfit));
        assert!(ai.calls.lock().is_empty());
    }
}
