//! ルック生成ループ
//!
//! 要求数だけ順番にルック選定を行い、採用したものは試着画像を生成する。
//! 各回の選定には、それまでに採用した組み合わせ（ソート済みID列）を渡して重複を避ける。

use crate::ai::{virtual_try_on, LookRequest, StylistAi};
use crate::closet::LookDraft;
use crate::error::Result;
use wardrobe_ai_common::{
    assemble_outfit, combination_key, validate_selection, ClothingItem, SelectionOutcome,
    StylistRequest,
};

/// 選定は成功したがルックが1つもできなかった場合の説明
pub const NO_NEW_LOOKS_MESSAGE: &str =
    "Não foi possível gerar novos looks com os critérios selecionados. Tente novamente.";

/// ルック生成の条件
#[derive(Debug, Clone)]
pub struct LookOptions {
    pub occasion: String,
    pub style: String,
    pub num_looks: usize,
    /// 必ず含めるアイテム
    pub mandatory_id: Option<String>,
}

impl From<StylistRequest> for LookOptions {
    fn from(request: StylistRequest) -> Self {
        Self {
            occasion: request.occasion,
            style: request.style,
            num_looks: request.num_looks,
            mandatory_id: Some(request.main_piece_id),
        }
    }
}

/// 生成されたルック（未保存）
#[derive(Debug, Clone)]
pub struct GeneratedLook {
    pub image: String,
    pub commentary: String,
    /// レスポンス順のID
    pub item_ids: Vec<String>,
}

impl GeneratedLook {
    pub fn into_draft(self, options: &LookOptions) -> LookDraft {
        LookDraft {
            image: self.image,
            commentary: self.commentary,
            item_ids: self.item_ids,
            occasion: options.occasion.clone(),
            style: options.style.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub looks: Vec<GeneratedLook>,
    /// ルックが1つもできなかった場合の説明
    pub message: Option<String>,
    /// 採用済みの組み合わせ（ソート済み）
    pub exclusions: Vec<Vec<String>>,
}

/// ルックを生成する
///
/// * 選定結果が空、または必須アイテム欠落の場合はそこで打ち切る
/// * ワードローブにないIDを含む候補は破棄して次へ進む
/// * AI呼び出しのエラーはそのまま返す
///
/// # Arguments
/// * `existing` - 事前に除外する組み合わせ
/// * `model_photo` - 試着に使うモデル写真（data URI）
pub async fn generate_looks(
    ai: &dyn StylistAi,
    wardrobe: &[ClothingItem],
    options: &LookOptions,
    existing: Vec<Vec<String>>,
    model_photo: &str,
) -> Result<GenerationReport> {
    let mut report = GenerationReport {
        exclusions: existing,
        ..Default::default()
    };

    for round in 0..options.num_looks {
        let request = LookRequest {
            wardrobe,
            occasion: &options.occasion,
            style: &options.style,
            existing: &report.exclusions,
            mandatory_id: options.mandatory_id.as_deref(),
        };

        let selection = ai.select_look(&request).await?;
        tracing::debug!(round, ids = ?selection.item_ids, "ルック選定結果");

        match validate_selection(&selection, wardrobe, options.mandatory_id.as_deref()) {
            SelectionOutcome::Look { items, commentary } => {
                let outfit = assemble_outfit(items.iter().copied());
                let image = virtual_try_on(ai, model_photo, &outfit).await?;

                report.exclusions.push(combination_key(&selection.item_ids));
                report.looks.push(GeneratedLook {
                    image,
                    commentary,
                    item_ids: selection.item_ids,
                });
            }
            SelectionOutcome::NoLook { commentary }
            | SelectionOutcome::MissingMandatory { commentary } => {
                tracing::info!(round, "これ以上のルックは提案されませんでした");
                if report.looks.is_empty() && !commentary.trim().is_empty() {
                    report.message = Some(commentary);
                }
                break;
            }
            SelectionOutcome::Unresolved { missing } => {
                tracing::warn!(round, ?missing, "存在しないアイテムを含む候補を破棄しました");
            }
        }
    }

    if report.looks.is_empty() && report.message.is_none() {
        report.message = Some(NO_NEW_LOOKS_MESSAGE.to_string());
    }

    Ok(report)
}
