//! プロンプト生成モジュール
//!
//! 外部AIに渡す指示文:
//! - build_look_prompt: ルック選定（スコアリング基準・出力規則込み）
//! - build_analysis_prompt: アイテム画像の属性解析
//! - BACKGROUND_REMOVAL_PROMPT: 背景除去
//! - build_try_on_prompt: バーチャル試着
//!
//! スコアリング式はAIへの方針指示であり、ローカルで計算はしない。

use crate::catalog::{Category, Season, Style, FITS};
use crate::outfit::Outfit;
use crate::types::ClothingItem;

/// ルック選定プロンプト生成
///
/// # Arguments
/// * `wardrobe` - 利用可能なアイテム（画像は含めない）
/// * `occasion` - シーン
/// * `style` - 希望スタイル
/// * `existing` - 既に提案済みのID組み合わせ（重複回避用）
/// * `main_item_id` - 必ず含めるアイテムID
pub fn build_look_prompt(
    wardrobe: &[ClothingItem],
    occasion: &str,
    style: &str,
    existing: &[Vec<String>],
    main_item_id: Option<&str>,
) -> String {
    // ClothingItemは画像をシリアライズしないのでそのまま渡せる
    let wardrobe_json = serde_json::to_string(wardrobe).unwrap_or_default();
    let existing_json = serde_json::to_string(existing).unwrap_or_default();

    let main_item_clause = main_item_id
        .map(|id| {
            format!(
                "\n- MANDATORY KEY PIECE: the look MUST include the item with id '{id}'. Build the whole combination around it."
            )
        })
        .unwrap_or_default();

    format!(
        r#"You are an AI fashion stylist specialised in the Brazilian women's market. Your mission is to create cohesive, appropriate and inspiring looks from the wardrobe provided.

Context:
- Desired style: "{style}"
- Occasion: "{occasion}"
- Available wardrobe (JSON with all attributes): {wardrobe_json}
- Looks already generated (avoid identical id combinations): {existing_json}{main_item_clause}

=== ANALYSIS METHOD ===

**STEP 1: INITIAL DIAGNOSIS**
- If there is a key piece, is it suitable for the occasion and style? If not, say so in the commentary.
- How many pieces per category/style exist in the wardrobe?
- Is there enough variety for the requested style?
- Is the occasion compatible with the chosen style?

**STEP 2: OCCASION x STYLE COMPATIBILITY**
- Work: OK Elegante, Minimalista, smart casual / NOT Esportivo, extreme Streetwear
- Gym/Exercise: OK Esportivo / NOT Elegante, Boho (explain they are inadequate)
- Party/Event: OK Elegante, Boho (depending on the event), sophisticated Minimalista / NOT Esportivo, extreme Casual
- Casual/Everyday: OK Casual, Minimalista, Boho, Streetwear / NOT very formal
- Date: OK Elegante, chic Casual, Boho, Minimalista / NOT Esportivo, sloppy

**STEP 3: SCORING**
For each candidate combination compute:
1. Main_Piece_Inclusion (0 or 100): 100 if the mandatory piece is in the look or none was given; 0 makes the combination invalid.
2. Style_Harmony (0-100): compatible styles; formality_level values within 2 points of each other.
3. Color_Compatibility (0-100): colours harmonise; at most 3 different colours.
4. Occasion_Appropriateness (0-100): average formality_level fits the occasion (Gym 1-3, Work 6-9, Party 7-10, Casual 3-6).
5. Completeness (0-100): top + bottom (or dress) + shoes are required; outerwear and accessories are a plus.
6. Uniqueness (0-100): differs from the existing combinations; penalise repeated pieces.

Total = (Main_Piece_Inclusion x 1.0) * [(Style_Harmony x 0.3) + (Color_Compatibility x 0.2) + (Occasion_Appropriateness x 0.3) + (Completeness x 0.15) + (Uniqueness x 0.05)]

**STEP 4: APPROVAL**
- Score >= 75: excellent look, return it with confidence.
- Score 60-74: acceptable look, mention its limitations.
- Score < 60: do not create a look; explain why.

=== RESPONSE SCENARIOS ===
1. Success (score >= 60): itemIds with the chosen ids and a motivating commentary explaining why the combination works for the occasion, with a styling tip.
2. No suitable pieces: empty itemIds and an educational commentary telling the user which pieces the wardrobe lacks for this style, or that the style does not suit the occasion and which styles do.
3. No new combinations: empty itemIds and a commentary saying every combination for this style and occasion has been explored, suggesting another style, another occasion or adding pieces.

=== MANDATORY TECHNICAL RULES ===
1. ALWAYS return valid JSON {{ "itemIds": [...], "commentary": "..." }}.
2. "itemIds" must be an array, even if empty [].
3. "commentary" must NEVER be empty; always give useful feedback.
4. At least 3 pieces for a complete look (unless it is a dress/jumpsuit with shoes).
5. If a mandatory piece was given it MUST be in "itemIds". If no look is possible with it, return an empty "itemIds" and explain why in "commentary".
6. NEVER repeat a combination from the already generated looks.
7. Prefer pieces with high "versatility".
8. Only use ids that exist in the wardrobe.
9. Write the commentary in Brazilian Portuguese."#
    )
}

/// 画像解析プロンプト生成
pub fn build_analysis_prompt() -> String {
    let categories = serde_json::to_string(&Category::labels()).unwrap_or_default();
    let styles = serde_json::to_string(&Style::labels()).unwrap_or_default();
    let seasons = serde_json::to_string(&Season::labels()).unwrap_or_default();
    let fits = FITS.join(", ");

    format!(
        r#"You are a fashion cataloguing expert with deep knowledge of the Brazilian women's market. Analyse the clothing item in the image and return a JSON object with EXACTLY these attributes (text values in Brazilian Portuguese):

1. "name" (string): descriptive name including material, cut or distinctive details when visible, e.g. "Camisa de linho manga bufante", "Calça jeans skinny cintura alta".
2. "category" (string): MUST be one of {categories}.
3. "subcategory" (string): specific subcategory within the category, e.g. "Blusas", "Camisetas", "Tênis".
4. "color" (string): main colour or dominant pattern, e.g. "Azul marinho", "Listrado preto e branco".
5. "style" (string): MUST be one of {styles}.
6. "fabric" (string): identifiable material or best estimate, or "Não identificável".
7. "fit" (string): one of {fits}.
8. "formality_level" (integer 1-10): 1-2 super casual, 3-4 casual, 5-6 smart casual, 7-8 elegant, 9-10 very formal.
9. "season" (array of strings): non-empty subset of {seasons}.
10. "versatility" (integer 1-10): 10 = goes with everything, 1 = very specific piece.

Style guide: Esportivo is only for exercise (formality 1-2); Casual is everyday wear (3-5); Elegante is formal or work wear (7-10); Minimalista has clean lines and neutral colours; Boho is free, natural, prints and textures; Streetwear is urban and oversized.

ALWAYS return complete, valid JSON. Every field is required; never leave a field null or empty. The chosen style must be consistent with formality_level. Output the JSON object only."#
    )
}

/// 背景除去の指示文
pub const BACKGROUND_REMOVAL_PROMPT: &str = "Isolate the main clothing item in this image and place it on a completely white, solid background. The result must be a sharp image of the garment, without shadows, on a pure white background.";

/// バーチャル試着プロンプト生成
pub fn build_try_on_prompt(outfit: &Outfit<'_>) -> String {
    let descriptions = outfit
        .pieces()
        .iter()
        .map(|item| format!("{} ({})", item.details.name, item.details.subcategory))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Act as a virtual fitting room. Dress the woman in the first image with the clothing items shown in the following images.
- Replace the clothes she is wearing with the pieces of the look.
- Keep the face, body and pose of the original photo.
- The look consists of: {descriptions}.

=== MANDATORY GENERATION RULES ===
1. Light background: the result MUST have a light, neutral background like an e-commerce or fashion catalogue photo.
2. Full framing: the image MUST show the model full body, head to toe. No part of the body or the look may be cropped.
3. Photorealism: the final result must be a photorealistic image of the woman wearing the complete look."#
    )
}
