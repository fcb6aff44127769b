//! APIレスポンスパーサー
//!
//! AIのレスポンスからJSONオブジェクトを抽出し、
//! ルック選定結果・アイテム解析結果としてパース・検証する

use crate::catalog::{Category, Season, Style};
use crate::error::{Error, Result};
use crate::types::ItemDetails;
use serde::Deserialize;

/// formality_level / versatility の範囲
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use wardrobe_ai_common::extract_json;
///
/// let response = "Aqui está: {\"itemIds\": [], \"commentary\": \"ok\"}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// ルック選定レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookSelection {
    pub item_ids: Vec<String>,
    pub commentary: String,
}

/// ルック選定レスポンスをパース
///
/// `itemIds` と `commentary` はどちらも必須。
pub fn parse_look_response(response: &str) -> Result<LookSelection> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("ルック選定 JSONパースエラー: {}", e)))
}

/// 解析レスポンスの生形式（数値は小数で返ることがある）
#[derive(Debug, Deserialize)]
struct RawItemAnalysis {
    name: String,
    category: String,
    subcategory: String,
    color: String,
    style: String,
    fabric: String,
    fit: String,
    formality_level: f64,
    season: Vec<String>,
    versatility: f64,
}

/// アイテム解析レスポンスをパース・検証
///
/// 10項目すべて必須。カテゴリ・スタイル・季節は閉じた語彙のみ、
/// formality_level / versatility は1〜10の整数のみ受け付ける。
pub fn parse_analysis_response(response: &str) -> Result<ItemDetails> {
    let json_str = extract_json(response)?;
    let raw: RawItemAnalysis = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("解析 JSONパースエラー: {}", e)))?;

    let category: Category = raw
        .category
        .parse()
        .map_err(|_| Error::Validation(format!("不正なカテゴリ: {}", raw.category)))?;

    let style: Style = raw
        .style
        .parse()
        .map_err(|_| Error::Validation(format!("不正なスタイル: {}", raw.style)))?;

    let season = raw
        .season
        .iter()
        .map(|s| {
            s.parse::<Season>()
                .map_err(|_| Error::Validation(format!("不正な季節: {}", s)))
        })
        .collect::<Result<Vec<_>>>()?;
    if season.is_empty() {
        return Err(Error::Validation("季節が空です".into()));
    }

    Ok(ItemDetails {
        name: raw.name,
        category,
        subcategory: raw.subcategory,
        color: raw.color,
        style,
        fabric: raw.fabric,
        fit: raw.fit,
        formality_level: to_score("formality_level", raw.formality_level)?,
        season,
        versatility: to_score("versatility", raw.versatility)?,
    })
}

fn to_score(field: &str, value: f64) -> Result<u8> {
    if value.fract() != 0.0 || value < f64::from(*SCORE_RANGE.start()) || value > f64::from(*SCORE_RANGE.end()) {
        return Err(Error::Validation(format!("{}は1〜10の整数: {}", field, value)));
    }
    Ok(value as u8)
}
