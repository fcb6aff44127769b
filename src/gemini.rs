//! Gemini API連携
//!
//! - テキストモデル: ルック選定・アイテム解析（JSONスキーマ指定）
//! - 画像モデル: 背景除去・バーチャル試着（画像を返す）

use crate::ai::{LookRequest, StylistAi};
use crate::config::Config;
use crate::error::{Result, WardrobeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use wardrobe_ai_common::media::InlineImage;
use wardrobe_ai_common::{
    build_analysis_prompt, build_look_prompt, parse_analysis_response, parse_look_response,
    Category, ItemDetails, LookSelection, Season, Style,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Deserialize)]
struct ResponseInlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

impl GeminiResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// テキストパートを連結
    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    /// 最初の画像パートをdata URIで取得
    fn first_image(&self) -> Option<String> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
            .map(|d| InlineImage::new(d.mime_type.clone(), d.data.clone()).to_data_uri())
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WardrobeError::ApiCall(format!("HTTPクライアントの作成に失敗: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            text_model: text_model.into(),
            image_model: image_model.into(),
        })
    }

    /// 設定からクライアントを作成（APIキーは環境変数優先）
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.get_api_key()?,
            config.text_model.clone(),
            config.image_model.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Gemini API呼び出し（共通処理）
    async fn call_gemini_api(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, model, self.api_key);
        tracing::debug!(model, "Gemini API呼び出し");

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| WardrobeError::ApiCall(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WardrobeError::ApiCall(format!("{} - {}", status, body)));
        }

        response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| WardrobeError::ApiParse(e.without_url().to_string()))
    }

    /// JSONスキーマ付きのテキスト生成
    async fn generate_json(&self, parts: Vec<Part>, schema: Value) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(schema),
                ..Default::default()
            },
        };

        let response = self.call_gemini_api(&self.text_model, &request).await?;
        response
            .text()
            .ok_or_else(|| WardrobeError::ApiParse("テキストが含まれていません".into()))
    }
}

#[async_trait]
impl StylistAi for GeminiClient {
    async fn select_look(&self, request: &LookRequest<'_>) -> Result<LookSelection> {
        let prompt = build_look_prompt(
            request.wardrobe,
            request.occasion,
            request.style,
            request.existing,
            request.mandatory_id,
        );

        let text = self
            .generate_json(vec![Part::Text { text: prompt }], look_schema())
            .await?;
        Ok(parse_look_response(&text)?)
    }

    async fn analyze_item(&self, image: &str) -> Result<ItemDetails> {
        let parts = vec![
            inline_part(image),
            Part::Text {
                text: build_analysis_prompt(),
            },
        ];

        let text = self.generate_json(parts, analysis_schema()).await?;
        Ok(parse_analysis_response(&text)?)
    }

    async fn generate_image(&self, images: &[String], instruction: &str) -> Result<Option<String>> {
        let mut parts: Vec<Part> = images.iter().map(|image| inline_part(image)).collect();
        parts.push(Part::Text {
            text: instruction.to_string(),
        });

        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["IMAGE".into(), "TEXT".into()]),
                ..Default::default()
            },
        };

        let response = self.call_gemini_api(&self.image_model, &request).await?;
        let image = response.first_image();
        if image.is_none() {
            tracing::debug!(text = ?response.text(), "画像パートがありません");
        }
        Ok(image)
    }
}

fn inline_part(image: &str) -> Part {
    let inline = InlineImage::parse(image);
    Part::InlineData {
        inline_data: InlineData {
            mime_type: inline.mime_type,
            data: inline.data,
        },
    }
}

fn look_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itemIds": { "type": "ARRAY", "items": { "type": "STRING" } },
            "commentary": { "type": "STRING" }
        },
        "required": ["itemIds", "commentary"]
    })
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "category": { "type": "STRING", "enum": Category::labels() },
            "subcategory": { "type": "STRING" },
            "color": { "type": "STRING" },
            "style": { "type": "STRING", "enum": Style::labels() },
            "fabric": { "type": "STRING" },
            "fit": { "type": "STRING" },
            "formality_level": { "type": "INTEGER" },
            "season": {
                "type": "ARRAY",
                "items": { "type": "STRING", "enum": Season::labels() }
            },
            "versatility": { "type": "INTEGER" }
        },
        "required": [
            "name", "category", "subcategory", "color", "style",
            "fabric", "fit", "formality_level", "season", "versatility"
        ]
    })
}
