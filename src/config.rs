use crate::error::{WardrobeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// APIキーの環境変数名
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// ルック選定・アイテム解析用
    pub text_model: String,
    /// 背景除去・試着画像生成用
    pub image_model: String,
    /// ワードローブデータの保存先（未指定時は ~/.local/share/wardrobe-ai）
    pub data_dir: Option<PathBuf>,
    /// 登録時の縮小サイズ（長辺px）
    pub max_image_size: u32,
    /// 登録時のJPEG品質 (0-100)
    pub jpeg_quality: u8,
    pub timeout_seconds: u64,
    /// 試着に使うモデル写真
    pub model_photo: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            text_model: "gemini-2.5-flash".into(),
            image_model: "gemini-2.5-flash-image-preview".into(),
            data_dir: None,
            max_image_size: 600,
            jpeg_quality: 70,
            timeout_seconds: 120,
            model_photo: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WardrobeError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("wardrobe-ai").join("config.json"))
    }

    /// データ保存先を解決
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .ok_or_else(|| WardrobeError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("wardrobe-ai"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.api_key.clone().ok_or(WardrobeError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}
