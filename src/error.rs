use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`wardrobe-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] wardrobe_ai_common::Error),

    #[error("ストレージエラー: {0}")]
    Storage(String),

    #[error("アイテムが見つかりません: {0}")]
    ItemNotFound(String),

    #[error("ワードローブが空です。先にアイテムを追加してください")]
    EmptyWardrobe,

    #[error("コーディネートには最低{required}点必要です（現在{actual}点）")]
    WardrobeTooSmall { required: usize, actual: usize },

    #[error("一度に登録できるのは{max}件までです（{actual}件）")]
    BatchTooLarge { max: usize, actual: usize },

    #[error("試着に使うアイテムがありません")]
    EmptyOutfit,

    #[error("AIが画像を返しませんでした。もう一度お試しください")]
    NoImageReturned,
}

pub type Result<T> = std::result::Result<T, WardrobeError>;
