//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use tempfile::tempdir;
use wardrobe_ai::error::WardrobeError;
use wardrobe_ai::{imaging, scanner};

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, WardrobeError::FolderNotFound(_)));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notas.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 存在しない画像ファイルの読み込み
#[test]
fn test_load_missing_image() {
    let err = imaging::load_image_file(Path::new("/nonexistent/look.png")).unwrap_err();
    assert!(matches!(err, WardrobeError::FileNotFound(_)));
}

/// WardrobeErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        WardrobeError::Config("テスト設定エラー".to_string()),
        WardrobeError::FileNotFound("modelo.jpg".to_string()),
        WardrobeError::FolderNotFound("/path/to/folder".to_string()),
        WardrobeError::ApiCall("API呼び出し失敗".to_string()),
        WardrobeError::ApiParse("candidates missing".to_string()),
        WardrobeError::Storage("不正なID".to_string()),
        WardrobeError::ItemNotFound("item-1-0".to_string()),
        WardrobeError::EmptyWardrobe,
        WardrobeError::EmptyOutfit,
        WardrobeError::NoImageReturned,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", WardrobeError::MissingApiKey);

    assert!(display.contains("APIキー"));
    assert!(display.contains("wardrobe-ai config"));
}

/// 件数を含むエラーメッセージ
#[test]
fn test_count_errors_display() {
    let err = WardrobeError::WardrobeTooSmall { required: 3, actual: 1 };
    let display = format!("{}", err);
    assert!(display.contains('3'));
    assert!(display.contains('1'));

    let err = WardrobeError::BatchTooLarge { max: 80, actual: 95 };
    assert!(format!("{}", err).contains("95"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: WardrobeError = io_err.into();

    assert!(matches!(err, WardrobeError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: WardrobeError = json_err.into();

    assert!(matches!(err, WardrobeError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = wardrobe_ai_common::Error::Validation("categoria desconhecida".to_string());
    let err: WardrobeError = common_err.into();

    assert!(matches!(err, WardrobeError::Common(_)));
    assert!(format!("{}", err).contains("categoria desconhecida"));
}

/// AIレスポンスの解析失敗はcommon経由で伝わる
#[test]
fn test_parse_failure_converts() {
    let result: wardrobe_ai::Result<_> =
        wardrobe_ai_common::parse_look_response("sem JSON aqui").map_err(WardrobeError::from);
    assert!(matches!(result, Err(WardrobeError::Common(_))));
}
