//! メタデータ一覧ファイル
//!
//! 画像を含まないレコードの配列を `<key>.json` に丸ごと保存する。
//! 読み込み時に形式が合わない（破損・旧形式）場合は一覧ごと破棄して空から始める。

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// 旧形式（画像をインラインで持っていた）の判定に使うフィールド名
const LEGACY_IMAGE_FIELD: &str = "image";

pub struct MetadataFile<T> {
    key: String,
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> MetadataFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            key: key.to_string(),
            path: dir.join(format!("{}.json", key)),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 一覧を読み込み
    ///
    /// 存在しない場合、破損している場合、旧形式の場合はいずれも空を返す。
    pub fn load(&self) -> Vec<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "メタデータの読み込みに失敗");
                return Vec::new();
            }
        };

        let value: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "メタデータが破損しているため破棄します");
                self.discard();
                return Vec::new();
            }
        };

        let Some(records) = value.as_array() else {
            tracing::warn!(key = %self.key, "メタデータが配列ではないため破棄します");
            self.discard();
            return Vec::new();
        };

        if records.iter().any(is_legacy_record) {
            tracing::warn!(key = %self.key, "画像を含む旧形式のメタデータを検出、破棄します");
            self.discard();
            return Vec::new();
        }

        match serde_json::from_value(value) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "メタデータの形式が不正なため破棄します");
                self.discard();
                Vec::new()
            }
        }
    }

    /// 一覧を丸ごと保存
    pub fn save(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        let written =
            fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn discard(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::error!(key = %self.key, error = %e, "メタデータの削除に失敗");
            }
        }
    }
}

fn is_legacy_record(record: &Value) -> bool {
    record
        .as_object()
        .is_some_and(|obj| obj.contains_key(LEGACY_IMAGE_FIELD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: String,
        name: String,
    }

    fn record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            name: format!("name-{}", id),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "wardrobe");
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "wardrobe");

        file.save(&[record("a"), record("b")]).unwrap();
        assert_eq!(file.load(), vec![record("a"), record("b")]);
    }

    #[test]
    fn test_failed_save_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "wardrobe");
        fs::create_dir_all(file.path().join("sub")).unwrap();

        assert!(file.save(&[record("a")]).is_err());
        assert!(!dir.path().join("wardrobe.json.tmp").exists());
    }

    #[test]
    fn test_legacy_format_discarded() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "wardrobe");
        fs::write(
            file.path(),
            r#"[{"id": "a", "name": "x", "image": "data:image/jpeg;base64,AAAA"}]"#,
        )
        .unwrap();

        assert!(file.load().is_empty());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_corrupted_file_discarded() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "saved_looks");
        fs::write(file.path(), "{ invalid json").unwrap();

        assert!(file.load().is_empty());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_wrong_shape_discarded() {
        let dir = tempdir().unwrap();
        let file: MetadataFile<Record> = MetadataFile::new(dir.path(), "wardrobe");

        fs::write(file.path(), r#"{"id": "a"}"#).unwrap();
        assert!(file.load().is_empty());

        fs::write(file.path(), r#"[{"id": 1}]"#).unwrap();
        assert!(file.load().is_empty());
    }
}
