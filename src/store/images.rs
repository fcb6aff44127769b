//! 画像ストア
//!
//! 種類ごとのディレクトリに `<id>.img` として data URI テキストを保存する。
//! 書き込みは種類ごとのロックで直列化する。

use crate::error::{WardrobeError, Result};
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "img";

/// 画像の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Clothing,
    Look,
}

impl ImageKind {
    fn dir_name(&self) -> &'static str {
        match self {
            ImageKind::Clothing => "clothing_images",
            ImageKind::Look => "look_images",
        }
    }
}

pub struct ImageStore {
    root: PathBuf,
    writable: bool,
    clothing_lock: Mutex<()>,
    look_lock: Mutex<()>,
}

impl ImageStore {
    /// ストアを開く（ディレクトリがなければ作成）
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for kind in [ImageKind::Clothing, ImageKind::Look] {
            let dir = root.join(kind.dir_name());
            fs::create_dir_all(&dir).map_err(|e| {
                WardrobeError::Storage(format!("ディレクトリ作成に失敗 {}: {}", dir.display(), e))
            })?;
        }

        Ok(Self {
            root,
            writable: true,
            clothing_lock: Mutex::new(()),
            look_lock: Mutex::new(()),
        })
    }

    /// 読み取り専用で開く（ディレクトリは作成しない）
    pub fn read_only(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writable: false,
            clothing_lock: Mutex::new(()),
            look_lock: Mutex::new(()),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn ensure_writable(&self) -> Result<()> {
        if !self.writable {
            return Err(WardrobeError::Storage("画像ストアは読み取り専用です".to_string()));
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self, kind: ImageKind) -> &Mutex<()> {
        match kind {
            ImageKind::Clothing => &self.clothing_lock,
            ImageKind::Look => &self.look_lock,
        }
    }

    fn path_for(&self, kind: ImageKind, id: &str) -> Result<PathBuf> {
        validate_key(id)?;
        Ok(self
            .root
            .join(kind.dir_name())
            .join(format!("{}.{}", id, FILE_EXTENSION)))
    }

    /// 画像を保存（上書き）
    pub fn put(&self, kind: ImageKind, id: &str, image: &str) -> Result<()> {
        self.ensure_writable()?;
        let path = self.path_for(kind, id)?;
        let tmp_path = path.with_extension("tmp");

        let _guard = self.lock(kind).lock();
        let written = fs::write(&tmp_path, image).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            // 一時ファイルを残さない
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// 画像を取得（存在しない・空の場合はNone）
    pub fn get(&self, kind: ImageKind, id: &str) -> Result<Option<String>> {
        let path = self.path_for(kind, id)?;

        match fs::read_to_string(&path) {
            Ok(image) if image.is_empty() => Ok(None),
            Ok(image) => Ok(Some(image)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 画像を削除（存在しなくてもOK）
    pub fn delete(&self, kind: ImageKind, id: &str) -> Result<()> {
        self.ensure_writable()?;
        let path = self.path_for(kind, id)?;

        let _guard = self.lock(kind).lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// IDがストアのキーとして安全か検証
fn validate_key(id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.chars().any(|c| c.is_control());

    if invalid {
        return Err(WardrobeError::Storage(format!("不正なID: {:?}", id)));
    }
    Ok(())
}
