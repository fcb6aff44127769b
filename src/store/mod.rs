//! ローカル永続化
//!
//! - images: 画像ペイロード（衣類・ルックの2種類、IDごとのキー）
//! - metadata: 画像を含まないメタデータ一覧（キーごとに一括保存）

pub mod images;
pub mod metadata;

pub use images::{ImageKind, ImageStore};
pub use metadata::MetadataFile;
