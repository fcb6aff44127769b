//! 一括登録の状態管理
//!
//! アップロードされた画像ごとに独立した状態を持つ:
//! `Pending -> Analyzing -> Done` または `Pending -> Analyzing -> Error`
//!
//! 全件が終端状態になったらユーザー確認へ進み、
//! `Done` かつ項目が揃っているものだけを登録対象にする。

use crate::error::{Error, Result};
use crate::types::ItemDetails;

/// 一度に受け付ける最大枚数
pub const MAX_BATCH: usize = 80;

/// 1件ごとの処理状態
#[derive(Debug, Clone, PartialEq)]
pub enum IngestStatus {
    Pending,
    Analyzing,
    Done(ItemDetails),
    Error(String),
}

impl IngestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, IngestStatus::Done(_) | IngestStatus::Error(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            IngestStatus::Pending => "pending",
            IngestStatus::Analyzing => "analyzing",
            IngestStatus::Done(_) => "done",
            IngestStatus::Error(_) => "error",
        }
    }
}

/// 一括登録の1件
#[derive(Debug, Clone, PartialEq)]
pub struct IngestEntry {
    pub temp_id: usize,
    /// 元ファイル名など表示用の識別子
    pub source: String,
    /// 圧縮・背景除去後の画像（data URI）
    pub image: String,
    pub status: IngestStatus,
}

/// 登録候補（確認後に永続化される）
#[derive(Debug, Clone, PartialEq)]
pub struct CommitCandidate {
    pub details: ItemDetails,
    pub image: String,
}

/// 一括登録バッチ
#[derive(Debug, Clone, Default)]
pub struct IngestBatch {
    entries: Vec<IngestEntry>,
}

impl IngestBatch {
    /// ソース一覧から全件Pendingのバッチを作成
    pub fn new<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<IngestEntry> = sources
            .into_iter()
            .enumerate()
            .map(|(temp_id, source)| IngestEntry {
                temp_id,
                source: source.into(),
                image: String::new(),
                status: IngestStatus::Pending,
            })
            .collect();

        if entries.len() > MAX_BATCH {
            return Err(Error::Validation(format!(
                "一度に登録できるのは{}件までです（{}件）",
                MAX_BATCH,
                entries.len()
            )));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[IngestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, temp_id: usize) -> Option<&mut IngestEntry> {
        self.entries.iter_mut().find(|e| e.temp_id == temp_id)
    }

    /// 解析開始（Pendingのみ遷移可）
    pub fn mark_analyzing(&mut self, temp_id: usize) {
        if let Some(entry) = self.entry_mut(temp_id) {
            if entry.status == IngestStatus::Pending {
                entry.status = IngestStatus::Analyzing;
            }
        }
    }

    /// 処理中の画像を差し替え（背景除去後など）
    pub fn set_image(&mut self, temp_id: usize, image: String) {
        if let Some(entry) = self.entry_mut(temp_id) {
            entry.image = image;
        }
    }

    /// 解析完了（終端状態からは遷移しない）
    pub fn mark_done(&mut self, temp_id: usize, details: ItemDetails) {
        if let Some(entry) = self.entry_mut(temp_id) {
            if !entry.status.is_terminal() {
                entry.status = IngestStatus::Done(details);
            }
        }
    }

    /// 処理失敗（このエントリのみ）
    pub fn mark_error(&mut self, temp_id: usize, message: impl Into<String>) {
        if let Some(entry) = self.entry_mut(temp_id) {
            if !entry.status.is_terminal() {
                entry.status = IngestStatus::Error(message.into());
            }
        }
    }

    /// 確認前にユーザーが除外
    pub fn remove(&mut self, temp_id: usize) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.temp_id != temp_id);
        self.entries.len() != before
    }

    /// 確認画面へ進めるか（全件が終端状態）
    pub fn is_ready(&self) -> bool {
        self.entries.iter().all(|e| e.status.is_terminal())
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, IngestStatus::Error(_)))
            .count()
    }

    /// 登録対象（Done・項目充足・画像あり）
    pub fn committable(&self) -> Vec<CommitCandidate> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.status {
                IngestStatus::Done(details) if details.is_complete() && !entry.image.is_empty() => {
                    Some(CommitCandidate {
                        details: details.clone(),
                        image: entry.image.clone(),
                    })
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::test_support::details;

    fn batch(n: usize) -> IngestBatch {
        IngestBatch::new((0..n).map(|i| format!("photo_{}.jpg", i))).unwrap()
    }

    #[test]
    fn test_new_batch_all_pending() {
        let batch = batch(3);
        assert_eq!(batch.len(), 3);
        assert!(batch.entries().iter().all(|e| e.status == IngestStatus::Pending));
        assert!(!batch.is_ready());
    }

    #[test]
    fn test_batch_limit() {
        assert!(IngestBatch::new((0..MAX_BATCH).map(|i| i.to_string())).is_ok());
        let err = IngestBatch::new((0..=MAX_BATCH).map(|i| i.to_string())).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_transitions_and_ready() {
        let mut batch = batch(2);

        batch.mark_analyzing(0);
        batch.set_image(0, "data:image/jpeg;base64,AAAA".into());
        batch.mark_done(0, details("Blusa", Category::Top));
        assert!(!batch.is_ready());

        batch.mark_analyzing(1);
        batch.mark_error(1, "Processamento falhou");
        assert!(batch.is_ready());
        assert_eq!(batch.error_count(), 1);

        let commit = batch.committable();
        assert_eq!(commit.len(), 1);
        assert_eq!(commit[0].details.name, "Blusa");
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut batch = batch(1);
        batch.mark_analyzing(0);
        batch.mark_error(0, "falhou");
        batch.mark_done(0, details("Blusa", Category::Top));
        assert_eq!(batch.entries()[0].status.label(), "error");
    }

    #[test]
    fn test_incomplete_done_item_not_committed() {
        let mut batch = batch(2);

        let mut incomplete = details("", Category::Bottom);
        incomplete.name.clear();
        batch.set_image(0, "data:image/jpeg;base64,AAAA".into());
        batch.mark_done(0, incomplete);

        // 画像なし
        batch.mark_done(1, details("Saia", Category::Bottom));

        assert!(batch.is_ready());
        assert!(batch.committable().is_empty());
    }

    #[test]
    fn test_remove_entry() {
        let mut batch = batch(2);
        assert!(batch.remove(1));
        assert!(!batch.remove(1));
        assert_eq!(batch.len(), 1);
    }
}
