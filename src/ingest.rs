//! 一括登録の非同期処理
//!
//! 画像ごとに1タスクを起動し、すべて並行に処理する。
//! 各画像は「縮小 → 背景除去 → 解析」の順で進み、失敗はその画像だけに閉じる。

use crate::ai::{remove_background, StylistAi};
use crate::config::Config;
use crate::error::{Result, WardrobeError};
use crate::imaging::{compress_image, load_image_file};
use crate::scanner::ImageInfo;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use wardrobe_ai_common::{IngestBatch, ItemDetails, MAX_BATCH};

/// 登録時の画像処理パラメータ
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub max_side: u32,
    pub quality: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_side: 600,
            quality: 70,
        }
    }
}

impl From<&Config> for IngestOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_side: config.max_image_size,
            quality: config.jpeg_quality,
        }
    }
}

/// タスクからの進捗通知
enum IngestEvent {
    Analyzing(usize),
    Image(usize, String),
    Done(usize, ItemDetails),
    Failed(usize, String),
}

/// 画像を一括で解析する
///
/// 返されるバッチは全件が終端状態（Done / Error）になっている。
/// 登録はユーザー確認後に `Closet::add_items` で行う。
pub async fn ingest_images(
    ai: Arc<dyn StylistAi>,
    images: Vec<ImageInfo>,
    options: IngestOptions,
    progress: &ProgressBar,
) -> Result<IngestBatch> {
    if images.len() > MAX_BATCH {
        return Err(WardrobeError::BatchTooLarge {
            max: MAX_BATCH,
            actual: images.len(),
        });
    }

    let mut batch = IngestBatch::new(images.iter().map(|info| info.file_name.clone()))?;
    progress.set_length(batch.len() as u64);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut tasks = JoinSet::new();

    for (temp_id, info) in images.into_iter().enumerate() {
        let ai = Arc::clone(&ai);
        let tx = tx.clone();
        tasks.spawn(async move {
            process_entry(ai.as_ref(), temp_id, info.path, options, &tx).await;
        });
    }
    drop(tx);

    while let Some(event) = rx.recv().await {
        match event {
            IngestEvent::Analyzing(id) => batch.mark_analyzing(id),
            IngestEvent::Image(id, image) => batch.set_image(id, image),
            IngestEvent::Done(id, details) => {
                batch.mark_done(id, details);
                progress.inc(1);
            }
            IngestEvent::Failed(id, message) => {
                batch.mark_error(id, message);
                progress.inc(1);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "登録タスクが異常終了しました");
        }
    }

    // 異常終了したタスクのエントリ
    let unfinished: Vec<usize> = batch
        .entries()
        .iter()
        .filter(|entry| !entry.status.is_terminal())
        .map(|entry| entry.temp_id)
        .collect();
    for id in unfinished {
        batch.mark_error(id, "処理が中断されました");
        progress.inc(1);
    }

    progress.finish_and_clear();
    tracing::info!(
        total = batch.len(),
        errors = batch.error_count(),
        "一括解析が完了しました"
    );

    Ok(batch)
}

async fn process_entry(
    ai: &dyn StylistAi,
    temp_id: usize,
    path: PathBuf,
    options: IngestOptions,
    tx: &mpsc::UnboundedSender<IngestEvent>,
) {
    // 受信側が先に終了していても処理は続ける
    let send = |event: IngestEvent| {
        let _ = tx.send(event);
    };

    send(IngestEvent::Analyzing(temp_id));

    let prepared = tokio::task::spawn_blocking(move || -> Result<String> {
        let original = load_image_file(&path)?;
        Ok(compress_image(&original, options.max_side, options.quality))
    })
    .await;

    let compressed = match prepared {
        Ok(Ok(image)) => image,
        Ok(Err(e)) => {
            send(IngestEvent::Failed(temp_id, e.to_string()));
            return;
        }
        Err(e) => {
            send(IngestEvent::Failed(temp_id, format!("画像の読み込みに失敗: {}", e)));
            return;
        }
    };
    send(IngestEvent::Image(temp_id, compressed.clone()));

    let cleaned = remove_background(ai, &compressed).await;
    send(IngestEvent::Image(temp_id, cleaned.clone()));

    match ai.analyze_item(&cleaned).await {
        Ok(details) => send(IngestEvent::Done(temp_id, details)),
        Err(e) => {
            tracing::warn!(temp_id, error = %e, "アイテム解析に失敗");
            send(IngestEvent::Failed(temp_id, e.to_string()));
        }
    }
}
