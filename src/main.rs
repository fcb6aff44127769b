use anyhow::{bail, Context};
use clap::Parser;
use dialoguer::{Confirm, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wardrobe_ai::cli::{Cli, Commands};
use wardrobe_ai::config::Config;
use wardrobe_ai::error::WardrobeError;
use wardrobe_ai::gemini::GeminiClient;
use wardrobe_ai::ingest::{self, IngestOptions};
use wardrobe_ai::stylist::{self, LookOptions};
use wardrobe_ai::{imaging, scanner, Closet, PersistOutcome, StylistAi, WardrobeFilter};
use wardrobe_ai_common::{combination_key, ClothingItem, IngestStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }

    match cli.command {
        Commands::Add { folder, yes } => {
            println!("👗 wardrobe-ai - アイテム登録\n");

            // 1. 画像スキャン
            println!("[1/3] 写真をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            if images.is_empty() {
                bail!("画像が見つかりません: {}", folder.display());
            }
            println!("✔ {}枚の写真を検出\n", images.len());

            // 2. 縮小・背景除去・解析
            println!("[2/3] AI解析中...");
            let ai: Arc<dyn StylistAi> = Arc::new(GeminiClient::from_config(&config)?);
            let progress = ProgressBar::new(images.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}")?
                    .progress_chars("=>-"),
            );
            let mut batch =
                ingest::ingest_images(ai, images, IngestOptions::from(&config), &progress).await?;

            for entry in batch.entries() {
                match &entry.status {
                    IngestStatus::Done(details) => println!(
                        "  ✔ {}: {} ({} / {})",
                        entry.source, details.name, details.category, details.style
                    ),
                    IngestStatus::Error(message) => println!("  ✗ {}: {}", entry.source, message),
                    status => println!("  - {}: {}", entry.source, status.label()),
                }
            }
            println!("✔ 解析完了（エラー {}件）\n", batch.error_count());

            // 3. 確認して登録
            println!("[3/3] 登録");
            if !yes {
                let done: Vec<(usize, String)> = batch
                    .entries()
                    .iter()
                    .filter_map(|entry| match &entry.status {
                        IngestStatus::Done(details) => {
                            Some((entry.temp_id, format!("{} - {}", entry.source, details.name)))
                        }
                        _ => None,
                    })
                    .collect();

                if !done.is_empty() {
                    let labels: Vec<&str> = done.iter().map(|(_, label)| label.as_str()).collect();
                    let selected = MultiSelect::new()
                        .with_prompt("登録するアイテムを選択")
                        .items(&labels)
                        .defaults(&vec![true; labels.len()])
                        .interact()?;

                    for (index, (temp_id, _)) in done.iter().enumerate() {
                        if !selected.contains(&index) {
                            batch.remove(*temp_id);
                        }
                    }
                }
            }

            let candidates = batch.committable();
            if candidates.is_empty() {
                println!("登録できるアイテムがありません");
                return Ok(());
            }

            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("{}件をワードローブに登録しますか？", candidates.len()))
                    .default(true)
                    .interact()?;
            if !confirmed {
                println!("登録をキャンセルしました");
                return Ok(());
            }

            let mut closet = open_closet(&config)?;
            let (items, outcome) = closet.add_items(
                candidates
                    .into_iter()
                    .map(|candidate| (candidate.details, candidate.image))
                    .collect(),
            )?;
            report_persistence(outcome);

            println!("\n✅ {}件を登録しました", items.len());
        }

        Commands::List { category, subcategory, style } => {
            let closet = open_closet(&config)?;
            let filter = WardrobeFilter { category, subcategory, style };
            let items = closet.filter_wardrobe(&filter);

            if items.is_empty() {
                println!("該当するアイテムはありません");
            }
            for item in &items {
                print_item_line(item);
            }
            println!("\n{}件 / 全{}件", items.len(), closet.wardrobe().len());
        }

        Commands::Show { id, output } => {
            let closet = open_closet(&config)?;
            let item = closet
                .item(&id)
                .ok_or_else(|| WardrobeError::ItemNotFound(id.clone()))?;

            let d = &item.details;
            println!("{} ({})", d.name, item.id);
            println!("  カテゴリ: {} / {}", d.category, d.subcategory);
            println!("  スタイル: {}", d.style);
            println!("  色: {}", d.color);
            println!("  素材: {}", d.fabric);
            println!("  シルエット: {}", d.fit);
            println!("  フォーマル度: {}/10", d.formality_level);
            println!("  汎用性: {}/10", d.versatility);
            println!("  シーズン: {}", join_labels(&d.season));

            if let Some(path) = output {
                imaging::write_image_file(&path, &item.image)?;
                println!("✔ 画像を保存: {}", path.display());
            }
        }

        Commands::Edit {
            id,
            name,
            category,
            subcategory,
            color,
            style,
            fabric,
            fit,
            formality,
            versatility,
            season,
        } => {
            let mut closet = open_closet(&config)?;
            let mut details = closet
                .item(&id)
                .map(|item| item.details.clone())
                .ok_or_else(|| WardrobeError::ItemNotFound(id.clone()))?;

            if let Some(v) = name {
                details.name = v;
            }
            if let Some(v) = category {
                details.category = v;
            }
            if let Some(v) = subcategory {
                details.subcategory = v;
            }
            if let Some(v) = color {
                details.color = v;
            }
            if let Some(v) = style {
                details.style = v;
            }
            if let Some(v) = fabric {
                details.fabric = v;
            }
            if let Some(v) = fit {
                details.fit = v;
            }
            if let Some(v) = formality {
                details.formality_level = v;
            }
            if let Some(v) = versatility {
                details.versatility = v;
            }
            if let Some(v) = season {
                details.season = v;
            }

            if !details.is_complete() {
                bail!("空欄の項目があるため保存できません");
            }
            if !details.category.has_subcategory(&details.subcategory) {
                tracing::warn!(
                    category = %details.category,
                    subcategory = %details.subcategory,
                    "カテゴリに定義されていないサブカテゴリです"
                );
            }

            let outcome = closet.update_item(&id, details)?;
            report_persistence(outcome);
            println!("✔ 更新しました: {}", id);
        }

        Commands::Delete { id } => {
            let mut closet = open_closet(&config)?;
            let outcome = closet.delete_item(&id)?;
            report_persistence(outcome);
            println!("✔ 削除しました: {}", id);
        }

        Commands::Style {
            occasion,
            style,
            num_looks,
            with_item,
            model_photo,
            save,
            output,
        } => {
            println!("✨ wardrobe-ai - スタイリスト\n");

            let mut closet = open_closet(&config)?;
            closet.ensure_stylable()?;

            let model_photo_path = model_photo
                .or_else(|| config.model_photo.clone())
                .ok_or_else(|| {
                    WardrobeError::Config(
                        "試着用のモデル写真が未設定です。`wardrobe-ai config --set-model-photo PATH` で設定してください".into(),
                    )
                })?;
            let model_photo = imaging::load_image_file(&model_photo_path)?;

            if let Some(item_id) = &with_item {
                closet.request_looks_with(item_id, &occasion, &style, num_looks as usize)?;
            }
            let options = match closet.take_stylist_request() {
                Some(request) => LookOptions::from(request),
                None => LookOptions {
                    occasion,
                    style,
                    num_looks: num_looks as usize,
                    mandatory_id: None,
                },
            };

            // 保存済みルックと同じ組み合わせは避ける
            let existing: Vec<Vec<String>> = closet
                .saved_looks()
                .iter()
                .map(|look| combination_key(&look.item_ids))
                .collect();

            let ai = GeminiClient::from_config(&config)?;
            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("{}件のルックを作成中...", options.num_looks));
            spinner.enable_steady_tick(std::time::Duration::from_millis(120));

            let report = stylist::generate_looks(
                &ai,
                closet.wardrobe(),
                &options,
                existing,
                &model_photo,
            )
            .await;
            spinner.finish_and_clear();
            let report = report?;

            if let Some(message) = &report.message {
                println!("💬 {}", message);
            }

            for (index, look) in report.looks.iter().enumerate() {
                println!("\n[ルック {}]", index + 1);
                println!("  {}", look.commentary);
                for item_id in &look.item_ids {
                    if let Some(item) = closet.item(item_id) {
                        print_item_line(item);
                    }
                }

                if let Some(dir) = &output {
                    let path = dir.join(format!("look-{}.png", index + 1));
                    imaging::write_image_file(&path, &look.image)?;
                    println!("  ✔ 試着画像: {}", path.display());
                }
            }

            if save {
                for look in report.looks {
                    let (saved, outcome) = closet.save_look(look.into_draft(&options))?;
                    report_persistence(outcome);
                    println!("✔ ルックを保存: {}", saved.id);
                }
            }
        }

        Commands::Looks => {
            let closet = open_closet(&config)?;
            if closet.saved_looks().is_empty() {
                println!("保存済みのルックはありません");
            }

            for look in closet.saved_looks() {
                println!("{} [{} / {}]", look.id, look.occasion, look.style);
                println!("  {}", look.commentary);
                for item in closet.items_for_look(look) {
                    print_item_line(item);
                }
            }
        }

        Commands::DeleteLook { id } => {
            let mut closet = open_closet(&config)?;
            let outcome = closet.delete_look(&id)?;
            report_persistence(outcome);
            println!("✔ ルックを削除しました: {}", id);
        }

        Commands::Config { set_api_key, set_model_photo, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(path) = set_model_photo {
                config.model_photo = Some(absolute_path(&path)?);
                config.save()?;
                println!("✔ モデル写真を設定しました");
            }

            if show {
                println!("設定:");
                println!("  テキストモデル: {}", config.text_model);
                println!("  画像モデル: {}", config.image_model);
                println!("  データ保存先: {}", config.data_dir()?.display());
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  モデル写真: {}",
                    config
                        .model_photo
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("wardrobe_ai={0},wardrobe_ai_common={0},warn", default_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_closet(config: &Config) -> anyhow::Result<Closet> {
    let data_dir = config.data_dir()?;
    let closet = Closet::open(&data_dir)
        .with_context(|| format!("ワードローブを開けません: {}", data_dir.display()))?;
    if closet.is_read_only() {
        println!("⚠ 画像ストアを開けないため読み取り専用で表示しています");
    }
    Ok(closet)
}

fn report_persistence(outcome: PersistOutcome) {
    if !outcome.is_saved() {
        println!("⚠ 保存に失敗しました。変更はこのセッションのみ有効です");
    }
}

fn print_item_line(item: &ClothingItem) {
    let d = &item.details;
    println!(
        "  {} {} [{} / {}] {}",
        item.id, d.name, d.category, d.subcategory, d.style
    );
}

fn join_labels<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn absolute_path(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        return Err(WardrobeError::FileNotFound(path.display().to_string()).into());
    }
    Ok(path.canonicalize()?)
}
