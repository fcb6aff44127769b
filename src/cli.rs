use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wardrobe_ai_common::{Category, Season, Style};

#[derive(Parser)]
#[command(name = "wardrobe-ai")]
#[command(about = "AIワードローブ管理・コーディネート提案ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データ保存先（設定ファイルより優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダ内の衣類写真を解析して一括登録
    Add {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 確認せずに登録
        #[arg(short, long)]
        yes: bool,
    },

    /// ワードローブ一覧
    List {
        /// カテゴリで絞り込み（例: "Parte de Cima"）
        #[arg(short, long)]
        category: Option<Category>,

        /// サブカテゴリで絞り込み
        #[arg(long)]
        subcategory: Option<String>,

        /// スタイルで絞り込み
        #[arg(short, long)]
        style: Option<Style>,
    },

    /// アイテムの詳細を表示
    Show {
        id: String,

        /// 画像をファイルに書き出す
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// アイテムの属性を修正
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        style: Option<Style>,

        #[arg(long)]
        fabric: Option<String>,

        #[arg(long)]
        fit: Option<String>,

        /// フォーマル度 (1-10)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        formality: Option<u8>,

        /// 汎用性 (1-10)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        versatility: Option<u8>,

        /// シーズン（カンマ区切り、例: "Verão,Primavera"）
        #[arg(long, value_delimiter = ',')]
        season: Option<Vec<Season>>,
    },

    /// アイテムを削除
    Delete { id: String },

    /// AIスタイリストにルックを提案させる
    Style {
        /// シーン（例: Trabalho, Festa, Esporte, Casual）
        #[arg(short, long, default_value = "Casual")]
        occasion: String,

        /// スタイル
        #[arg(short, long, default_value = "Casual")]
        style: String,

        /// 生成するルック数 (1-5)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=5))]
        num_looks: u8,

        /// このアイテムを必ず含める
        #[arg(short = 'w', long = "with")]
        with_item: Option<String>,

        /// 試着に使うモデル写真（設定ファイルより優先）
        #[arg(long)]
        model_photo: Option<PathBuf>,

        /// 生成したルックを保存
        #[arg(long)]
        save: bool,

        /// 試着画像の出力先フォルダ
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// 保存済みルック一覧
    Looks,

    /// 保存済みルックを削除
    DeleteLook { id: String },

    /// 設定
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 試着用のモデル写真を設定
        #[arg(long)]
        set_model_photo: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
