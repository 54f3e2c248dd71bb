use crate::ai_provider::AiProvider;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "procure-scope")]
#[command(about = "調達スコープ生成ツール（品目・ベンダー照合と仕様推薦）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 入力ファイル（品目・ベンダー）
#[derive(clap::Args, Debug, Clone)]
pub struct MatchInputs {
    /// 品目ファイル（csv/xlsx）
    #[arg(long, default_value = "items.csv")]
    pub items: PathBuf,

    /// ベンダーファイル（csv/xlsx）
    #[arg(long, default_value = "vendors.csv")]
    pub vendors: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 照合・仕様推薦・文書生成・出力まで一括実行
    Run {
        #[command(flatten)]
        inputs: MatchInputs,

        /// 過去実績ファイル（csv/xlsx）
        #[arg(long, default_value = "historical_df_items.csv")]
        historical: PathBuf,

        /// プロジェクト規定文書
        #[arg(long, default_value = "project_rules.md")]
        rules: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// 文書生成の依頼文
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// 照合閾値（省略時は設定値、既定0.1）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 表データの出力形式（カンマ区切り: csv,json,excel）
        #[arg(short, long, value_delimiter = ',', default_value = "csv,json,excel")]
        format: Vec<ExportFormat>,

        /// AIプロバイダ（省略時は設定値）
        #[arg(long)]
        provider: Option<AiProvider>,

        /// AI文書生成をスキップ（サマリーのみ出力）
        #[arg(long)]
        no_ai: bool,

        /// 文書キャッシュを使わない
        #[arg(long)]
        no_cache: bool,
    },

    /// 品目とベンダーを照合
    Match {
        #[command(flatten)]
        inputs: MatchInputs,

        /// 照合閾値（省略時は設定値、既定0.5）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 出力CSV
        #[arg(short, long, default_value = "item_vendor_mapping_final.csv")]
        output: PathBuf,
    },

    /// 過去実績から仕様を推薦
    Specs {
        /// 品目ファイル
        #[arg(long, default_value = "items.csv")]
        items: PathBuf,

        /// 過去実績ファイル
        #[arg(long, default_value = "historical_df_items.csv")]
        historical: PathBuf,

        /// 出力CSV
        #[arg(short, long, default_value = "recommended_specs.csv")]
        output: PathBuf,
    },

    /// 入力ファイルの必須列を検証
    Validate {
        /// 品目ファイル
        #[arg(long)]
        items: Option<PathBuf>,

        /// ベンダーファイル
        #[arg(long)]
        vendors: Option<PathBuf>,

        /// 過去実績ファイル
        #[arg(long)]
        historical: Option<PathBuf>,
    },

    /// 標準ファイルの有無を表示
    Status {
        /// 対象ディレクトリ（省略時はカレント）
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// ベンダー未割当の品目を対話的に確認
    Review {
        /// スコープ品目CSV
        #[arg(default_value = "output/scoped_items.csv")]
        scoped: PathBuf,

        #[command(flatten)]
        inputs: MatchInputs,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// AIプロバイダを設定
        #[arg(long)]
        set_provider: Option<AiProvider>,

        /// モデルを設定（空文字で解除）
        #[arg(long)]
        set_model: Option<String>,

        /// 単体照合の閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 一括処理の閾値を設定
        #[arg(long)]
        set_workflow_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 文書キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象ディレクトリ（省略時は output）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
