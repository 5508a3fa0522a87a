use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sku-dedup")]
#[command(about = "複数シート商品カタログの重複・類似SKU検出ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/sku-dedup/config.json）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ワークブックを照合・分類してレポートを出力
    Classify {
        /// 入力ワークブック（xlsx/xls/ods）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 分類結果をJSONでも保存
        #[arg(long)]
        json: Option<PathBuf>,

        /// 同一SKUペアの類似度しきい値
        #[arg(long)]
        same_sku_threshold: Option<u8>,

        /// 異SKUペアの下限しきい値
        #[arg(long)]
        low_threshold: Option<u8>,

        /// 異SKUペアを確度高とするしきい値
        #[arg(long)]
        confidence_threshold: Option<u8>,

        /// 除外するシート（複数指定可）
        #[arg(short = 'x', long)]
        exclude: Vec<String>,
    },

    /// 2つの商品名の類似度と判定要素を表示
    Score {
        #[arg(required = true)]
        name1: String,

        #[arg(required = true)]
        name2: String,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}
