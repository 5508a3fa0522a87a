use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sku_dedup::{cli, config, error, export, loader};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use sku_dedup_common::{classify, company_aggregates, extract_numbers, is_different_flavor_with, token_sort_ratio};
use std::time::Duration;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(default_level));

    match cli.command {
        Commands::Classify {
            input,
            output,
            json,
            same_sku_threshold,
            low_threshold,
            confidence_threshold,
            exclude,
        } => {
            println!("🔎 sku-dedup - 重複・類似SKU検出\n");

            let mut config = Config::resolve(cli.config.as_deref())?;
            config.apply_overrides(same_sku_threshold, low_threshold, confidence_threshold, &exclude)?;

            // 1. 読み込み
            println!("[1/3] ワークブックを読み込み中...");
            let records = loader::load_catalog(&input, &config.loader)?;
            println!("✔ {}件の商品を読み込み\n", records.len());

            // 2. 照合・分類
            println!("[2/3] 照合・分類中...");
            let pb = spinner("類似商品を照合中...");
            let classification = classify(&records, &config.matching)?;
            pb.finish_and_clear();
            println!("  完全一致:     {}", classification.exact_matches.len());
            println!("  部分一致:     {}", classification.partial_matches.len());
            println!("  異SKU確度高:  {}", classification.confident.len());
            println!("  異SKU要確認:  {}", classification.needs_review.len());
            println!("  シート内重複: {}", classification.internal_duplicates.len());
            println!("  単独商品:     {}", classification.unmatched.len());
            println!("✔ 分類完了\n");

            // 3. 出力
            println!("[3/3] レポートを出力中...");
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let (pairs_path, summary_path) = export::export_reports(&classification, &output_dir)?;
            println!("✔ ペアレポート: {}", pairs_path.display());
            println!("✔ 会社別集計: {}", summary_path.display());

            if let Some(json_path) = json {
                let content = serde_json::to_string_pretty(&classification)?;
                std::fs::write(&json_path, content)?;
                println!("✔ JSON: {}", json_path.display());
            }

            if cli.verbose {
                println!("\n会社別:");
                for aggregate in company_aggregates(&classification) {
                    println!("  {}: 合計 {}", aggregate.company, aggregate.total);
                }
            }

            println!("\n✅ 完了");
        }

        Commands::Score { name1, name2 } => {
            let config = Config::resolve(cli.config.as_deref())?;
            let normalized1 = sku_dedup_common::normalize_name(&name1);
            let normalized2 = sku_dedup_common::normalize_name(&name2);
            let numbers1 = extract_numbers(&name1);
            let numbers2 = extract_numbers(&name2);

            println!("類似度: {}", token_sort_ratio(&normalized1, &normalized2));
            println!("正規化: \"{}\" / \"{}\"", normalized1, normalized2);
            println!("数値: {} / {}", numbers1, numbers2);
            println!("数値不一致: {}", if numbers1.vetoes(&numbers2) { "あり" } else { "なし" });
            println!(
                "味違い: {}",
                if is_different_flavor_with(&name1, &name2, &config.matching.flavor) { "あり" } else { "なし" }
            );
        }

        Commands::Config { show, init } => {
            if init {
                let path = match cli.config.as_deref() {
                    Some(path) => path.to_path_buf(),
                    None => Config::config_path()?,
                };
                Config::default().save_to(&path)?;
                println!("✔ 設定ファイルを作成しました: {}", path.display());
            }

            if show || !init {
                let config = Config::resolve(cli.config.as_deref())?;
                println!("設定:");
                println!("  同一SKUしきい値: {}", config.matching.same_sku_threshold);
                println!("  異SKU下限: {}", config.matching.low_confidence_threshold);
                println!("  異SKU確度高: {}", config.matching.confidence_threshold);
                println!("  連番SKU判定幅: {}", config.matching.sku_closeness);
                println!(
                    "  味違い: 語長 {} 以上 / 類似度 {} 未満",
                    config.matching.flavor.min_token_length, config.matching.flavor.max_similarity
                );
                println!("  除外シート: {}", config.loader.excluded_sheets.join(", "));
                println!(
                    "  列: {} / {} / {}",
                    config.loader.brand_column, config.loader.name_column, config.loader.sku_column
                );
            }
        }
    }

    Ok(())
}
