//! # 旧版数据迁移工具
//!
//! 将浏览器本地存储导出的 JSON 导入数据库

use anyhow::Context;
use clap::Parser;
use eval_matrix::config::{DatabaseConfig, load_config};
use eval_matrix::database::Storage;
use eval_matrix::seed::{self, DatabaseStats};
use std::path::PathBuf;

/// Import legacy browser local-storage data into the EvalMatrix database
#[derive(Parser)]
#[command(name = "migrate-data")]
#[command(version)]
struct Cli {
    /// 旧版数据 JSON 文件；缺省时使用内置示例数据
    file: Option<PathBuf>,

    /// 数据库URL（默认取配置文件或 DATABASE_URL）
    #[arg(long)]
    database_url: Option<String>,

    /// 迁移前清空全部数据
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    eval_matrix::logging::init_logging(Some("warn"));

    println!("=== EvalMatrix Data Migration Tool ===");
    println!(
        "Migration started at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // 先读取数据，文件无效时不触碰数据库
    let blob = match &cli.file {
        Some(path) => {
            println!("Loading data from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取文件 {}", path.display()))?;
            serde_json::from_str::<serde_json::Value>(&content)
                .with_context(|| format!("无法解析JSON文件 {}", path.display()))?
        }
        None => {
            println!("No data file provided, using sample data");
            seed::sample_legacy_blob()
        }
    };

    let database = match cli.database_url {
        Some(url) => DatabaseConfig::with_url(url),
        None => load_config(None)?.database,
    };
    let storage = Storage::new(database);
    let db = storage.connection().await?;

    if cli.clear {
        seed::clear_all_data(db).await?;
        println!("All data cleared from database");
    }

    print_stats("Database stats before migration", &seed::get_database_stats(db).await?);

    let report = seed::migrate_from_external_blob(db, &blob).await?;

    println!("\nMigration completed:");
    println!("  Models migrated: {}", report.models_migrated);
    println!("  Datasets migrated: {}", report.datasets_migrated);
    println!("  Dataset items migrated: {}", report.dataset_items_migrated);
    println!("  Runs migrated: {}", report.runs_migrated);
    println!("  Results migrated: {}", report.results_migrated);

    if !report.errors.is_empty() {
        println!("\nErrors ({}):", report.errors.len());
        for error in &report.errors {
            println!("  - {error}");
        }
    }

    print_stats("Database stats after migration", &seed::get_database_stats(db).await?);

    println!(
        "\n=== Migration finished at: {} ===",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

fn print_stats(title: &str, stats: &DatabaseStats) {
    println!("\n{title}:");
    println!("  models: {}", stats.models);
    println!("  datasets: {}", stats.datasets);
    println!("  dataset_items: {}", stats.dataset_items);
    println!("  evaluation_runs: {}", stats.evaluation_runs);
    println!("  evaluation_results: {}", stats.evaluation_results);
    println!("  api_keys: {}", stats.api_keys);
}
