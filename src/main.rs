// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use fanwen_crawler::config::settings::Settings;
use fanwen_crawler::engines::reqwest_engine::ReqwestEngine;
use fanwen_crawler::infrastructure::storage::{self, CsvExporter};
use fanwen_crawler::utils::telemetry;
use fanwen_crawler::workers::manager::CrawlManager;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{error, info};

/// 主函数
///
/// 读取关键词和文章数量，完成爬取后把结果写入 `<关键词>.csv`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry();

    let settings = Settings::new().context("加载配置失败")?;
    info!("Configuration loaded");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let keyword = prompt(&mut input, "请输入搜索关键词: ")?;
    let target = parse_article_count(&prompt(&mut input, "请输入需要爬取的文章数: ")?);
    drop(input);

    println!("搜索关键词: {}\n需要爬取的文章数量: {}\n", keyword, target);

    let engine = ReqwestEngine::new(settings.request_timeout())?;
    let output_dir = settings.output.directory.clone();
    let manager = CrawlManager::new(Arc::new(engine), settings);

    let report = match manager.run(&keyword, target).await {
        Ok(report) => report,
        Err(e) => {
            println!("爬取失败: {}", e);
            return Ok(());
        }
    };

    let path = storage::output_path(&output_dir, &keyword);
    if let Err(e) = CsvExporter::new(&path).export(&report.articles) {
        error!("{}", e);
        println!("创建CSV文件失败: {}", e);
        return Ok(());
    }

    println!(
        "\n数据已成功保存到 {} 文件\n共成功爬取 {} 篇文章",
        path.display(),
        report.articles.len()
    );
    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// 文章数量无法解析或为负数时按 0 处理
fn parse_article_count(raw: &str) -> usize {
    raw.trim()
        .parse::<i64>()
        .map(|n| usize::try_from(n).unwrap_or(0))
        .unwrap_or(0)
}
