// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::domain::models::article::Article;
use crate::utils::text_encoding::UTF8_BOM;

/// CSV 表头：标题、发布时间、内容、URL
pub const CSV_HEADER: [&str; 4] = ["标题", "发布时间", "内容", "URL"];

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("创建CSV文件失败 {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("写入CSV文件失败: {0}")]
    Write(#[from] std::io::Error),

    #[error("CSV编码失败: {0}")]
    Csv(#[from] csv::Error),
}

/// 标题中的双引号替换为单引号、半角逗号替换为全角逗号
pub fn prepare_title(title: &str) -> String {
    title.replace('"', "'").replace(',', "，")
}

/// 正文在标题规则之外，还把制表符替换为空格
pub fn prepare_content(content: &str) -> String {
    prepare_title(content).replace('\t', " ")
}

/// 关键词对应的输出文件路径 `<directory>/<keyword>.csv`
pub fn output_path(directory: &Path, keyword: &str) -> PathBuf {
    directory.join(format!("{}.csv", keyword))
}

/// CSV 导出器
///
/// 文件以 UTF-8 BOM 开头，逗号分隔，字段中的逗号和双引号事先被替换，
/// 只有包含换行的字段会被加上引号。
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 按顺序写出全部文章，已存在的文件会被覆盖
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 写出的文章行数
    /// * `Err(ExportError)` - 文件无法创建或写入失败
    pub fn export(&self, articles: &[Article]) -> Result<usize, ExportError> {
        let mut file = File::create(&self.path).map_err(|source| ExportError::Create {
            path: self.path.clone(),
            source,
        })?;
        file.write_all(&UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        writer.write_record(CSV_HEADER)?;
        for article in articles {
            writer.write_record([
                prepare_title(&article.title).as_str(),
                article.publish_time.as_str(),
                prepare_content(&article.content).as_str(),
                article.url.as_str(),
            ])?;
        }
        writer.flush()?;

        info!("已写出 {} 篇文章到 {}", articles.len(), self.path.display());
        Ok(articles.len())
    }
}

/// 调试用的页面转储，把解码后的搜索结果页原样写入文件
pub struct DebugDump {
    path: PathBuf,
}

impl DebugDump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn save(&self, data: &[u8]) {
        if let Err(e) = self.write(data).await {
            warn!("写入调试文件失败 {}: {}", self.path.display(), e);
        }
    }

    async fn write(&self, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(&self.path).await?;
        file.write_all(data).await?;
        file.flush().await
    }
}
