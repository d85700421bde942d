// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static INNER_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\x0C\r]{2,}").unwrap());

/// 段落缩进
const PARAGRAPH_INDENT: &str = "  ";

/// 清理正文内容并优化段落格式
///
/// - `\r\n` 统一为 `\n`
/// - 非空行去除首尾空白、行内连续的 ASCII 空白合并为一个空格，全角空格保留，并以两个空格缩进
/// - 仅含空白的行视为空行
/// - 三个及以上连续换行合并为两个
/// - 结果去除首尾空白
///
/// 该函数是幂等的：`clean_content(&clean_content(x)) == clean_content(x)`。
pub fn clean_content(content: &str) -> String {
    let content = content.replace("\r\n", "\n");

    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                String::new()
            } else {
                format!(
                    "{}{}",
                    PARAGRAPH_INDENT,
                    INNER_SPACE_REGEX.replace_all(trimmed, " ")
                )
            }
        })
        .collect();

    // 空白行清空之后再合并，保证多余空行不会在第二次清理时才被发现
    let joined = lines.join("\n");
    BLANK_LINES_REGEX
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}
