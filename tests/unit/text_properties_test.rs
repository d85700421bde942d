// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use fanwen_crawler::utils::text_cleaner::clean_content;
use fanwen_crawler::utils::text_encoding::{normalize_encoding, UTF8_BOM};

const FRAGMENTS: &[&str] = &[
    "", " ", "\t", "\n", "\r\n", "\n\n\n", "  \n  ", "第一段", "a  b", "\u{3000}", "x\t\ty", "。",
];

/// 由片段拼接出的全部长度不超过 3 的组合
fn samples() -> Vec<String> {
    let mut out = vec![String::new()];
    for a in FRAGMENTS {
        out.push(a.to_string());
        for b in FRAGMENTS {
            out.push(format!("{a}{b}"));
            for c in FRAGMENTS {
                out.push(format!("{a}{b}{c}"));
            }
        }
    }
    out
}

#[test]
fn test_clean_content_is_idempotent() {
    for sample in samples() {
        let once = clean_content(&sample);
        assert_eq!(clean_content(&once), once, "input: {:?}", sample);
    }
}

#[test]
fn test_clean_content_never_leaves_triple_newlines() {
    for sample in samples() {
        assert!(!clean_content(&sample).contains("\n\n\n"), "input: {:?}", sample);
    }
}

#[test]
fn test_bom_prefixed_bytes_are_returned_unchanged() {
    let cases: [&[u8]; 5] = [b"", b"abc", &[0xFF, 0xFE, 0x00], "中文".as_bytes(), &[0xC4, 0xE3]];
    for rest in cases {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(rest);
        assert_eq!(normalize_encoding(&input).unwrap(), rest);
    }
}
