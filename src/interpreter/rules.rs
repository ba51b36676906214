// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The rule table behind [`classify`](super::classify).
//!
//! Each rule pairs a keyword matcher with an argument extractor. Rules are
//! evaluated in table order and the first one that both matches and extracts
//! wins, so more specific rules (directory creation) sit above the broader
//! ones they overlap with (file creation).

use std::sync::LazyLock;

use regex::Regex;

use super::Intent;

/// Quoted file name with an extension, e.g. `"notes.txt"`.
static FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+\.[\w]+)["']"#).unwrap());

/// Any quoted span, used for directory names and listing paths.
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).unwrap());

/// Quoted span following a content marker, e.g. `内容是"Hello"` or
/// `content "Hello"`.
static CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:内容[是为]?|content(?:\s+is)?\s*[:=]?)\s*["']([^"']+)["']"#).unwrap()
});

/// One entry of the rule table.
pub struct Rule {
    /// Stable identifier, mostly for tests and debug output.
    pub name: &'static str,
    matcher: fn(&str) -> bool,
    extractor: fn(&str, &str) -> Option<Intent>,
}

impl Rule {
    /// Returns the rule's intent when its keywords match `lowered` and its
    /// arguments can be extracted from `original`.
    pub fn apply(&self, original: &str, lowered: &str) -> Option<Intent> {
        if !(self.matcher)(lowered) {
            return None;
        }
        (self.extractor)(original, lowered)
    }
}

/// The ordered rule table.
pub fn rules() -> &'static [Rule] {
    // Directory creation precedes file creation: "文件夹" contains "文件",
    // and English "create folder" should never be read as a file create.
    static RULES: [Rule; 6] = [
        Rule {
            name: "create_directory",
            matcher: |s| {
                contains_any(s, &["创建", "新建", "create", "make", "new"])
                    && contains_any(s, &["目录", "文件夹", "directory", "folder"])
            },
            extractor: |original, _| {
                let path = QUOTED.captures(original)?.get(1)?.as_str().to_string();
                Some(Intent::CreateDirectory { path })
            },
        },
        Rule {
            name: "create_file",
            matcher: |s| {
                contains_any(s, &["创建", "新建", "create", "new", "write"])
                    && contains_any(s, &["文件", "file"])
            },
            extractor: |original, _| {
                let path = FILE_NAME.captures(original)?.get(1)?.as_str().to_string();
                let content = CONTENT
                    .captures(original)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                Some(Intent::CreateFile { path, content })
            },
        },
        Rule {
            name: "copy_file",
            matcher: |s| contains_any(s, &["复制", "拷贝", "copy"]),
            extractor: |original, _| {
                let mut names = FILE_NAME
                    .captures_iter(original)
                    .filter_map(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
                let source = names.next()?;
                let dest = names.next()?;
                Some(Intent::CopyFile { source, dest })
            },
        },
        Rule {
            name: "read_file",
            matcher: |s| contains_any(s, &["读取", "查看", "read", "show", "view", "open"]),
            extractor: |original, _| {
                let path = FILE_NAME.captures(original)?.get(1)?.as_str().to_string();
                Some(Intent::ReadFile { path })
            },
        },
        Rule {
            name: "delete_file",
            matcher: |s| contains_any(s, &["删除", "delete", "remove"]),
            extractor: |original, _| {
                let path = FILE_NAME.captures(original)?.get(1)?.as_str().to_string();
                Some(Intent::DeleteFile { path })
            },
        },
        Rule {
            name: "list_files",
            matcher: |s| contains_any(s, &["列出", "显示", "list", "ls "]) || s == "ls",
            extractor: |original, lowered| {
                let path = QUOTED
                    .captures(original)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
                let recursive = contains_any(lowered, &["递归", "recursive"]);
                Some(Intent::ListFiles { path, recursive })
            },
        },
    ];
    &RULES
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_is_stable() {
        let names: Vec<_> = rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "create_directory",
                "create_file",
                "copy_file",
                "read_file",
                "delete_file",
                "list_files",
            ]
        );
    }

    #[test]
    fn test_file_name_requires_extension() {
        assert!(FILE_NAME.captures(r#""name.txt""#).is_some());
        assert!(FILE_NAME.captures(r#""no-extension""#).is_none());
    }

    #[test]
    fn test_content_marker_variants() {
        for input in [
            r#"内容是"Hello""#,
            r#"内容为"Hello""#,
            r#"内容"Hello""#,
            r#"content "Hello""#,
            r#"content is "Hello""#,
            r#"content: "Hello""#,
        ] {
            let caps = CONTENT.captures(input).unwrap_or_else(|| panic!("no match: {input}"));
            assert_eq!(caps.get(1).unwrap().as_str(), "Hello");
        }
    }

    #[test]
    fn test_matched_rule_without_arguments_yields_none() {
        let rule = &rules()[1]; // create_file
        assert!(rule.apply("创建一个文件", "创建一个文件").is_none());
    }
}
