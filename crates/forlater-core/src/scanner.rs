//! 单文件扫描：逐行状态机（无当前条目 / 条目进行中）
use std::path::Path;
use tracing::debug;

use crate::config::{CONFIG_FILE, REPORT_FILE};
use crate::error::FileError;
use crate::items::Item;
use crate::matchers::{LineMatch, MatcherSet};

/// 单文件扫描的结果
#[derive(Debug)]
pub(crate) enum FileOutcome {
    Scanned(Vec<Item>),
    /// 目录、报告文件或配置文件，按约定跳过（记日志，不算错误）
    Skipped,
}

/// 路径是否按文件名自排除（报告与配置文件，大小写不敏感的后缀匹配）
fn is_excluded(rel_path: &str) -> bool {
    let lower = rel_path.to_lowercase();
    lower.ends_with(&REPORT_FILE.to_lowercase()) || lower.ends_with(CONFIG_FILE)
}

/// 扫描一个文件，产出其中的全部条目（按行号升序）
///
/// 状态机每行按固定优先级推进：
/// 1. 行命中某关键字：结算当前条目（如有），以该行开启新条目；
/// 2. 否则若有当前条目、行非空且以其前缀开头：去前缀后追加进正文；
/// 3. 否则结算当前条目。文件结束时冲刷未结算的条目。
/// 顺序 1 在 2 之前不可交换：紧邻上一条目的新标记行必须开新条目，而不是进正文。
pub(crate) fn scan_file(
    abs_path: &Path,
    rel_path: &str,
    matchers: &MatcherSet,
) -> Result<FileOutcome, FileError> {
    if abs_path.is_dir() {
        debug!(path = rel_path, "skipping directory");
        return Ok(FileOutcome::Skipped);
    }
    if is_excluded(rel_path) {
        debug!(path = rel_path, "skipping report or configuration file");
        return Ok(FileOutcome::Skipped);
    }

    let bytes = std::fs::read(abs_path).map_err(|e| FileError {
        path: abs_path.to_path_buf(),
        message: e.to_string(),
    })?;
    // 有损解码：二进制或混编文件按替换字符处理，不作为错误
    let text = String::from_utf8_lossy(&bytes);

    let mut items: Vec<Item> = Vec::new();
    let mut current: Option<Item> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let linenum = (idx + 1) as u32;
        // lines() 已处理 \r\n；这里兜底文件末尾无换行时残留的孤立 \r
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        let hit = matchers.match_line(line).map_err(|e| FileError {
            path: abs_path.to_path_buf(),
            message: format!("line {linenum}: {e}"),
        })?;

        if let Some(hit) = hit {
            if let Some(done) = current.take() {
                items.push(done);
            }
            current = Some(new_item(hit, rel_path, linenum));
        } else if let Some(mut item) = current.take() {
            match line_as_body(line, &item.prefix) {
                Some(rest) => {
                    item.body.push_str(rest);
                    item.body.push('\n');
                    current = Some(item);
                }
                None => items.push(item),
            }
        }
    }

    if let Some(item) = current.take() {
        items.push(item);
    }

    Ok(FileOutcome::Scanned(items))
}

fn new_item(hit: LineMatch, rel_path: &str, linenum: u32) -> Item {
    Item {
        prefix: hit.prefix,
        keyword: hit.keyword,
        id: hit.id,
        file_path: rel_path.to_string(),
        line: linenum,
        title: hit.title,
        body: String::new(),
        finished: false,
    }
}

/// 非空且以当前条目前缀开头的行才算续行
fn line_as_body<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if line.is_empty() {
        return None;
    }
    line.strip_prefix(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn matchers() -> MatcherSet {
        MatcherSet::from_keywords(&["TODO".to_string(), "FIXME".to_string()]).unwrap()
    }

    fn scan_str(content: &str) -> Vec<Item> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.rs");
        fs::write(&path, content).unwrap();
        match scan_file(&path, "sample.rs", &matchers()).unwrap() {
            FileOutcome::Scanned(items) => items,
            FileOutcome::Skipped => panic!("unexpected skip"),
        }
    }

    #[test]
    fn single_fresh_todo() {
        let items = scan_str("fn main() {}\n// TODO: do the thing\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].prefix, "// ");
        assert_eq!(items[0].title, "do the thing");
        assert_eq!(items[0].line, 2);
        assert_eq!(items[0].id, 0);
        assert!(items[0].body.is_empty());
    }

    #[test]
    fn continuation_lines_build_the_body() {
        let items = scan_str("// TODO: title\n// body text\n// more\nfn f() {}\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "body text\nmore\n");
    }

    #[test]
    fn prefix_mismatch_closes_the_item() {
        let items = scan_str("// TODO: title\n# not a continuation\n");
        assert_eq!(items.len(), 1);
        assert!(items[0].body.is_empty());
    }

    #[test]
    fn adjacent_todos_become_two_items() {
        // 第二行同时满足续行前缀与关键字形式，关键字优先
        let items = scan_str("// TODO: first\n// TODO: second\n");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "first");
        assert_eq!(items[1].title, "second");
        assert_eq!(items[1].line, 2);
    }

    #[test]
    fn item_pending_at_eof_is_flushed() {
        let items = scan_str("// TODO: last line of the file");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "last line of the file");
    }

    #[test]
    fn empty_line_terminates_even_with_empty_prefix() {
        let items = scan_str("TODO: bare marker\n\nTODO: second\n");
        assert_eq!(items.len(), 2);
        assert!(items[0].body.is_empty());
    }

    #[test]
    fn tracked_id_is_carried_over() {
        let items = scan_str("// (12)TODO: already filed\n");
        assert_eq!(items[0].id, 12);
    }

    #[test]
    fn mixed_keywords_in_one_file() {
        let items = scan_str("// TODO: a\nlet x = 1;\n# FIXME: b\n# more b\n");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].keyword, "TODO");
        assert_eq!(items[1].keyword, "FIXME");
        assert_eq!(items[1].body, "more b\n");
    }

    #[test]
    fn crlf_lines_do_not_leak_carriage_returns() {
        let items = scan_str("// TODO: title\r\n// body\r\n");
        assert_eq!(items[0].title, "title");
        assert_eq!(items[0].body, "body\n");
    }

    #[test]
    fn report_and_config_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["TODO.md", "todo.md", "docs/Todo.md", ".forlater.toml"] {
            let path = dir.path().join(name.replace('/', "_"));
            fs::write(&path, "// TODO: should not be seen\n").unwrap();
            assert!(matches!(
                scan_file(&path, name, &matchers()).unwrap(),
                FileOutcome::Skipped
            ));
        }
    }

    #[test]
    fn directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            scan_file(dir.path(), "subdir", &matchers()).unwrap(),
            FileOutcome::Skipped
        ));
    }

    #[test]
    fn unreadable_file_is_a_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.rs");
        assert!(scan_file(&missing, "gone.rs", &matchers()).is_err());
    }

    #[test]
    fn malformed_tracked_id_fails_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.rs");
        fs::write(&path, "ok\n// (99999999999999999999999)TODO: huge\n").unwrap();
        let err = scan_file(&path, "bad.rs", &matchers()).unwrap_err();
        assert!(err.message.contains("line 2"));
    }

    #[test]
    fn non_numeric_tracked_id_fails_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.rs");
        fs::write(&path, "// (abc)TODO: not numeric\n").unwrap();
        let err = scan_file(&path, "bad.rs", &matchers()).unwrap_err();
        assert!(err.message.contains("line 1"));
        assert!(err.message.contains("abc"));
    }
}
