//! 报告渲染与清理（纯文本函数，不做 I/O）
use crate::items::Item;

/// 渲染 Markdown 汇总报告
///
/// 结构：顶层标题，每个关键字一个 `##` 小节（按首次出现顺序），
/// 小节内按合并顺序逐条列出。
pub fn render_markdown(items: &[Item]) -> String {
    let mut out = String::from("# TODO List\n\n");

    // 按关键字分组，保持首次出现的顺序
    let mut groups: Vec<(&str, Vec<&Item>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(kw, _)| *kw == item.keyword) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.keyword.as_str(), vec![item])),
        }
    }

    for (keyword, members) in groups {
        out.push_str(&format!("## {keyword}\n\n"));
        for item in members {
            out.push_str(&item.markdown_string());
            out.push_str("\n\n");
        }
    }

    out
}

/// 渲染控制台列表（`list` 子命令的输出）
pub fn render_console(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("*  {item}\n"));
    }
    out
}

/// 从既有报告文本中删除已勾选（finished）的条目块
///
/// 条目块 = `- [x]` 行 + 紧随其后的缩进续行 + 其后的一个空行。
/// 只做文本变换，不解析条目，也不合并语义。
pub fn clean_report(text: &str) -> String {
    let mut out = String::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        if line.starts_with("- [x]") {
            while lines.peek().is_some_and(|next| next.starts_with("      ")) {
                lines.next();
            }
            if lines.peek().is_some_and(|next| next.trim().is_empty()) {
                lines.next();
            }
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(keyword: &str, title: &str) -> Item {
        Item {
            prefix: "// ".to_string(),
            keyword: keyword.to_string(),
            id: 0,
            file_path: "src/a.rs".to_string(),
            line: 1,
            title: title.to_string(),
            body: String::new(),
            finished: false,
        }
    }

    #[test]
    fn groups_follow_first_seen_keyword_order() {
        let items = vec![item("TODO", "one"), item("FIXME", "two"), item("TODO", "three")];
        let md = render_markdown(&items);
        let todo_at = md.find("## TODO").unwrap();
        let fixme_at = md.find("## FIXME").unwrap();
        assert!(todo_at < fixme_at);
        // 两条 TODO 都落在 TODO 小节内
        let todo_section = &md[todo_at..fixme_at];
        assert!(todo_section.contains("one"));
        assert!(todo_section.contains("three"));
        assert!(!todo_section.contains("two"));
    }

    #[test]
    fn report_starts_with_title() {
        assert!(render_markdown(&[]).starts_with("# TODO List\n"));
    }

    #[test]
    fn body_lines_render_indented_and_strippable() {
        let mut it = item("TODO", "title");
        it.body = "a\nb\n".to_string();
        let md = render_markdown(&[it]);
        let continuations: Vec<&str> = md
            .lines()
            .filter(|l| l.starts_with("      "))
            .map(|l| l.trim_start_matches("      "))
            .collect();
        // 去掉渲染器自身的缩进前缀即可还原正文两行
        assert!(continuations.iter().any(|l| l.ends_with("a<br>")));
        assert!(continuations.iter().any(|l| *l == "b"));
    }

    #[test]
    fn console_listing_prefixes_each_item() {
        let out = render_console(&[item("TODO", "one"), item("TODO", "two")]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().all(|l| l.starts_with("*  src/a.rs@1: TODO: ")));
    }

    #[test]
    fn clean_drops_finished_entries_and_keeps_the_rest() {
        let mut finished = item("TODO", "done");
        finished.finished = true;
        finished.body = "leftover\n".to_string();
        let open = item("TODO", "still open");
        let report = render_markdown(&[finished, open]);

        let cleaned = clean_report(&report);
        assert!(!cleaned.contains("done"));
        assert!(!cleaned.contains("leftover"));
        assert!(cleaned.contains("still open"));
        assert!(cleaned.contains("# TODO List"));
        assert!(cleaned.contains("## TODO"));
    }

    #[test]
    fn clean_is_a_noop_without_finished_entries() {
        let report = render_markdown(&[item("TODO", "open")]);
        assert_eq!(clean_report(&report), report);
    }
}
