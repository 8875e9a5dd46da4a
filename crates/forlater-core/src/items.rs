//! 扫描产出的条目（对外暴露）
use std::fmt;

/// 一条内联标记：起始行的标题 + 同前缀的连续续行正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// 起始行上关键字之前的原样前缀，例如 `// `；用于识别续行
    pub prefix: String,
    /// 命中的关键字，例如 `TODO`
    pub keyword: String,
    /// 外部 issue 编号或报告中的序号；0 表示尚未跟踪
    pub id: u64,
    /// 相对仓库根的文件路径
    pub file_path: String,
    /// 起始行号（从 1 开始）
    pub line: u32,
    /// 起始行上关键字之后的文本
    pub title: String,
    /// 续行正文：逐行去掉前缀后以换行拼接；无续行则为空
    pub body: String,
    /// issue 已关闭或报告列表项已勾选时为 true（仅由报告加载路径设置）
    pub finished: bool,
}

impl Item {
    /// ID 的展示形式：`(N)`，未跟踪时为空串
    pub fn display_id(&self) -> String {
        if self.id == 0 {
            String::new()
        } else {
            format!("({})", self.id)
        }
    }

    /// 正文的展示形式：非空时前置一个换行并去掉首尾空白
    fn body_in_lines(&self) -> String {
        if self.body.is_empty() {
            String::new()
        } else {
            format!("\n{}", self.body.trim())
        }
    }

    /// Markdown 报告中的列表项（复选框 + 路径@行号 + 标题 + 正文）
    pub fn markdown_string(&self) -> String {
        let check = if self.finished { 'x' } else { ' ' };
        let first_line = format!("- [{check}] {}@{}<br>\n      ", self.file_path, self.line);
        let second_line = format!("{}<strong>{}</strong>", self.display_id(), self.title);
        let body = self.body_in_lines().replace('\n', "<br>\n      ");
        format!("{first_line}{second_line}{body}")
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}: {}{}: {}{}",
            self.file_path,
            self.line,
            self.display_id(),
            self.keyword,
            self.title,
            self.body_in_lines().replace('\n', "\n   "),
        )
    }
}
