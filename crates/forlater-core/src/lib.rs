//! forLater 核心库：扫描 git 仓库中的内联标记（TODO 等）并汇总成报告
//!
//! 设计要点：
//! - 每个关键字编译两条行级正则（已跟踪 / 新发现），启动时一次性编译，扫描期只读共享。
//! - 行级先用 Aho-Corasick 对关键字字面量做快速预筛，命中后再跑精确正则。
//! - 单文件内按行号顺序产出条目；跨文件并行扫描，按文件索引合并，保证结果可复现。
//! - 逐文件失败只收集不中断，全部完成后以聚合错误上抛，绝不静默缺文件。

mod config;
mod error;
mod forge;
mod git;
mod items;
mod matchers;
mod options;
mod report;
mod scan;
mod scanner;

pub use config::{load_config, Config, ForgeConfig, CONFIG_FILE, REPORT_FILE};
pub use error::{Error, FileError};
pub use forge::{forge_from_config, Forge, GitLab, Issue};
pub use git::{find_repository_root, list_tracked_files};
pub use items::Item;
pub use matchers::{KeywordMatcher, LineMatch, MatcherSet};
pub use options::{ScanOptions, ScanStats};
pub use report::{clean_report, render_console, render_markdown};
pub use scan::{scan_repository, ScanOutcome};
