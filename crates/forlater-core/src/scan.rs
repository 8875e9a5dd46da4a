//! 扫描主流程与并行调度
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, FileError};
use crate::items::Item;
use crate::matchers::MatcherSet;
use crate::options::{ScanOptions, ScanStats};
use crate::scanner::{scan_file, FileOutcome};

/// 一次扫描的产出：合并后的条目 + 统计
#[derive(Debug)]
pub struct ScanOutcome {
    pub items: Vec<Item>,
    pub stats: ScanStats,
}

/// worker → merger 的消息：文件在输入列表中的索引 + 该文件的扫描结果
type Msg = (usize, Result<FileOutcome, FileError>);

/// 扫描仓库中给定的文件列表，合并为一个条目集合
///
/// 保证：
/// - 每个非排除、非目录的文件恰好扫描一次；
/// - 文件内条目按行号升序；跨文件按输入列表索引合并，结果可复现；
/// - 逐文件失败只收集，全部文件完成后以 `Error::Aggregate` 一次性上抛，
///   绝不返回静默缺了失败文件的"看似完整"结果。
pub fn scan_repository(
    root: &Path,
    files: &[String],
    matchers: &MatcherSet,
    opts: &ScanOptions,
) -> Result<ScanOutcome, Error> {
    let threads = opts.threads.unwrap_or_else(num_cpus::get).max(1);

    let results = if threads > 1 && files.len() > 1 {
        scan_parallel(root, files, matchers, threads)
    } else {
        scan_serial(root, files, matchers)
    };

    // 单线程合并：按文件索引顺序拼接，统计与错误在此一并收口
    let mut items: Vec<Item> = Vec::new();
    let mut errors: Vec<FileError> = Vec::new();
    let mut stats = ScanStats::default();

    for (_, res) in results {
        match res {
            Ok(FileOutcome::Scanned(found)) => {
                stats.files_scanned += 1;
                stats.todos_found += found.len();
                items.extend(found);
            }
            Ok(FileOutcome::Skipped) => stats.files_skipped += 1,
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(Error::Aggregate(errors));
    }
    Ok(ScanOutcome { items, stats })
}

fn scan_serial(root: &Path, files: &[String], matchers: &MatcherSet) -> BTreeMap<usize, Result<FileOutcome, FileError>> {
    files
        .iter()
        .enumerate()
        .map(|(idx, rel)| (idx, scan_file(&root.join(rel), rel, matchers)))
        .collect()
}

/// 并行调度：Rayon 线程池内逐文件扫描，crossbeam 通道回传，
/// 主线程按索引缓冲合并（每个任务只写自己的局部结果，无共享可变容器）
fn scan_parallel(
    root: &Path,
    files: &[String],
    matchers: &MatcherSet,
    threads: usize,
) -> BTreeMap<usize, Result<FileOutcome, FileError>> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    let (tx, rx) = channel::bounded::<Msg>(256);
    let mut buffer: BTreeMap<usize, Result<FileOutcome, FileError>> = BTreeMap::new();

    debug!(threads, files = files.len(), "starting parallel scan");

    std::thread::scope(|s| {
        s.spawn(move || {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .expect("build rayon pool");
            pool.install(|| {
                files.par_iter().enumerate().for_each_with(tx, |tx, (idx, rel)| {
                    let res = scan_file(&root.join(rel), rel, matchers);
                    // Receiver 存活期间 send 不会失败；失败也只意味着整体已被放弃
                    let _ = tx.send((idx, res));
                });
            });
            // 线程结束时全部 Sender 释放，Receiver 收到关闭信号
        });

        while let Ok((idx, res)) = rx.recv() {
            buffer.insert(idx, res);
        }
    });

    buffer
}
