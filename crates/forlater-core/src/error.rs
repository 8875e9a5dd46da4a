//! 错误分类（对外暴露）
use std::path::PathBuf;
use thiserror::Error;

/// 单个文件的扫描失败（不可读、已跟踪 ID 畸形等）
/// 不会中断其他文件的扫描，由调度层收集后聚合上抛。
#[derive(Debug, Error)]
#[error("{}: {message}", path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// 顶层错误分类
#[derive(Debug, Error)]
pub enum Error {
    /// 配置错误（关键字非法、配置文件畸形），在任何扫描开始前即失败
    #[error("invalid configuration: {0}")]
    Config(String),

    /// 聚合的逐文件失败：所有文件扫描完成后一次性上抛
    #[error("scan failed for {} file(s)", .0.len())]
    Aggregate(Vec<FileError>),
}
