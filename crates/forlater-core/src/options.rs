//! 扫描选项与统计信息（模块）

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { threads: None }
    }
}

/// 扫描统计信息（便于 CLI 打印）
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub todos_found: usize,
}
