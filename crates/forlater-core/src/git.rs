//! git 协作方：仓库根定位与受跟踪文件列表（薄封装）
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// 从当前目录向上查找 git 仓库根（含 `.git` 目录的最近祖先）
pub fn find_repository_root() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        if dir.join(".git").is_dir() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// 列出仓库跟踪的全部文件（相对根路径）
///
/// 直接透传 `git ls-files` 的输出，不假设任何顺序。
pub fn list_tracked_files(root: &Path) -> Result<Vec<String>> {
    let output = Command::new("git")
        .arg("ls-files")
        .current_dir(root)
        .output()
        .context("run `git ls-files`")?;
    if !output.status.success() {
        bail!("`git ls-files` exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
