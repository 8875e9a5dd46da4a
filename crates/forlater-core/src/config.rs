//! 配置文件加载（TOML，位于仓库根）
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;

/// 配置文件名；扫描时按文件名后缀自排除
pub const CONFIG_FILE: &str = ".forlater.toml";
/// 汇总报告文件名；同样自排除，避免扫到上一轮的产物
pub const REPORT_FILE: &str = "TODO.md";

/// forge 后端的连接配置
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeConfig {
    /// 后端类型，目前支持 `gitlab`
    #[serde(default = "default_forge_kind")]
    pub kind: String,
    /// 实例主机名，如自建 GitLab；缺省为 gitlab.com
    #[serde(default = "default_forge_host")]
    pub host: String,
    /// 项目路径，例如 `group/project`
    pub project: String,
    /// 私有访问令牌
    pub token: String,
}

fn default_forge_kind() -> String {
    "gitlab".to_string()
}

fn default_forge_host() -> String {
    "gitlab.com".to_string()
}

/// 顶层配置文件结构
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// 要跟踪的关键字；为空时调用方回退为 `["TODO"]`
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub forge: Option<ForgeConfig>,
}

/// 从仓库根读取 `.forlater.toml`；文件不存在视为空配置
pub fn load_config(root: &Path) -> Result<Config, Error> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(Config::default());
    }
    let txt = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    toml::from_str(&txt).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert!(cfg.keywords.is_empty());
        assert!(cfg.forge.is_none());
    }

    #[test]
    fn keywords_and_forge_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "keywords = [\"TODO\", \"FIXME\"]\n\n[forge]\nproject = \"group/proj\"\ntoken = \"secret\"\n",
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.keywords, vec!["TODO", "FIXME"]);
        let forge = cfg.forge.unwrap();
        assert_eq!(forge.kind, "gitlab");
        assert_eq!(forge.host, "gitlab.com");
        assert_eq!(forge.project, "group/proj");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "keywords = [").unwrap();
        assert!(matches!(load_config(dir.path()), Err(Error::Config(_))));
    }
}
