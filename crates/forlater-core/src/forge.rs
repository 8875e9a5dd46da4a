//! forge 协作方：issue 服务的能力接口与 GitLab 实现
//!
//! 核心扫描只把条目的 id 当作不透明数据透传到这里；
//! 解释 id 的唯一场所就是 forge 后端本身。
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::ForgeConfig;
use crate::error::Error;

/// forge 侧的 issue 视图（只取需要的字段）
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    #[serde(rename = "iid")]
    pub id: u64,
    pub title: String,
    /// `opened` / `closed`
    pub state: String,
}

impl Issue {
    /// issue 状态到条目 `finished` 标志的映射；供报告加载边界
    /// （核对既有报告与 forge 状态）调用，扫描路径本身不使用
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}

/// issue 服务的能力接口；启动时按配置选择具体实现
pub trait Forge {
    /// 按编号取回一个 issue
    fn fetch_issue(&self, id: u64) -> Result<Issue>;
    /// 新建 issue，返回分配到的编号
    fn create_issue(&self, title: &str, body: &str) -> Result<u64>;
}

/// GitLab 实现（api/v4，私有令牌认证）
pub struct GitLab {
    client: reqwest::blocking::Client,
    issues_url: String,
    token: String,
}

impl GitLab {
    pub fn new(host: &str, project: &str, token: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            issues_url: issues_url(host, project),
            token: token.to_string(),
        }
    }
}

/// 项目路径须整体编码进 URL（`group/proj` → `group%2Fproj`）
fn issues_url(host: &str, project: &str) -> String {
    let encoded = project.replace('/', "%2F");
    format!("https://{host}/api/v4/projects/{encoded}/issues")
}

impl Forge for GitLab {
    fn fetch_issue(&self, id: u64) -> Result<Issue> {
        let response = self
            .client
            .get(format!("{}/{id}", self.issues_url))
            .header("Private-Token", &self.token)
            .send()
            .context("fetch issue")?
            .error_for_status()
            .context("fetch issue")?;
        response.json().context("decode issue response")
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<u64> {
        #[derive(Deserialize)]
        struct Created {
            iid: u64,
        }

        let response = self
            .client
            .post(&self.issues_url)
            .header("Private-Token", &self.token)
            .json(&serde_json::json!({ "title": title, "description": body }))
            .send()
            .context("create issue")?
            .error_for_status()
            .context("create issue")?;
        let created: Created = response.json().context("decode created issue")?;
        Ok(created.iid)
    }
}

/// 按配置挑选 forge 实现
pub fn forge_from_config(cfg: &ForgeConfig) -> Result<Box<dyn Forge>, Error> {
    match cfg.kind.as_str() {
        "gitlab" => Ok(Box::new(GitLab::new(&cfg.host, &cfg.project, &cfg.token))),
        other => Err(Error::Config(format!("unsupported forge kind `{other}`"))),
    }
}
