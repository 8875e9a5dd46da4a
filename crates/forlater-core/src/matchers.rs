//! 关键字匹配器（行级正则 + Aho-Corasick 预筛）
use aho_corasick::AhoCorasick;
use anyhow::{anyhow, Result};
use regex::Regex;

use crate::error::Error;

/// 单行命中的结果；id 为 0 表示新发现（尚未跟踪）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub prefix: String,
    pub keyword: String,
    pub id: u64,
    pub title: String,
}

/// 单个关键字的匹配器：构建后不可变，可跨线程只读共享
///
/// 两条行级正则整行锚定，前缀取最短匹配，标题取 `: ` 之后的全部文本：
/// - tracked：`^(.*?)\(([^)]*)\)<kw>: (.*)$`，括号内容宽松捕获，
///   解析为十进制 ID 失败（非数字、溢出）是该文件的致命错误，不回退为新条目
/// - fresh：  `^(.*?)<kw>: (.*)$`
#[derive(Debug)]
pub struct KeywordMatcher {
    keyword: String,
    tracked: Regex,
    fresh: Regex,
}

impl KeywordMatcher {
    /// 编译一个关键字的两条正则；关键字先做字面量转义
    pub fn new(keyword: &str) -> Result<Self, Error> {
        let escaped = regex::escape(keyword);
        let tracked = Regex::new(&format!(r"^(.*?)\(([^)]*)\){escaped}: (.*)$"))
            .map_err(|e| Error::Config(format!("keyword `{keyword}`: {e}")))?;
        let fresh = Regex::new(&format!(r"^(.*?){escaped}: (.*)$"))
            .map_err(|e| Error::Config(format!("keyword `{keyword}`: {e}")))?;
        Ok(Self { keyword: keyword.to_string(), tracked, fresh })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// 对一行做匹配。tracked 必须先于 fresh 尝试：
    /// 带 `(id)` 的行同样满足 fresh 形式，靠尝试顺序消除歧义。
    pub fn match_line(&self, line: &str) -> Result<Option<LineMatch>> {
        if let Some(caps) = self.tracked.captures(line) {
            let raw = &caps[2];
            let id: u64 = raw
                .parse()
                .map_err(|e| anyhow!("cannot parse tracked id `{raw}`: {e}"))?;
            return Ok(Some(LineMatch {
                prefix: caps[1].to_string(),
                keyword: self.keyword.clone(),
                id,
                title: caps[3].to_string(),
            }));
        }

        if let Some(caps) = self.fresh.captures(line) {
            return Ok(Some(LineMatch {
                prefix: caps[1].to_string(),
                keyword: self.keyword.clone(),
                id: 0,
                title: caps[2].to_string(),
            }));
        }

        Ok(None)
    }
}

/// 全部已配置关键字的匹配器集合
///
/// 附带一个关键字字面量的 AC 自动机：不含任何关键字的行直接放行，
/// 避免对每行跑全部正则。
#[derive(Debug)]
pub struct MatcherSet {
    matchers: Vec<KeywordMatcher>,
    prefilter: AhoCorasick,
}

impl MatcherSet {
    /// 从配置的关键字列表构建；去重保序，空列表回退为 `["TODO"]`
    pub fn from_keywords(keywords: &[String]) -> Result<Self, Error> {
        let mut distinct: Vec<&str> = Vec::new();
        for kw in keywords {
            if !kw.is_empty() && !distinct.contains(&kw.as_str()) {
                distinct.push(kw);
            }
        }
        if distinct.is_empty() {
            distinct.push("TODO");
        }

        let matchers = distinct
            .iter()
            .map(|kw| KeywordMatcher::new(kw))
            .collect::<Result<Vec<_>, Error>>()?;
        let prefilter = AhoCorasick::new(&distinct)
            .map_err(|e| Error::Config(format!("keyword prefilter: {e}")))?;

        Ok(Self { matchers, prefilter })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.keyword())
    }

    /// 逐关键字尝试匹配一行，返回首个命中
    pub fn match_line(&self, line: &str) -> Result<Option<LineMatch>> {
        if !self.prefilter.is_match(line) {
            return Ok(None);
        }
        for matcher in &self.matchers {
            if let Some(hit) = matcher.match_line(line)? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}
