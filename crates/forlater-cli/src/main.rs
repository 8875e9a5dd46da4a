use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use forlater_core::{
    clean_report, find_repository_root, forge_from_config, list_tracked_files, load_config,
    render_console, render_markdown, scan_repository, Error, MatcherSet, ScanOptions, ScanOutcome,
    REPORT_FILE,
};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "forlater", version, about = "扫描 git 仓库内联标记并汇总 TODO 报告")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 线程数（"auto"=CPU 核心数；1 走串行）
    #[arg(long, global = true, default_value = "auto")]
    threads: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出找到的全部标记到控制台
    List,
    /// 扫描并在仓库根生成 TODO.md 报告
    Create {
        /// 额外把未跟踪（无编号）的标记发布到配置的 forge
        #[arg(long)]
        publish: bool,
    },
    /// 从 TODO.md 中删除已勾选完成的条目
    Clean,
}

fn main() {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        // 聚合扫描失败使用保留退出码 2，并逐条打印失败文件
        if let Some(Error::Aggregate(failures)) = err.downcast_ref::<Error>() {
            error!("scan failed for {} file(s)", failures.len());
            for failure in failures {
                eprintln!("  {failure}");
            }
            std::process::exit(2);
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = find_repository_root().context("couldn't find root of git repository")?;
    info!(root = %root.display(), "found git repository");

    let config = load_config(&root)?;
    let matchers = MatcherSet::from_keywords(&config.keywords)?;
    let files = list_tracked_files(&root)?;
    let opts = ScanOptions { threads: parse_threads(&cli.threads)? };

    let outcome = scan_repository(&root, &files, &matchers, &opts)?;
    info!(
        files_scanned = outcome.stats.files_scanned,
        files_skipped = outcome.stats.files_skipped,
        todos_found = outcome.stats.todos_found,
        "scan finished"
    );

    match cli.command {
        Commands::List => {
            print!("{}", render_console(&outcome.items));
        }
        Commands::Create { publish } => {
            let report_path = root.join(REPORT_FILE);
            fs::write(&report_path, render_markdown(&outcome.items))
                .with_context(|| format!("write {}", report_path.display()))?;
            info!(report = %report_path.display(), "report written");
            if publish {
                publish_fresh(&config, &outcome)?;
            }
        }
        Commands::Clean => {
            clean(&root.join(REPORT_FILE))?;
        }
    }

    Ok(())
}

/// 把本次扫描中未跟踪（id == 0）的条目逐个发布到 forge
fn publish_fresh(config: &forlater_core::Config, outcome: &ScanOutcome) -> Result<()> {
    let forge_cfg = config
        .forge
        .as_ref()
        .ok_or_else(|| Error::Config("`--publish` requires a [forge] section".to_string()))?;
    let forge = forge_from_config(forge_cfg)?;

    for item in outcome.items.iter().filter(|item| item.id == 0) {
        let id = forge
            .create_issue(&item.title, &item.body)
            .with_context(|| format!("publish {}@{}", item.file_path, item.line))?;
        println!("created issue ({id}) for {}@{}", item.file_path, item.line);
    }
    Ok(())
}

fn clean(report_path: &Path) -> Result<()> {
    let text = fs::read_to_string(report_path)
        .with_context(|| format!("read {}", report_path.display()))?;
    fs::write(report_path, clean_report(&text))
        .with_context(|| format!("write {}", report_path.display()))?;
    info!(report = %report_path.display(), "finished entries removed");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数；非法取值直接报错，不静默回退 auto
fn parse_threads(s: &str) -> Result<Option<usize>> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => bail!("invalid --threads value `{s}` (expected \"auto\" or an integer >= 1)"),
    }
}
