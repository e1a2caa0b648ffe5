use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use cursor_refresher::{
    AliasSettings, Config, EmailAliasManager, IdStrategy, RefreshOptions, SystemIdentifierManager,
    SystemPaths,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cursor_refresher")]
#[command(about = "刷新 Cursor 遥测标识符并轮换 addy.io 邮箱别名")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认: <配置目录>/cursor-refresher/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 静默模式(仅输出结果和错误)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 刷新 storage.json 中的遥测标识符
    RefreshIds {
        /// 标识符生成策略
        #[arg(long, value_enum, default_value_t = StrategyArg::Random)]
        strategy: StrategyArg,

        /// 不结束编辑器进程
        #[arg(long)]
        no_kill: bool,

        /// 不修改 main.js
        #[arg(long)]
        no_patch: bool,

        /// 写入前备份 storage.json
        #[arg(long)]
        backup: bool,

        /// 覆盖 storage.json 路径
        #[arg(long)]
        storage: Option<PathBuf>,

        /// 覆盖 main.js 路径
        #[arg(long)]
        main_js: Option<PathBuf>,
    },

    /// 删除旧别名并创建新别名
    RefreshEmail {
        /// addy.io API key
        #[arg(long, env = "ADDY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// 显示当前标识符
    Show {
        /// 覆盖 storage.json 路径
        #[arg(long)]
        storage: Option<PathBuf>,
    },

    /// 列出下一次轮换会删除的别名
    Aliases {
        /// addy.io API key
        #[arg(long, env = "ADDY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// 每个字段独立随机
    Random,
    /// 由一个种子经哈希派生
    Hash,
}

impl From<StrategyArg> for IdStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Random => IdStrategy::Random,
            StrategyArg::Hash => IdStrategy::HashDerived,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    match &cli.command {
        Command::RefreshIds {
            strategy,
            no_kill,
            no_patch,
            backup,
            storage,
            main_js,
        } => {
            let mut paths = config.paths;
            if let Some(storage) = storage {
                paths.storage = storage.clone();
            }
            if let Some(main_js) = main_js {
                paths.main_js = main_js.clone();
            }
            let options = RefreshOptions {
                strategy: (*strategy).into(),
                kill_process: !no_kill,
                patch_main_js: !no_patch,
                backup: *backup,
            };
            handle_refresh_ids(&cli, paths, options)
        }
        Command::RefreshEmail { api_key } => {
            let mut settings = config.alias;
            if let Some(key) = api_key {
                settings.addy_api_key = key.clone();
            }
            handle_refresh_email(&cli, settings)
        }
        Command::Show { storage } => {
            let mut paths = config.paths;
            if let Some(storage) = storage {
                paths.storage = storage.clone();
            }
            handle_show(paths)
        }
        Command::Aliases { api_key } => {
            let mut settings = config.alias;
            if let Some(key) = api_key {
                settings.addy_api_key = key.clone();
            }
            handle_list_aliases(&cli, settings)
        }
    }
}

/// 初始化日志（RUST_LOG 优先）
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cursor_refresher={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 处理标识符刷新
fn handle_refresh_ids(
    cli: &Cli,
    paths: SystemPaths,
    options: RefreshOptions,
) -> Result<()> {
    if !cli.quiet {
        println!("正在刷新标识符: {}", paths.storage.display());
    }

    let manager = SystemIdentifierManager::new(paths, options);
    let report = manager.refresh().context("刷新 Cursor 标识符失败")?;

    if !cli.quiet {
        print!("{}", report);
        println!("Cursor 标识符已刷新");
    }

    Ok(())
}

/// 处理邮箱别名轮换
fn handle_refresh_email(cli: &Cli, settings: AliasSettings) -> Result<()> {
    let manager = EmailAliasManager::connect(settings).context("刷新邮箱失败")?;
    let email = manager.refresh().context("刷新邮箱失败")?;

    // 静默模式下只输出地址，方便管道到剪贴板工具
    if cli.quiet {
        println!("{}", email);
    } else {
        println!("邮箱别名已刷新! 新邮箱: {}", email);
    }

    Ok(())
}

/// 显示当前标识符
fn handle_show(paths: SystemPaths) -> Result<()> {
    let manager = SystemIdentifierManager::new(paths, RefreshOptions::default());
    let ids = manager.current_identifiers().context("读取标识符失败")?;

    print!("{}", ids);
    Ok(())
}

/// 列出匹配的别名
fn handle_list_aliases(cli: &Cli, settings: AliasSettings) -> Result<()> {
    let manager = EmailAliasManager::connect(settings).context("读取别名失败")?;
    let aliases = manager.matching_aliases().context("读取别名失败")?;

    if !cli.quiet {
        println!("匹配的别名: {} 个", aliases.len());
    }
    for alias in &aliases {
        println!(
            "[{}] {} ({})",
            alias.id,
            alias.email.as_deref().unwrap_or(""),
            alias.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
