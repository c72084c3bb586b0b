use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zhome_config::{AppConfig, ConfigError};
use zhome_io::{DocumentSaver, HomeXmlFacade};

mod summary;

#[derive(Parser)]
#[command(name = "zhome")]
#[command(about = "读取、检查与转换住宅 XML 文档", long_about = None)]
struct Cli {
    /// 配置文件路径，缺省时自动发现
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 输出文档概要（层级、墙体、家具与诊断信息）
    Summary {
        /// `.xml` 或 `.sh3d` 文件
        file: PathBuf,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 读取文档并按当前写出设置重新保存为 XML
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_configuration(cli.config);
    init_logging(&config);
    let facade = facade_from(&config);

    match cli.command {
        Commands::Summary { file, json } => show_summary(&facade, &file, json),
        Commands::Convert { input, output } => convert(&facade, &input, &output),
    }
}

fn facade_from(config: &AppConfig) -> HomeXmlFacade {
    HomeXmlFacade::new()
        .with_root_element(config.reader.root_element.clone())
        .with_extra_patterns(config.reader.extra_patterns.iter().cloned())
        .with_content_roots(config.resources.content_roots.clone())
        .with_indent(config.writer.indent)
}

fn show_summary(facade: &HomeXmlFacade, file: &Path, json: bool) -> Result<()> {
    let report = facade
        .load_report(file)
        .with_context(|| format!("读取 {} 失败", file.display()))?;
    let summary = summary::HomeSummary::from_report(&report);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn convert(facade: &HomeXmlFacade, input: &Path, output: &Path) -> Result<()> {
    let report = facade
        .load_report(input)
        .with_context(|| format!("读取 {} 失败", input.display()))?;
    for diagnostic in &report.diagnostics {
        warn!(%diagnostic, "转换时忽略");
    }
    facade
        .save(&report.home, output)
        .with_context(|| format!("写入 {} 失败", output.display()))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        furniture = report.home.furniture_count(),
        "转换完成"
    );
    Ok(())
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. }
                    | ConfigError::Parse { path, .. }
                    | ConfigError::Invalid { path, .. } => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "加载默认配置失败，使用内建默认值"
                        );
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
