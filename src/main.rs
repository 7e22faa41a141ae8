use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dialogue_editor::format::{AdapterSet, SidecarCodec};
use dialogue_editor::utils::create_backup;
use dialogue_editor::{
    EditSession, EditorConfig, FileFormat, Language, LocalizationCatalog, RequestOutcome,
    TextLanguage, UiKey,
};

#[derive(Parser)]
#[command(name = "dialogue_editor")]
#[command(about = "编辑游戏资源容器中的对话文本")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// 文件格式（container 或 sidecar），默认按扩展名识别
    #[arg(long, global = true)]
    format: Option<FileFormat>,

    /// 容器中读取与写回的文本语言（EN 或 ZH）
    #[arg(long, global = true)]
    language: Option<TextLanguage>,

    /// 界面语言（zh 或 en）
    #[arg(long, global = true)]
    ui_language: Option<Language>,

    /// 配置文件路径
    #[arg(long, global = true, default_value = "dialogue_editor.json")]
    config: PathBuf,

    /// 覆盖文件前创建备份
    #[arg(long, global = true)]
    backup: bool,

    /// 静默模式(仅输出错误)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// 解析文件并输出 JSON 镜像
    Parse {
        input: PathBuf,

        /// 输出 JSON 文件路径，默认打印到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 将 JSON 镜像中的项目写入目标文件
    Export {
        project: PathBuf,
        destination: PathBuf,
    },
    /// 编辑单个条目
    Edit {
        input: PathBuf,

        #[arg(long)]
        category: String,

        #[arg(long)]
        key: String,

        #[arg(long)]
        text: String,

        /// 写出前提交编辑
        #[arg(long)]
        commit: bool,

        /// 输出文件路径，默认覆盖输入文件
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 显示项目统计信息
    Stats { input: PathBuf },
}

/// 命令执行环境
struct App {
    cli: Cli,
    config: EditorConfig,
    catalog: LocalizationCatalog,
    session: EditSession,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EditorConfig::load(&cli.config)
        .with_context(|| format!("读取配置文件失败: {:?}", cli.config))?;
    init_logging(&cli, &config);

    let mut codec = config.container_codec().context("脚本密钥无效")?;
    if let Some(language) = cli.language {
        codec.language = language;
    }
    debug!("容器文本语言: {}", codec.language);

    let catalog = LocalizationCatalog::new(cli.ui_language.unwrap_or(config.ui_language));
    let session = EditSession::with_adapters(AdapterSet::new(codec, SidecarCodec));

    let app = App {
        cli,
        config,
        catalog,
        session,
    };
    app.run().await
}

/// 初始化日志：`RUST_LOG` 优先，其次是命令行参数与配置文件
fn init_logging(cli: &Cli, config: &EditorConfig) {
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        config.log_filter.as_deref().unwrap_or("info")
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

impl App {
    async fn run(&self) -> anyhow::Result<()> {
        match &self.cli.command {
            Command::Parse { input, output } => self.handle_parse(input, output.as_deref()).await,
            Command::Export {
                project,
                destination,
            } => self.handle_export(project, destination).await,
            Command::Edit {
                input,
                category,
                key,
                text,
                commit,
                output,
            } => {
                self.handle_edit(input, category, key, text, *commit, output.as_deref())
                    .await
            }
            Command::Stats { input } => self.handle_stats(input).await,
        }
    }

    /// 处理解析：输出 JSON 镜像
    async fn handle_parse(&self, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
        self.load(input, self.input_format(input)?).await?;

        match output {
            Some(output) => self.save(output, FileFormat::Sidecar).await,
            None => {
                let json = SidecarCodec::to_json(&self.session.snapshot())?;
                println!("{}", json);
                Ok(())
            }
        }
    }

    /// 处理导出：提交项目中的编辑后写入目标文件
    async fn handle_export(&self, project: &Path, destination: &Path) -> anyhow::Result<()> {
        self.load(project, FileFormat::Sidecar).await?;
        let committed = self.session.commit();
        debug!("提交 {} 项编辑", committed);

        let format = self.output_format(destination, None)?;
        self.save(destination, format).await
    }

    /// 处理单条编辑
    async fn handle_edit(
        &self,
        input: &Path,
        category: &str,
        key: &str,
        text: &str,
        commit: bool,
        output: Option<&Path>,
    ) -> anyhow::Result<()> {
        let input_format = self.input_format(input)?;
        self.load(input, input_format).await?;

        self.session.set_edited(category, key, text);
        self.notify(UiKey::EntryUpdated, &[("category", category), ("key", key)]);

        if commit {
            let count = self.session.commit().to_string();
            self.notify(UiKey::CommittedEdits, &[("count", count.as_str())]);
        }

        match output {
            Some(output) => {
                let format = self.output_format(output, Some(input_format))?;
                self.save(output, format).await
            }
            None => self.save(input, input_format).await,
        }
    }

    /// 处理统计信息
    async fn handle_stats(&self, input: &Path) -> anyhow::Result<()> {
        self.load(input, self.input_format(input)?).await?;
        println!("{}", self.session.stats());
        Ok(())
    }

    async fn load(&self, path: &Path, format: FileFormat) -> anyhow::Result<()> {
        let outcome = self
            .session
            .request_load(format, Some(path.to_path_buf()))
            .await
            .map_err(|e| anyhow!(self.message(UiKey::LoadFailed, &[("reason", e.to_string().as_str())])))?;
        self.expect_completed(outcome)?;

        let stats = self.session.stats();
        let path = path.display().to_string();
        self.notify(
            UiKey::LoadedSummary,
            &[
                ("categories", stats.category_count.to_string().as_str()),
                ("entries", stats.entry_count.to_string().as_str()),
                ("path", path.as_str()),
            ],
        );
        Ok(())
    }

    async fn save(&self, path: &Path, format: FileFormat) -> anyhow::Result<()> {
        if (self.cli.backup || self.config.backup_before_export) && path.exists() {
            let backup = create_backup(path).context("创建备份失败")?;
            self.notify(UiKey::BackupCreated, &[("path", backup.display().to_string().as_str())]);
        }

        let outcome = self
            .session
            .request_export(format, Some(path.to_path_buf()))
            .await
            .map_err(|e| anyhow!(self.message(UiKey::ExportFailed, &[("reason", e.to_string().as_str())])))?;
        self.expect_completed(outcome)?;

        self.notify(UiKey::ExportedTo, &[("path", path.display().to_string().as_str())]);
        Ok(())
    }

    fn expect_completed(&self, outcome: RequestOutcome) -> anyhow::Result<()> {
        match outcome {
            RequestOutcome::Completed => Ok(()),
            RequestOutcome::Cancelled => bail!(self.message(UiKey::SelectionCancelled, &[])),
            RequestOutcome::Rejected => bail!(self.message(UiKey::RequestRejected, &[])),
        }
    }

    /// 输入格式：命令行指定优先，其次按扩展名
    fn input_format(&self, path: &Path) -> anyhow::Result<FileFormat> {
        self.cli
            .format
            .or_else(|| FileFormat::from_path(path))
            .ok_or_else(|| self.unknown_format(path))
    }

    /// 输出格式：按扩展名识别，其次命令行指定，最后沿用输入格式
    fn output_format(&self, path: &Path, fallback: Option<FileFormat>) -> anyhow::Result<FileFormat> {
        FileFormat::from_path(path)
            .or(self.cli.format)
            .or(fallback)
            .ok_or_else(|| self.unknown_format(path))
    }

    fn unknown_format(&self, path: &Path) -> anyhow::Error {
        anyhow!(self.message(UiKey::UnknownFormat, &[("path", path.display().to_string().as_str())]))
    }

    fn message(&self, key: UiKey, params: &[(&str, &str)]) -> String {
        self.catalog.resolve(key, params)
    }

    /// 向标准错误输出提示信息
    fn notify(&self, key: UiKey, params: &[(&str, &str)]) {
        if !self.cli.quiet {
            eprintln!("{}", self.message(key, params));
        }
    }
}
