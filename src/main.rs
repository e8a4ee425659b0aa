use anyhow::Result;
use clap::Parser;
use persona_dashboard::cli::Cli;
use persona_dashboard::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行
    let config = Config::load()?.with_cli_overrides(cli.api_url.clone(), cli.verbose);

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config)?;
    app.run(cli.command).await?;

    Ok(())
}
