pub mod cli;
pub mod errors;
pub mod loader;

use cli::CliCommand;
use errors::FrontendError;
use svgpcb_config::AppConfig;
use tracing::info;

/// 解析命令行剩余参数并执行子命令。
pub fn run_cli<I>(args: I, config: &AppConfig) -> Result<(), FrontendError>
where
    I: IntoIterator<Item = String>,
{
    let command = CliCommand::parse(args)?;
    info!(?command, "执行 CLI 子命令");
    cli::run(&command, config)
}
