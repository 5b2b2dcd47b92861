use actuator::{run_cli, CliArgs};
use actuator_config::load_config;
use clap::Parser;
use tracing::{error, subscriber::set_global_default};
use tracing_subscriber::layer::SubscriberExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = CliArgs::parse();
  let config = load_config(&args.config_file_path, |key| std::env::var(key).ok());

  let logger_config = config.logger.clone().unwrap_or_default();
  let global_logger = actuator_logger::logger_layer::build_logger(
    &logger_config.format,
    &logger_config.filter,
    logger_config.print_performance_info,
  )?;
  set_global_default(tracing_subscriber::registry().with(global_logger))?;

  match run_cli(&args, &config).await {
    Ok(printed) => {
      println!("{}", printed);

      Ok(())
    }
    Err(e) => {
      error!("invocation failed: {:#}", e);

      Err(e)
    }
  }
}
