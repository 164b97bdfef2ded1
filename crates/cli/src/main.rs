mod cmd;
mod output;

use std::fmt;
use std::process::ExitCode;

use bundlever_lib::host::OutputChannel;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::{UpdateArgs, cmd_update};
use crate::output::{HostKind, OutputFormat};

/// bundlever - stamp version and identity fields into an Info.plist
#[derive(Parser)]
#[command(name = "bundlever")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  inputs: UpdateArgs,

  /// Where to report logs, exports and failures
  #[arg(long, value_enum, env = "BUNDLEVER_HOST", default_value_t = HostKind::Auto)]
  host: HostKind,

  /// Output format for the result summary
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let host = cli.host.resolve();
  install_panic_hook(host, cli.output);

  let mut channel = host.channel(cli.verbose, cli.output);
  match cmd_update(&cli.inputs, cli.output, host == HostKind::Console, channel.as_mut()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::debug!(error = ?e, "update failed");
      channel.set_failed(&e.to_string());
      ExitCode::FAILURE
    }
  }
}

/// Report panics through the host's failure channel.
fn install_panic_hook(host: HostKind, format: OutputFormat) {
  std::panic::set_hook(Box::new(move |info| {
    eprintln!("{}", info);
    report_panic(host.channel(false, format).as_mut(), info);
  }));
}

fn report_panic(channel: &mut dyn OutputChannel, panic: &dyn fmt::Display) {
  channel.set_failed(&format!("Unhandled error: {}", panic));
}
