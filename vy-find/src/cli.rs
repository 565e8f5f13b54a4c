use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[clap(about = "Drive a find/replace session over a file.")]
pub struct Cli {
  /// File to search in.
  #[clap(short, long)]
  pub file: PathBuf,

  /// JSON array of requests to run, in order.
  ///
  /// Every request targets the view holding the file, unless it names another one. For instance:
  /// '[{"payload":{"type":"key","key":"<Return>","entry":"fo+"}},{"payload":{"type":"command","command":"replace_all"}}]'
  #[clap(short, long)]
  pub requests: Option<String>,

  /// Write the resulting text back to the file instead of printing it.
  #[clap(short, long)]
  pub in_place: bool,

  /// Configuration file to use instead of the default and user configuration.
  #[clap(short, long)]
  pub config: Option<PathBuf>,

  /// Verbosity.
  ///
  /// Can be accumulated to get more verbosity. Without this flag, logging is disabled. Then, for each application of the
  /// flag, the obtained verbosity follows this order: error, warn, info, debug, trace. Logs go to stderr.
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,
}
