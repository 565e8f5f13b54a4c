mod cli;

use std::fs;

use clap::Parser;
use cli::Cli;
use vy_find::{
  error::OhNo,
  handler::Handler,
  logging::Verbosity,
  protocol::request::Request,
  text::memory::MemoryBuffer,
  views::ViewId,
};
use vy_find_config::Config;

fn main() {
  if let Err(err) = start() {
    log::error!("{err}");
    eprintln!("vy-find: {err}");
    std::process::exit(1);
  }
}

fn start() -> Result<(), OhNo> {
  let cli = Cli::parse();
  Verbosity::from_count(cli.verbose).init()?;

  let config = match cli.config {
    Some(ref path) => Config::load(path)?,
    None => Config::load_default_user()?,
  };
  log::trace!("running with configuration:\n{config:#?}");

  let requests = cli
    .requests
    .as_deref()
    .map(Request::many_from_json)
    .transpose()?
    .unwrap_or_default();

  let text = fs::read_to_string(&cli.file).map_err(|err| OhNo::CannotReadFile {
    file: cli.file.clone(),
    err,
  })?;

  let view = ViewId::default();
  let mut handler = Handler::new(config)?;
  handler.open_view(view.clone(), MemoryBuffer::new(text));

  for req in &requests {
    match handler.handle(req) {
      Ok(resp) => eprintln!("{}", resp.to_status()),

      Err(err) if err.is_recoverable() => {
        log::warn!("request failed: {err}");
        eprintln!("[{view}] {err}", view = req.view());
      }

      Err(err) => return Err(err),
    }
  }

  for msg in handler.status().messages() {
    log::debug!("status: {msg}");
  }

  let text = handler
    .take_buffer(&view)
    .map(MemoryBuffer::into_text)
    .unwrap_or_default();

  if cli.in_place {
    log::info!("writing back to {}", cli.file.display());
    fs::write(&cli.file, text).map_err(|err| OhNo::CannotWriteFile {
      file: cli.file.clone(),
      err,
    })?;
  } else {
    print!("{text}");
  }

  Ok(())
}
