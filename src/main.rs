//! Export every sprite found in a game's asset bundles as PNG files.

use std::path::PathBuf;
use std::process::ExitCode;

use bundle_sprites::adapters::{JsonRecordParser, PngCodec};
use bundle_sprites::error::ExportError;
use bundle_sprites::export::{ExportRequest, SpriteExporter};
use bundle_sprites::indexer::ResourceIndex;
use bundle_sprites::text::fixed_width;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "bundle-sprites", version, about)]
struct Cli {
  /// Game root directory, e.g. -r D:/Games/raid
  #[arg(short = 'r', long = "rootDir")]
  root_dir: PathBuf,

  /// Asset directories to search, comma separated globs, e.g.
  /// -a resources,*/Raid_Data/StreamingAssets/AssetBundles
  #[arg(short = 'a', long = "assetDir", value_delimiter = ',')]
  asset_dir: Vec<String>,

  /// Bundle directories to match inside each asset directory, comma separated globs,
  /// e.g. -b *UIShared*,SkillIcons*
  #[arg(short = 'b', long = "bundleFiles", value_delimiter = ',')]
  bundle_files: Vec<String>,

  /// Directory exported files are written to
  #[arg(short = 'o', long = "outputDir")]
  output_dir: PathBuf,

  /// Print the resource index instead of exporting
  #[arg(short = 'l', long)]
  list: bool,
}

impl Cli {
  fn request(&self) -> ExportRequest {
    ExportRequest {
      root_dir: self.root_dir.clone(),
      dir_globs: self.asset_dir.clone(),
      file_globs: self.bundle_files.clone(),
      output_dir: self.output_dir.clone(),
    }
  }
}

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn run(cli: &Cli) -> Result<(), ExportError> {
  let exporter = SpriteExporter::new(JsonRecordParser, PngCodec);
  let request = cli.request();

  if cli.list {
    print_index(&exporter.index(&request)?);
    return Ok(());
  }

  let summary = exporter.export(&request)?;
  tracing::debug!(?summary, "export finished");
  Ok(())
}

fn print_index(index: &ResourceIndex) {
  for entry in index.entries() {
    println!(
      "{} {} {:>12}",
      fixed_width(entry.kind.as_str(), 18),
      fixed_width(&entry.display_text, 40),
      entry.full_size
    );
  }
}

fn exit_code(result: &Result<(), ExportError>) -> u8 {
  match result {
    Ok(()) => EXIT_SUCCESS,
    Err(_) => EXIT_ERROR,
  }
}

fn report(err: &ExportError) {
  match err {
    ExportError::NoBundlesMatched | ExportError::NoResourcesFound => println!("{err}"),
    other => eprintln!("Error: {other}"),
  }
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let _ = err.print();
      return if err.use_stderr() {
        ExitCode::from(EXIT_ERROR)
      } else {
        ExitCode::from(EXIT_SUCCESS)
      };
    }
  };

  init_logging();

  let result = run(&cli);
  if let Err(err) = &result {
    report(err);
  }
  ExitCode::from(exit_code(&result))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  #[test]
  fn splits_comma_separated_globs() {
    let cli = Cli::try_parse_from([
      "bundle-sprites",
      "-r",
      "game",
      "-a",
      "resources,*/Raid_Data/StreamingAssets/AssetBundles",
      "--bundleFiles",
      "HeroAvatars*",
      "--outputDir",
      "out",
    ])
    .unwrap();

    assert_eq!(cli.asset_dir, vec![
      "resources".to_string(),
      "*/Raid_Data/StreamingAssets/AssetBundles".to_string(),
    ]);
    assert_eq!(cli.bundle_files, vec!["HeroAvatars*".to_string()]);
    assert!(!cli.list);
  }

  #[test]
  fn glob_lists_may_be_omitted() {
    let cli = Cli::try_parse_from(["bundle-sprites", "--rootDir", "game", "-o", "out"]).unwrap();
    assert!(cli.asset_dir.is_empty());
    assert!(cli.bundle_files.is_empty());
  }

  #[test]
  fn root_and_output_are_required() {
    assert!(Cli::try_parse_from(["bundle-sprites", "-o", "out"]).is_err());
    assert!(Cli::try_parse_from(["bundle-sprites", "-r", "game"]).is_err());
  }

  #[test]
  fn empty_query_exits_with_failure_and_writes_nothing() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("out");
    let cli = Cli::try_parse_from([
      "bundle-sprites".into(),
      "-r".into(),
      temp.path().as_os_str().to_owned(),
      "-a".into(),
      "data".into(),
      "-b".into(),
      "bundle*".into(),
      "-o".into(),
      output.as_os_str().to_owned(),
    ])
    .unwrap();

    let result = run(&cli);
    assert!(matches!(result, Err(ExportError::NoBundlesMatched)));
    assert_eq!(exit_code(&result), EXIT_ERROR);
    assert!(!output.exists());
  }

  #[test]
  fn exports_sprites_from_record_dumps() {
    let temp = tempdir().unwrap();
    let bundle_dir = temp.path().join("data/bundle1");
    fs::create_dir_all(&bundle_dir).unwrap();
    fs::write(
      bundle_dir.join("__data"),
      r#"[
        {"byteSize": 4, "body": {"kind": "Sprite", "name": "dot",
          "image": {"width": 1, "height": 1, "rgba": "/wAA/w=="}}},
        {"byteSize": 4, "body": {"kind": "Sprite", "name": "ghost"}}
      ]"#,
    )
    .unwrap();
    let output = temp.path().join("out");
    let cli = Cli {
      root_dir: temp.path().to_path_buf(),
      asset_dir: vec!["data".into()],
      bundle_files: vec!["bundle*".into()],
      output_dir: output.clone(),
      list: false,
    };

    let result = run(&cli);
    assert_eq!(exit_code(&result), EXIT_SUCCESS);
    assert!(fs::read(output.join("dot.png")).unwrap().starts_with(b"\x89PNG"));
    assert!(!output.join("ghost.png").exists());
  }
}
