//! Turn display text into a file path that does not clobber anything already on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

/// Names this long or longer are replaced by a random stem.
pub const MAX_NAME_LENGTH: usize = 260;

/// Longest file name, in UTF-8 bytes, most file systems accept for one path component.
pub const MAX_FILE_NAME_BYTES: usize = 255;

const STEM_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// What to do when the plain candidate path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
  /// Try the suffixed candidate, and give up if that exists too.
  KeepDuplicates,
  /// Hand back the existing plain path; the caller overwrites or skips it.
  ReuseExisting,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Path that did not exist when checked; the output directory has been created.
  Available(PathBuf),
  /// Plain path that already exists, returned under [`CollisionPolicy::ReuseExisting`].
  Existing(PathBuf),
  /// Both the plain and the suffixed path exist.
  Exhausted,
}

impl Resolution {
  /// Usable path, if any.
  pub fn path(&self) -> Option<&Path> {
    match self {
      Self::Available(path) | Self::Existing(path) => Some(path.as_path()),
      Self::Exhausted => None,
    }
  }
}

fn invalid_file_name_chars() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"[\x00-\x1F"<>|:*?\\/]"#).expect("invalid file name character regex")
  })
}

/// Replace characters that are illegal in a file name with `_`.
///
/// Text of [`MAX_NAME_LENGTH`] characters or more is discarded in favour of a random stem.
pub fn sanitize_file_name(raw: &str) -> String {
  if raw.chars().count() >= MAX_NAME_LENGTH {
    return random_file_stem();
  }
  invalid_file_name_chars().replace_all(raw, "_").into_owned()
}

/// Random `xxxxxxxx.xxx` stem made of lowercase letters and digits.
pub fn random_file_stem() -> String {
  let mut rng = rand::rng();
  let chars: String = (0..11)
    .map(|_| char::from(STEM_CHARS[rng.random_range(0..STEM_CHARS.len())]))
    .collect();
  format!("{}.{}", &chars[..8], &chars[8..])
}

/// Pick a file path in `output_dir` for `raw_text`.
///
/// `unique_suffix` is appended to the stem when the plain name is taken and the policy is
/// [`CollisionPolicy::KeepDuplicates`]. `extension` includes its leading dot. A stem whose
/// suffixed file name would exceed [`MAX_FILE_NAME_BYTES`] is replaced by a random one. The
/// output directory is created whenever an available path is returned.
pub fn resolve(
  output_dir: &Path,
  raw_text: &str,
  unique_suffix: &str,
  extension: &str,
  policy: CollisionPolicy,
) -> io::Result<Resolution> {
  let mut file_name = sanitize_file_name(raw_text);
  if file_name.len() + unique_suffix.len() + extension.len() > MAX_FILE_NAME_BYTES {
    file_name = random_file_stem();
  }

  let plain = output_dir.join(format!("{file_name}{extension}"));
  if !plain.exists() {
    fs::create_dir_all(output_dir)?;
    return Ok(Resolution::Available(plain));
  }

  if policy == CollisionPolicy::ReuseExisting {
    return Ok(Resolution::Existing(plain));
  }

  let suffixed = output_dir.join(format!("{file_name}{unique_suffix}{extension}"));
  if !suffixed.exists() {
    fs::create_dir_all(output_dir)?;
    return Ok(Resolution::Available(suffixed));
  }

  Ok(Resolution::Exhausted)
}
