//! C-callable entry points over a process-wide [`LookupService`].
//!
//! Callers first ask for the encoded size of a sprite, then pass a buffer of at least that
//! size. No function writes past the capacity it is given, and none unwinds into the host:
//!
//! * `0` means not found (unknown id, or the cache could not be populated);
//! * a positive value is the number of bytes required or written;
//! * a negative value `-n` means the supplied buffer was null or smaller than `n` bytes and
//!   nothing was written.
//!
//! The service is configured from [`LookupConfig::from_environment`] on first use.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use super::LookupService;
use crate::adapters::{JsonRecordParser, LauncherManifestLocator, PngCodec};
use crate::config::LookupConfig;

type ProcessService = LookupService<JsonRecordParser, PngCodec, Option<LauncherManifestLocator>>;

static SERVICE: OnceLock<ProcessService> = OnceLock::new();

fn service() -> &'static ProcessService {
  SERVICE.get_or_init(|| {
    let config = LookupConfig::from_environment();
    let locator = config
      .launcher_manifest
      .clone()
      .map(LauncherManifestLocator::new);
    LookupService::new(config, JsonRecordParser, PngCodec, locator)
  })
}

/// Populate the cache if needed and report whether lookups can succeed.
#[unsafe(no_mangle)]
pub extern "system" fn bundle_lookup_ensure_initialized() -> bool {
  catch_unwind(|| service().is_valid()).unwrap_or(false)
}

/// Number of bytes the PNG for `id` occupies, or `0` when not found.
///
/// # Safety
///
/// `id` must be null or point to a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn bundle_lookup_png_size(id: *const u16) -> i64 {
  let Some(id) = (unsafe { read_wide(id) }) else {
    return 0;
  };
  catch_unwind(AssertUnwindSafe(|| {
    service()
      .lookup(&id)
      .map_or(0, |png| i64::try_from(png.len()).unwrap_or(i64::MAX))
  }))
  .unwrap_or(0)
}

/// Copy the PNG for `id` into `buf`.
///
/// Returns the number of bytes written, `0` when not found, or the negated required size
/// when `buf` is null or `capacity` is too small.
///
/// # Safety
///
/// `id` must be null or point to a NUL-terminated UTF-16 string, and `buf` must be null or
/// valid for writes of `capacity` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn bundle_lookup_png(
  id: *const u16,
  buf: *mut u8,
  capacity: usize,
) -> i64 {
  let Some(id) = (unsafe { read_wide(id) }) else {
    return 0;
  };
  let png = match catch_unwind(AssertUnwindSafe(|| service().lookup(&id))) {
    Ok(Some(png)) => png,
    Ok(None) | Err(_) => return 0,
  };
  unsafe { copy_out(&png, buf, capacity) }
}

/// Decode a NUL-terminated UTF-16 string; null and ill-formed input yield `None`.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated sequence of `u16`.
unsafe fn read_wide(ptr: *const u16) -> Option<String> {
  if ptr.is_null() {
    return None;
  }
  let mut len = 0;
  while unsafe { *ptr.add(len) } != 0 {
    len += 1;
  }
  let units = unsafe { std::slice::from_raw_parts(ptr, len) };
  String::from_utf16(units).ok()
}

/// Copy `bytes` into `buf` when it fits.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `capacity` bytes.
unsafe fn copy_out(bytes: &[u8], buf: *mut u8, capacity: usize) -> i64 {
  let len = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
  if buf.is_null() || capacity < bytes.len() {
    return -len;
  }
  unsafe { std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len()) };
  len
}

#[cfg(test)]
mod tests {
  use super::*;

  fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
  }

  #[test]
  fn reads_nul_terminated_utf16() {
    let id = wide("2470");
    assert_eq!(unsafe { read_wide(id.as_ptr()) }, Some("2470".to_string()));

    let empty = wide("");
    assert_eq!(unsafe { read_wide(empty.as_ptr()) }, Some(String::new()));
  }

  #[test]
  fn rejects_null_and_unpaired_surrogates() {
    assert_eq!(unsafe { read_wide(std::ptr::null()) }, None);
    let lone_surrogate = [0xD800u16, 0];
    assert_eq!(unsafe { read_wide(lone_surrogate.as_ptr()) }, None);
  }

  #[test]
  fn copies_when_the_buffer_is_large_enough() {
    let mut buf = [0u8; 8];
    let written = unsafe { copy_out(b"png", buf.as_mut_ptr(), buf.len()) };
    assert_eq!(written, 3);
    assert_eq!(&buf[..4], b"png\0");
  }

  #[test]
  fn refuses_small_or_missing_buffers() {
    let mut buf = [7u8; 2];
    let written = unsafe { copy_out(b"png", buf.as_mut_ptr(), buf.len()) };
    assert_eq!(written, -3);
    assert_eq!(buf, [7, 7]);

    assert_eq!(unsafe { copy_out(b"png", std::ptr::null_mut(), 64) }, -3);
  }

  /// The only test that touches the process-wide service; it owns its configuration.
  #[test]
  fn serves_sprites_through_the_size_then_copy_calls() {
    let temp = tempfile::tempdir().unwrap();
    let install = temp.path().join("game");
    let bundle_dir = install.join("resources/HeroAvatars");
    std::fs::create_dir_all(&bundle_dir).unwrap();
    std::fs::write(
      bundle_dir.join("__data"),
      r#"[{"byteSize": 4, "body": {"kind": "Sprite", "name": "2470",
        "image": {"width": 1, "height": 1, "rgba": "/wAA/w=="}}}]"#,
    )
    .unwrap();

    let manifest = temp.path().join("apps.json");
    let apps = serde_json::json!([{"id": 101, "key": "raid", "installPath": install}]);
    std::fs::write(&manifest, apps.to_string()).unwrap();
    let config = temp.path().join("lookup.json");
    let settings = serde_json::json!({"launcherManifest": manifest});
    std::fs::write(&config, settings.to_string()).unwrap();
    unsafe { std::env::set_var(crate::config::CONFIG_ENV_VAR, &config) };

    assert!(bundle_lookup_ensure_initialized());

    let id = wide("2470");
    let size = unsafe { bundle_lookup_png_size(id.as_ptr()) };
    assert!(size > 0);

    let mut small = vec![0u8; 4];
    assert_eq!(
      unsafe { bundle_lookup_png(id.as_ptr(), small.as_mut_ptr(), small.len()) },
      -size
    );
    assert_eq!(small, [0; 4]);
    assert_eq!(
      unsafe { bundle_lookup_png(id.as_ptr(), std::ptr::null_mut(), 0) },
      -size
    );

    let mut buf = vec![0u8; usize::try_from(size).unwrap()];
    assert_eq!(
      unsafe { bundle_lookup_png(id.as_ptr(), buf.as_mut_ptr(), buf.len()) },
      size
    );
    assert!(buf.starts_with(b"\x89PNG"));

    let missing = wide("9999");
    assert_eq!(unsafe { bundle_lookup_png_size(missing.as_ptr()) }, 0);
  }

  #[test]
  fn null_ids_are_not_found() {
    assert_eq!(unsafe { bundle_lookup_png_size(std::ptr::null()) }, 0);
    let mut buf = [0u8; 4];
    assert_eq!(
      unsafe { bundle_lookup_png(std::ptr::null(), buf.as_mut_ptr(), buf.len()) },
      0
    );
  }
}
