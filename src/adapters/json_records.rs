//! Parser for bundles that an upstream extractor has already dumped to JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::collaborators::BundleParser;
use crate::models::{BundlePath, ResourceRecord};

/// Reads each bundle file as a JSON array of [`ResourceRecord`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordParser;

impl JsonRecordParser {
  /// Records stored in a single bundle file.
  pub fn read_bundle(path: &Path) -> Result<Vec<ResourceRecord>> {
    let text =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
  }
}

impl BundleParser for JsonRecordParser {
  fn load(&self, bundles: &[BundlePath]) -> Vec<ResourceRecord> {
    let mut records = Vec::new();
    for bundle in bundles {
      match Self::read_bundle(bundle.as_path()) {
        Ok(loaded) => {
          debug!("loaded {} records from {}", loaded.len(), bundle.as_path().display());
          records.extend(loaded);
        }
        Err(err) => warn!("skipping bundle: {err:#}"),
      }
    }
    records
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{RecordBody, ResourceKind};
  use tempfile::tempdir;

  #[test]
  fn loads_records_across_bundles_in_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let broken = dir.path().join("broken");
    let second = dir.path().join("second");
    fs::write(
      &first,
      r#"[
        {"byteSize": 10, "body": {"kind": "Sprite", "name": "a"}},
        {"byteSize": 11, "body": {"kind": "Mesh", "name": "b"}}
      ]"#,
    )
    .unwrap();
    fs::write(&broken, "not json").unwrap();
    fs::write(
      &second,
      r#"[{"byteSize": 12, "body": {"kind": "Other", "typeName": "Material"}}]"#,
    )
    .unwrap();

    let bundles: Vec<BundlePath> = [first, broken, second]
      .into_iter()
      .map(BundlePath::new)
      .collect();
    let records = JsonRecordParser.load(&bundles);

    let kinds: Vec<ResourceKind> = records.iter().map(ResourceRecord::kind).collect();
    assert_eq!(kinds, vec![
      ResourceKind::Sprite,
      ResourceKind::Mesh,
      ResourceKind::Other
    ]);
    assert_eq!(records[2].body, RecordBody::Other {
      type_name: "Material".into(),
      name: None,
    });
  }

  #[test]
  fn read_bundle_reports_the_failing_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let err = JsonRecordParser::read_bundle(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("missing"));
  }
}
