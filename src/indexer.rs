//! Build the ordered index of decoded resources and derive a display name for each.

use tracing::warn;

use crate::models::{ContainerRef, IndexEntry, RecordBody, ResourceKind, ResourceRecord};

/// Ordered index entries plus the container references collected from manifests.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
  entries: Vec<IndexEntry>,
  containers: Vec<ContainerRef>,
}

impl ResourceIndex {
  /// Index records in the order they are produced.
  pub fn build<I>(records: I) -> Self
  where
    I: IntoIterator<Item = ResourceRecord>,
  {
    let mut index = Self::default();
    for (sequence_id, record) in records.into_iter().enumerate() {
      let entry = index.derive_entry(sequence_id, record);
      index.entries.push(entry);
    }
    index
  }

  /// Entries in processing order; `entries()[n].sequence_id == n`.
  pub fn entries(&self) -> &[IndexEntry] {
    &self.entries
  }

  /// Consume the index, keeping only the entries.
  pub fn into_entries(self) -> Vec<IndexEntry> {
    self.entries
  }

  /// References gathered from bundle and resource manifest container tables.
  ///
  /// Nothing in the export or lookup flow reads these yet; they are kept so callers that
  /// need to map objects back to their container paths can do so.
  pub fn containers(&self) -> &[ContainerRef] {
    &self.containers
  }

  /// Entries of a single kind, in processing order.
  pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &IndexEntry> {
    self.entries.iter().filter(move |entry| entry.kind == kind)
  }

  /// Number of indexed entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing was indexed.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn derive_entry(&mut self, sequence_id: usize, record: ResourceRecord) -> IndexEntry {
    let mut full_size = record.byte_size;

    let display_text = match &record.body {
      RecordBody::Texture { name, stream_data } => {
        if let Some(stream) = stream_data.as_ref().filter(|stream| !stream.path.is_empty()) {
          full_size = record.byte_size.saturating_add(stream.size);
        }
        name.clone()
      }
      RecordBody::AudioClip { name, source, size } => {
        if !source.is_empty() {
          full_size = record.byte_size.saturating_add(*size);
        }
        name.clone()
      }
      RecordBody::VideoClip {
        name,
        original_path,
        external_size,
      } => {
        if !original_path.is_empty() {
          let external = i64::try_from(*external_size).unwrap_or(i64::MAX);
          full_size = record.byte_size.saturating_add(external);
        }
        name.clone()
      }
      RecordBody::Shader { name, parsed_name } => parsed_name.as_ref().unwrap_or(name).clone(),
      RecordBody::ScriptedComponent { name, script_class } => match script_class {
        Some(class_name) if name.is_empty() => class_name.clone(),
        _ => name.clone(),
      },
      RecordBody::BundleManifest {
        name,
        container,
        preload_table,
      } => {
        let table_len = i64::try_from(preload_table.len()).unwrap_or(i64::MAX);
        for (key, info) in container {
          let start = i64::from(info.preload_index);
          let end = start + i64::from(info.preload_size);
          if end <= start {
            continue;
          }

          let first = start.clamp(0, table_len);
          let last = end.clamp(first, table_len);
          if first != start || last != end {
            warn!(
              "preload slots {start}..{end} for '{key}' reach outside a table of {} entries",
              preload_table.len()
            );
          }

          let slots = usize::try_from(first).unwrap_or(0)..usize::try_from(last).unwrap_or(0);
          let references = preload_table.get(slots).unwrap_or_default();
          self
            .containers
            .extend(references.iter().map(|reference| ContainerRef {
              reference: *reference,
              key: key.clone(),
            }));
        }
        name.clone()
      }
      RecordBody::ResourceManifest { container } => {
        self
          .containers
          .extend(container.iter().map(|(key, reference)| ContainerRef {
            reference: *reference,
            key: key.clone(),
          }));
        String::new()
      }
      RecordBody::Other { name, .. } => name.clone().unwrap_or_default(),
      RecordBody::GameObject { name }
      | RecordBody::Mesh { name }
      | RecordBody::TextAsset { name }
      | RecordBody::AnimationClip { name }
      | RecordBody::Font { name }
      | RecordBody::MovieClip { name }
      | RecordBody::Sprite { name, .. } => name.clone(),
    };

    let display_text = if display_text.is_empty() {
      format!("{} #{}", record.kind_text(), sequence_id)
    } else {
      display_text
    };

    IndexEntry {
      kind: record.kind(),
      display_text,
      sequence_id,
      full_size,
      record,
    }
  }
}

/// Index records in the exact order they are produced.
pub fn index<I>(records: I) -> ResourceIndex
where
  I: IntoIterator<Item = ResourceRecord>,
{
  ResourceIndex::build(records)
}
