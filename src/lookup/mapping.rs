use std::collections::HashMap;

use tracing::debug;

use crate::models::{IndexEntry, ResourceKind};

/// Sprite display text to index entry.
///
/// When two sprites share a display text the one indexed later replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct NameMapping {
  sprites: HashMap<String, IndexEntry>,
}

impl NameMapping {
  /// Build the mapping from index entries, keeping sprites only.
  pub fn from_entries<I>(entries: I) -> Self
  where
    I: IntoIterator<Item = IndexEntry>,
  {
    let mut mapping = Self::default();
    for entry in entries {
      mapping.insert(entry);
    }
    mapping
  }

  /// Add a sprite entry, replacing any sprite with the same display text.
  ///
  /// Returns the replaced entry. Entries of other kinds are ignored.
  pub fn insert(&mut self, entry: IndexEntry) -> Option<IndexEntry> {
    if entry.kind != ResourceKind::Sprite {
      return None;
    }
    let replaced = self.sprites.insert(entry.display_text.clone(), entry);
    if let Some(previous) = &replaced {
      debug!(
        "sprite '{}' #{} replaced by a later entry",
        previous.display_text, previous.sequence_id
      );
    }
    replaced
  }

  /// Entry registered under `id`.
  pub fn get(&self, id: &str) -> Option<&IndexEntry> {
    self.sprites.get(id)
  }

  /// Number of distinct sprite names.
  pub fn len(&self) -> usize {
    self.sprites.len()
  }

  /// Returns `true` when no sprite was registered.
  pub fn is_empty(&self) -> bool {
    self.sprites.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::indexer::index;
  use crate::models::{RecordBody, ResourceRecord};

  #[test]
  fn later_sprites_win_on_duplicate_names() {
    let entries = index(vec![
      ResourceRecord::new(1, RecordBody::Sprite {
        name: "2470".into(),
        image: None,
      }),
      ResourceRecord::new(2, RecordBody::Sprite {
        name: "2470".into(),
        image: None,
      }),
    ])
    .into_entries();

    let mapping = NameMapping::from_entries(entries);
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get("2470").map(|entry| entry.sequence_id), Some(1));
  }

  #[test]
  fn keeps_sprites_only() {
    let entries = index(vec![
      ResourceRecord::new(1, RecordBody::Texture {
        name: "2470".into(),
        stream_data: None,
      }),
      ResourceRecord::new(1, RecordBody::Sprite {
        name: "2471".into(),
        image: None,
      }),
    ])
    .into_entries();

    let mapping = NameMapping::from_entries(entries);
    assert!(mapping.get("2470").is_none());
    assert!(mapping.get("2471").is_some());
  }
}
