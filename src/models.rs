//! Data structures shared by discovery, indexing, export and lookup.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Absolute path to a bundle file that existed when discovery ran.
///
/// Only [`crate::bundle_paths::locate`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundlePath(PathBuf);

impl BundlePath {
  pub(crate) fn new(path: PathBuf) -> Self {
    Self(path)
  }

  /// Borrow the underlying path.
  pub fn as_path(&self) -> &Path {
    &self.0
  }
}

impl AsRef<Path> for BundlePath {
  fn as_ref(&self) -> &Path {
    &self.0
  }
}

/// Fixed set of resource kinds the indexer knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
  /// Scene object.
  GameObject,
  /// Texture, possibly with pixel data streamed from a side file.
  Texture,
  /// Audio clip, possibly with sample data in an external resource.
  AudioClip,
  /// Video clip, possibly with frames in an external resource.
  VideoClip,
  /// Shader program.
  Shader,
  /// Mesh geometry.
  Mesh,
  /// Raw text or binary blob.
  TextAsset,
  /// Animation curves.
  AnimationClip,
  /// Font.
  Font,
  /// Movie texture.
  MovieClip,
  /// Sprite cut out of a texture; the only kind that is exported or served.
  Sprite,
  /// Scripted component whose name may come from its script class.
  ScriptedComponent,
  /// Bundle manifest carrying a container table with preload ranges.
  BundleManifest,
  /// Resource manifest carrying a flat container table.
  ResourceManifest,
  /// Anything else the parser produced.
  Other,
}

impl ResourceKind {
  /// Name used in fallback display text and listings.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::GameObject => "GameObject",
      Self::Texture => "Texture",
      Self::AudioClip => "AudioClip",
      Self::VideoClip => "VideoClip",
      Self::Shader => "Shader",
      Self::Mesh => "Mesh",
      Self::TextAsset => "TextAsset",
      Self::AnimationClip => "AnimationClip",
      Self::Font => "Font",
      Self::MovieClip => "MovieClip",
      Self::Sprite => "Sprite",
      Self::ScriptedComponent => "ScriptedComponent",
      Self::BundleManifest => "BundleManifest",
      Self::ResourceManifest => "ResourceManifest",
      Self::Other => "Other",
    }
  }
}

impl fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Reference to an object inside a bundle (file slot plus path id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
  /// Index of the serialized file the object lives in.
  pub file_id: i32,
  /// Object identifier within that file.
  pub path_id: i64,
}

/// Streamed side-file information attached to a texture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamData {
  /// Side-file path; empty when the pixels live inside the bundle.
  #[serde(default)]
  pub path: String,
  /// Number of bytes stored in the side file.
  #[serde(default)]
  pub size: i64,
}

/// Container-table value of a bundle manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
  /// First preload-table slot belonging to this container entry.
  pub preload_index: i32,
  /// Number of consecutive preload-table slots.
  pub preload_size: i32,
  /// Main asset of the container entry.
  #[serde(default)]
  pub asset: ObjectRef,
}

/// Decoded sprite pixels, tightly packed RGBA8 rows.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpriteImage {
  /// Width in pixels.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
  /// `width * height * 4` bytes of pixel data.
  #[serde(with = "base64_bytes")]
  pub rgba: Vec<u8>,
}

impl fmt::Debug for SpriteImage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SpriteImage")
      .field("width", &self.width)
      .field("height", &self.height)
      .field("rgba_len", &self.rgba.len())
      .finish()
  }
}

/// Kind-specific payload of a record. Each variant carries only the fields the indexer reads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum RecordBody {
  /// Scene object.
  GameObject {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Texture.
  Texture {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Side-file location of the pixel data, if any.
    #[serde(default)]
    stream_data: Option<StreamData>,
  },
  /// Audio clip.
  AudioClip {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// External resource path, empty when samples are embedded.
    #[serde(default)]
    source: String,
    /// Size of the external resource.
    #[serde(default)]
    size: i64,
  },
  /// Video clip.
  VideoClip {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Original path of the external frame data, empty when embedded.
    #[serde(default)]
    original_path: String,
    /// Size of the external resource.
    #[serde(default)]
    external_size: u64,
  },
  /// Shader.
  Shader {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Name taken from the parsed shader source, when the parser produced one.
    #[serde(default)]
    parsed_name: Option<String>,
  },
  /// Mesh.
  Mesh {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Text asset.
  TextAsset {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Animation clip.
  AnimationClip {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Font.
  Font {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Movie texture.
  MovieClip {
    /// Declared name.
    #[serde(default)]
    name: String,
  },
  /// Sprite.
  Sprite {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Pixels cut from the atlas, when the parser decoded them.
    #[serde(default)]
    image: Option<SpriteImage>,
  },
  /// Scripted component.
  ScriptedComponent {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Class name of the referenced script; `None` when the reference did not resolve.
    #[serde(default)]
    script_class: Option<String>,
  },
  /// Bundle manifest.
  BundleManifest {
    /// Declared name.
    #[serde(default)]
    name: String,
    /// Container table keyed by asset path.
    #[serde(default)]
    container: Vec<(String, AssetInfo)>,
    /// Preload table indexed by [`AssetInfo::preload_index`].
    #[serde(default)]
    preload_table: Vec<ObjectRef>,
  },
  /// Resource manifest.
  ResourceManifest {
    /// Container table keyed by resource path.
    #[serde(default)]
    container: Vec<(String, ObjectRef)>,
  },
  /// Any kind without a dedicated rule.
  Other {
    /// Type name reported by the parser.
    type_name: String,
    /// Declared name, when the kind has one.
    #[serde(default)]
    name: Option<String>,
  },
}

impl RecordBody {
  /// Kind tag for this payload.
  pub fn kind(&self) -> ResourceKind {
    match self {
      Self::GameObject { .. } => ResourceKind::GameObject,
      Self::Texture { .. } => ResourceKind::Texture,
      Self::AudioClip { .. } => ResourceKind::AudioClip,
      Self::VideoClip { .. } => ResourceKind::VideoClip,
      Self::Shader { .. } => ResourceKind::Shader,
      Self::Mesh { .. } => ResourceKind::Mesh,
      Self::TextAsset { .. } => ResourceKind::TextAsset,
      Self::AnimationClip { .. } => ResourceKind::AnimationClip,
      Self::Font { .. } => ResourceKind::Font,
      Self::MovieClip { .. } => ResourceKind::MovieClip,
      Self::Sprite { .. } => ResourceKind::Sprite,
      Self::ScriptedComponent { .. } => ResourceKind::ScriptedComponent,
      Self::BundleManifest { .. } => ResourceKind::BundleManifest,
      Self::ResourceManifest { .. } => ResourceKind::ResourceManifest,
      Self::Other { .. } => ResourceKind::Other,
    }
  }
}

/// One decoded resource as produced by the bundle parser.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
  /// Size of the serialized object inside the bundle.
  pub byte_size: i64,
  /// Kind tag and kind-specific fields.
  pub body: RecordBody,
}

impl ResourceRecord {
  /// Build a record from its size and payload.
  pub fn new(byte_size: i64, body: RecordBody) -> Self {
    Self { byte_size, body }
  }

  /// Kind tag of the record.
  pub fn kind(&self) -> ResourceKind {
    self.body.kind()
  }

  /// Text used when a record ends up without a display name.
  ///
  /// Records of an unlisted kind report the parser's own type name.
  pub fn kind_text(&self) -> &str {
    match &self.body {
      RecordBody::Other { type_name, .. } if !type_name.is_empty() => type_name,
      body => body.kind().as_str(),
    }
  }
}

/// Reference collected from a manifest's container table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
  /// Referenced object.
  pub reference: ObjectRef,
  /// Container key (usually an asset path) the reference was listed under.
  pub key: String,
}

/// Indexed resource with its derived display name.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
  /// Kind copied from the record.
  pub kind: ResourceKind,
  /// Human readable name; never empty.
  pub display_text: String,
  /// Zero-based position in the overall processing order.
  pub sequence_id: usize,
  /// Raw size plus any externally stored bytes.
  pub full_size: i64,
  /// Record the entry was derived from.
  pub record: ResourceRecord,
}

impl IndexEntry {
  /// Suffix used to disambiguate colliding names, e.g. `" #12"`.
  pub fn unique_suffix(&self) -> String {
    format!(" #{}", self.sequence_id)
  }
}

mod base64_bytes {
  use base64::Engine;
  use base64::engine::general_purpose::STANDARD;
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD
      .decode(encoded.as_bytes())
      .map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unlisted_kinds_report_their_parser_type_name() {
    let record = ResourceRecord::new(8, RecordBody::Other {
      type_name: "Material".into(),
      name: None,
    });
    assert_eq!(record.kind(), ResourceKind::Other);
    assert_eq!(record.kind_text(), "Material");

    let anonymous = ResourceRecord::new(8, RecordBody::Other {
      type_name: String::new(),
      name: None,
    });
    assert_eq!(anonymous.kind_text(), "Other");
  }

  #[test]
  fn deserializes_tagged_records_with_missing_fields() {
    let json = r#"{"byteSize": 32, "body": {"kind": "Sprite", "name": "icon"}}"#;
    let record: ResourceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.byte_size, 32);
    assert_eq!(record.body, RecordBody::Sprite {
      name: "icon".into(),
      image: None,
    });
  }

  #[test]
  fn sprite_pixels_travel_as_base64() {
    let record = ResourceRecord::new(4, RecordBody::Sprite {
      name: "dot".into(),
      image: Some(SpriteImage {
        width: 1,
        height: 1,
        rgba: vec![255, 0, 0, 255],
      }),
    });
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"/wAA/w==\""));
  }
}
