//! Saved-document form of a label design.
//!
//! [`LabelDoc`] is the serializable snapshot of a [`LabelModel`]: the
//! template, the rotate flag, the objects and the merge attachment. Live
//! state that does not belong in a file (object identities, the selection,
//! merge records) is left out; merge records are re-read from the recorded
//! source path on load.
//!
//! On disk a document is a small header (magic bytes plus a format version)
//! followed by the bincode encoding of the snapshot.

use serde::{Deserialize, Serialize};

use crate::merge::MergeKind;
use crate::model::LabelModel;
use crate::object::LabelObject;
use crate::template::Template;

/// Serializable snapshot of a label document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDoc {
    pub template: Template,
    pub rotate: bool,
    pub objects: Vec<LabelObject>,
    pub merge_kind: MergeKind,
    /// Path of the merge source file, when one was attached.
    pub merge_source: Option<String>,
}

impl LabelDoc {
    /// Capture the current state of a model.
    pub fn from_model(model: &LabelModel) -> Self {
        Self {
            template: model.template().clone(),
            rotate: model.rotate(),
            objects: model.objects().to_vec(),
            merge_kind: model.merge().kind(),
            merge_source: model.merge().source().map(|p| p.to_string()),
        }
    }

    /// Save the document to a binary file with magic bytes and versioning.
    pub fn save_to_binary<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        std::io::Write::write_all(&mut writer, b"LABELSMITH")?;
        std::io::Write::write_all(&mut writer, &1u32.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Load a document from a binary file, checking magic bytes and version.
    pub fn load_from_binary<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut magic = [0u8; 10];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if &magic != b"LABELSMITH" {
            anyhow::bail!("Invalid magic bytes: expected 'LABELSMITH'");
        }
        let mut version_bytes = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != 1 {
            anyhow::bail!("Unsupported version: {}", version);
        }
        let doc: LabelDoc =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(doc)
    }
}
