//! Recognized-text context for generated diagrams.
//!
//! Text recognition itself is an external collaborator; this module defines
//! its contract and the read-only store of per-chart context strings that
//! gets passed explicitly into sample assembly. The store round-trips
//! through a binary file so recognition can run once per batch.

use crate::error::{RecognitionError, StoreError};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One piece of text recognized in an image, with the recognizer's
/// confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub confidence: f64,
}

/// Contract for the external text-recognition collaborator.
///
/// `allowlist` restricts recognition to the given characters (the node-name
/// alphabet). Failures are recoverable per image; the batch continues.
pub trait TextRecognizer {
    fn recognize(
        &self,
        image: &Path,
        allowlist: &str,
    ) -> Result<Vec<TextFragment>, RecognitionError>;
}

/// Read-only recognized-text context, one entry per chart id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrStore {
    contents: Vec<String>,
}

impl OcrStore {
    /// Builds the store from raw recognition output, one fragment list per
    /// chart in id order. Fragments below the confidence floor are dropped,
    /// as are the literal `y`/`n` tokens, which are reserved as condition
    /// markers and never node names.
    pub fn from_fragments(fragments: Vec<Vec<TextFragment>>, min_confidence: f64) -> Self {
        let contents = fragments
            .into_iter()
            .map(|list| {
                let names = list
                    .into_iter()
                    .filter(|f| f.confidence >= min_confidence)
                    .filter(|f| f.text != "y" && f.text != "n")
                    .map(|f| f.text)
                    .collect::<Vec<_>>();
                format!("[OCR] Node List: {}.", names.join(", "))
            })
            .collect();
        Self { contents }
    }

    /// The context block for one chart, if recognition produced one.
    pub fn content(&self, chart_id: usize) -> Option<&str> {
        self.contents.get(chart_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let bytes =
            encode_to_vec(self, standard()).map_err(|e| StoreError::Encode(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        decode_from_slice(&bytes, standard())
            .map(|(store, _)| store)
            .map_err(|e| StoreError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
