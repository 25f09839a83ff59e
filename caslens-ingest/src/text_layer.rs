//! Decrypted text access for statement PDFs.
//!
//! The scanner only needs each page's text fragments in reading order; position
//! and font metadata are never consulted.

use lopdf::encryption::DecryptionError;
use lopdf::Document;
use tracing::debug;

use crate::error::{CasError, Result};

/// Per-page text fragments of an opened statement. Pages are 1-based.
pub trait TextLayer {
    fn page_count(&self) -> usize;

    fn page_fragments(&self, page: usize) -> Result<Vec<String>>;
}

/// Text layer backed by a decrypted `lopdf` document
pub struct LopdfTextLayer {
    doc: Document,
    page_numbers: Vec<u32>,
}

impl LopdfTextLayer {
    /// Load and, when encrypted, decrypt a statement.
    pub fn open(bytes: &[u8], password: &str) -> Result<Self> {
        let mut doc = Document::load_mem(bytes).map_err(decryption_error)?;

        if doc.is_encrypted() {
            doc.decrypt(password).map_err(decryption_error)?;
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(pages = page_numbers.len(), "statement opened");
        Ok(Self { doc, page_numbers })
    }
}

/// Only an explicit password mismatch is reported as a wrong password; lopdf
/// refuses AES (V4/V5) handlers before it ever checks one.
fn decryption_error(err: lopdf::Error) -> CasError {
    match err {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => CasError::IncorrectPassword,
        lopdf::Error::Decryption(
            reason @ (DecryptionError::UnsupportedEncryption
            | DecryptionError::InvalidKeyLength
            | DecryptionError::InvalidRevision),
        ) => CasError::UnsupportedEncryption(reason.to_string()),
        other => CasError::Unreadable(other.to_string()),
    }
}

impl TextLayer for LopdfTextLayer {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    /// lopdf breaks lines only at text-object ends and never emits blank
    /// lines, so a fragment here is usually a whole `BT`..`ET` run. That is
    /// coarser than a viewer's per-glyph-run text items, and a page built from
    /// one text object yields a single fragment with single-spaced words.
    fn page_fragments(&self, page: usize) -> Result<Vec<String>> {
        let number = page
            .checked_sub(1)
            .and_then(|idx| self.page_numbers.get(idx))
            .copied()
            .ok_or_else(|| CasError::PageText {
                page,
                reason: "no such page".to_string(),
            })?;

        let text = self
            .doc
            .extract_text(&[number])
            .map_err(|e| CasError::PageText {
                page,
                reason: e.to_string(),
            })?;

        Ok(text.lines().map(str::to_string).collect())
    }
}

/// Text layer over fragments already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTextLayer {
    pages: Vec<Vec<String>>,
}

impl MemoryTextLayer {
    pub fn new<P, S>(pages: P) -> Self
    where
        P: IntoIterator,
        P::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

impl TextLayer for MemoryTextLayer {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, page: usize) -> Result<Vec<String>> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .cloned()
            .ok_or_else(|| CasError::PageText {
                page,
                reason: "no such page".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object, StringFormat};

    #[test]
    fn test_memory_layer_is_one_based() {
        let layer = MemoryTextLayer::new(vec![vec!["a", "b"], vec!["c"]]);
        assert_eq!(layer.page_count(), 2);
        assert_eq!(layer.page_fragments(1).unwrap(), vec!["a", "b"]);
        assert_eq!(layer.page_fragments(2).unwrap(), vec!["c"]);
        assert!(layer.page_fragments(0).is_err());
        assert!(layer.page_fragments(3).is_err());
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = LopdfTextLayer::open(b"definitely not a pdf", "secret")
            .err()
            .unwrap();
        assert!(matches!(err, CasError::Unreadable(_)), "{err}");
    }

    /// One empty page behind a standard security handler. The U entry is
    /// zeroed, so no password ever matches it.
    fn encrypted_pdf(version: i64, revision: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(vec![page_id.into()]),
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => version,
            "R" => revision,
            "Length" => 128,
            "O" => Object::String(vec![7u8; 32], StringFormat::Hexadecimal),
            "U" => Object::String(vec![0u8; 32], StringFormat::Hexadecimal),
            "P" => -4,
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Encrypt", encrypt_id);
        doc.trailer.set(
            "ID",
            vec![
                Object::String(vec![1u8; 16], StringFormat::Hexadecimal),
                Object::String(vec![1u8; 16], StringFormat::Hexadecimal),
            ],
        );

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_aes_handler_is_not_a_password_failure() {
        let err = LopdfTextLayer::open(&encrypted_pdf(4, 4), "ABCDE1234F")
            .err()
            .unwrap();
        assert!(matches!(err, CasError::UnsupportedEncryption(_)), "{err}");
        assert!(err.is_input_rejection());
    }

    #[test]
    fn test_rc4_mismatch_is_incorrect_password() {
        let err = LopdfTextLayer::open(&encrypted_pdf(2, 3), "wrong")
            .err()
            .unwrap();
        assert!(matches!(err, CasError::IncorrectPassword), "{err}");
    }
}
