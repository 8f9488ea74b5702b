// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load generated or external PDFs and append pages using the
// `lopdf` crate.
//
// Appending is strictly additive: the base document's page tree gains new
// kids at the end and nothing already in it is rewritten.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use runsheet_core::error::{ReportError, Result};
use tracing::{debug, info, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed (cyclic) /Parent chains.
const MAX_TREE_DEPTH: usize = 64;

/// Wraps a loaded `lopdf::Document`.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ReportError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Append every page of `external`, in order, after this document's pages
    /// and return the combined bytes.
    #[instrument(skip_all, fields(external_len = external.len()))]
    pub fn append(mut self, external: &[u8]) -> Result<Vec<u8>> {
        let other = Document::load_mem(external).map_err(|err| {
            ReportError::Merge(format!("signed document could not be parsed: {}", err))
        })?;

        let other_pages = other.get_pages();
        if other_pages.is_empty() {
            return Err(ReportError::Merge("signed document has no pages".into()));
        }
        let base_pages = self.page_count();
        info!(
            base_pages,
            appended_pages = other_pages.len(),
            "Appending signed document"
        );

        let pages_id = page_tree_root(&self.document)?;
        let mut copier = PageCopier::new(&other);
        // BTreeMap iteration is already in page-number order.
        for page_id in other_pages.values() {
            let cloned = copier.copy_page(&mut self.document, *page_id)?;
            attach_page(&mut self.document, pages_id, cloned)?;
        }

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            ReportError::Merge(format!("failed to serialise merged PDF: {}", err))
        })?;

        debug!(output_bytes = output.len(), "Append complete");
        Ok(output)
    }
}

/// Append `external` to `base`. Either buffer failing to parse is a merge
/// failure; nothing partial is returned.
pub fn append_document(base: &[u8], external: &[u8]) -> Result<Vec<u8>> {
    let reader = PdfReader::from_bytes(base).map_err(|err| {
        ReportError::Merge(format!("generated document could not be re-read: {}", err))
    })?;
    reader.append(external)
}

/// Number of pages in a serialised PDF.
pub fn page_count(bytes: &[u8]) -> Result<usize> {
    Ok(PdfReader::from_bytes(bytes)?.page_count())
}

fn page_tree_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .map_err(|err| ReportError::Merge(format!("no catalog: {}", err)))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| ReportError::Merge(format!("no usable /Pages: {}", err)))
}

/// Add `page_id` as the last kid of the page tree root.
fn attach_page(doc: &mut Document, pages_id: ObjectId, page_id: ObjectId) -> Result<()> {
    let pages_dict = doc
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| ReportError::Merge(format!("page tree root unreadable: {}", err)))?;

    match pages_dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
        _ => {
            return Err(ReportError::Merge("page tree root has no /Kids array".into()));
        }
    }
    if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
        *count += 1;
    }

    if let Ok(Object::Dictionary(page_dict)) = doc.get_object_mut(page_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }
    Ok(())
}

/// Deep-copies objects from one document into another, copying each source
/// object at most once so shared resources stay shared and reference cycles
/// terminate.
struct PageCopier<'a> {
    source: &'a Document,
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy one page, folding inherited attributes into the page itself.
    fn copy_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let page = source.get_dictionary(page_id).map_err(|err| {
            ReportError::Merge(format!("cannot read page object {:?}: {}", page_id, err))
        })?;

        let new_id = target.new_object_id();
        self.copied.insert(page_id, new_id);

        let mut cloned = Dictionary::new();
        for (key, value) in page.iter() {
            if key.as_slice() == b"Parent" {
                continue;
            }
            cloned.set(key.clone(), self.copy_value(target, value)?);
        }
        for (key, value) in inherited_attributes(source, page) {
            debug!(key = %String::from_utf8_lossy(&key), "inherited page attribute copied");
            let value = self.copy_value(target, &value)?;
            cloned.set(key, value);
        }

        target.objects.insert(new_id, Object::Dictionary(cloned));
        Ok(new_id)
    }

    /// A reference the source cannot resolve aborts the copy.
    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Result<Object> {
        if let Some(existing) = self.copied.get(&id) {
            return Ok(Object::Reference(*existing));
        }
        let source = self.source;
        let object = source.get_object(id).map_err(|err| {
            ReportError::Merge(format!(
                "signed document references missing object {} {}: {}",
                id.0, id.1, err
            ))
        })?;

        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);
        let cloned = self.copy_value(target, object)?;
        target.objects.insert(new_id, cloned);
        Ok(Object::Reference(new_id))
    }

    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Result<Dictionary> {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            // A /Parent pointing into the page tree would drag the whole source
            // tree along; the page's own parent is patched by `attach_page`.
            if key.as_slice() == b"Parent" && self.is_page_tree_node(value) {
                continue;
            }
            out.set(key.clone(), self.copy_value(target, value)?);
        }
        Ok(out)
    }

    fn copy_value(&mut self, target: &mut Document, object: &Object) -> Result<Object> {
        Ok(match object {
            Object::Reference(id) => self.copy_reference(target, *id)?,
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)?),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_value(target, item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Object::Stream(stream) => {
                let mut cloned = stream.clone();
                cloned.dict = self.copy_dictionary(target, &stream.dict)?;
                Object::Stream(cloned)
            }
            other => other.clone(),
        })
    }

    fn is_page_tree_node(&self, value: &Object) -> bool {
        let Ok(id) = value.as_reference() else {
            return false;
        };
        self.source
            .get_dictionary(id)
            .and_then(|d| d.get(b"Type"))
            .and_then(Object::as_name)
            .is_ok_and(|name| name == b"Pages" || name == b"Page")
    }
}

/// Inheritable attributes the page does not set itself, taken from the
/// nearest ancestor that does.
fn inherited_attributes(source: &Document, page: &Dictionary) -> Vec<(Vec<u8>, Object)> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            warn!("page tree deeper than {MAX_TREE_DEPTH} levels, stopping inheritance walk");
            break;
        }
        let Ok(node) = source.get_dictionary(id) else {
            break;
        };
        for key in INHERITABLE {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    found
}
