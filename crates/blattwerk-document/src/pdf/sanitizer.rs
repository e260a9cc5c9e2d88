// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document sanitizer — strips embedded marker XObjects, overlay-frame drawing
// blocks, and Stamp annotations from a PDF, page by page, using `lopdf`.
//
// Sanitization is best-effort cleanup: every per-page step is individually
// fail-open. An object that cannot be inspected is left unchanged and logged;
// the document as a whole always comes back. This is the deliberate opposite
// of the compositor's fail-closed policy.

use blattwerk_core::error::{BlattwerkError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::content::{is_likely_marker, strip_overlay_frames, tokenize};

/// A standalone XObject invocation line: `/<name> Do`.
///
/// Every such line is dropped, not only those naming removed markers. The
/// upstream heuristic over-removes here and callers depend on the observable
/// behavior.
static INVOKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/\S+\s+Do$").expect("invoke pattern is valid"));

/// Where a dictionary lives relative to its owner: inline in the owning
/// dictionary, or behind an indirect reference.
#[derive(Debug, Clone, Copy)]
enum DictSite {
    Inline,
    Indirect(ObjectId),
}

/// Sanitize a serialized document, returning the rewritten bytes.
///
/// Fails only when the input cannot be decoded or the result cannot be
/// re-serialized; per-object problems inside the document never fail the
/// call.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn sanitize(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(bytes)
        .map_err(|err| BlattwerkError::MalformedDocument(err.to_string()))?;
    doc.decompress();

    sanitize_document(&mut doc);

    doc.compress();
    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        BlattwerkError::Processing(format!("failed to serialize sanitized document: {err}"))
    })?;
    debug!(output_bytes = output.len(), "sanitized document serialized");
    Ok(output)
}

/// Sanitize an already-decoded document in place. Never fails.
#[instrument(skip_all)]
pub fn sanitize_document(doc: &mut Document) {
    let pages: Vec<(u32, ObjectId)> = doc.get_pages().into_iter().collect();
    info!(pages = pages.len(), "sanitizing document");

    for (page_num, page_id) in pages {
        if let Err(err) = remove_marker_xobjects(doc, page_id) {
            warn!(page = page_num, %err, "marker removal skipped for page");
        }
        if let Err(err) = rewrite_page_content(doc, page_id) {
            warn!(page = page_num, %err, "content rewrite skipped for page");
        }
        if let Err(err) = remove_stamp_annotations(doc, page_id) {
            warn!(page = page_num, %err, "annotation filtering skipped for page");
        }
    }
}

// -- Marker XObjects ----------------------------------------------------------

/// Remove every form XObject the classifier flags from the page's resource
/// mapping. The mapping key is removed entirely when it empties; the stream
/// objects themselves are never deleted, so nothing can dangle.
fn remove_marker_xobjects(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let page = doc.get_object(page_id)?.as_dict()?;

    let resources_site = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => DictSite::Indirect(*id),
        Ok(Object::Dictionary(_)) => DictSite::Inline,
        // No page-level resources. An inherited dictionary is shared with
        // sibling pages and is deliberately left alone.
        _ => return Ok(()),
    };
    let resources: &Dictionary = match resources_site {
        DictSite::Inline => page.get(b"Resources")?.as_dict()?,
        DictSite::Indirect(id) => doc.get_object(id)?.as_dict()?,
    };

    let xobject_site = match resources.get(b"XObject") {
        Ok(Object::Reference(id)) => DictSite::Indirect(*id),
        Ok(Object::Dictionary(_)) => DictSite::Inline,
        _ => return Ok(()),
    };
    let xobjects: &Dictionary = match xobject_site {
        DictSite::Inline => resources.get(b"XObject")?.as_dict()?,
        DictSite::Indirect(id) => doc.get_object(id)?.as_dict()?,
    };

    let mut doomed: Vec<Vec<u8>> = Vec::new();
    for (name, value) in xobjects.iter() {
        let stream = match value {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Stream(stream)) => stream,
                _ => continue,
            },
            Object::Stream(stream) => stream,
            _ => continue,
        };

        let is_form = matches!(
            stream.dict.get(b"Subtype"),
            Ok(Object::Name(subtype)) if subtype == b"Form"
        );
        if !is_form {
            continue;
        }

        let content = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        if is_likely_marker(&content) {
            doomed.push(name.to_vec());
        }
    }

    if doomed.is_empty() {
        return Ok(());
    }
    info!(
        removed = doomed.len(),
        "marker form objects removed from page resources"
    );

    let emptied = match xobject_site {
        DictSite::Indirect(xid) => {
            let xdict = doc.get_object_mut(xid)?.as_dict_mut()?;
            for name in &doomed {
                xdict.remove(name);
            }
            xdict.iter().next().is_none()
        }
        DictSite::Inline => {
            let resources = resources_mut(doc, page_id, resources_site)?;
            let xdict = resources.get_mut(b"XObject")?.as_dict_mut()?;
            for name in &doomed {
                xdict.remove(name);
            }
            xdict.iter().next().is_none()
        }
    };

    if emptied {
        resources_mut(doc, page_id, resources_site)?.remove(b"XObject");
        debug!("empty XObject mapping removed from resources");
    }

    Ok(())
}

/// Mutable handle on the page's resources dictionary at the recorded site.
fn resources_mut(
    doc: &mut Document,
    page_id: ObjectId,
    site: DictSite,
) -> lopdf::Result<&mut Dictionary> {
    match site {
        DictSite::Inline => doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .get_mut(b"Resources")?
            .as_dict_mut(),
        DictSite::Indirect(id) => doc.get_object_mut(id)?.as_dict_mut(),
    }
}

// -- Content rewrite ----------------------------------------------------------

/// Run the page's (concatenated) content stream through the tokenizer and
/// overlay-frame stripper, then drop any remaining XObject invocation line.
fn rewrite_page_content(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let content = doc.get_page_content(page_id)?;
    let text = String::from_utf8_lossy(&content);

    let lines = tokenize(&text);
    let kept: Vec<&str> = strip_overlay_frames(&lines)
        .into_iter()
        .filter(|line| !INVOKE_RE.is_match(line.trim()))
        .collect();

    let rewritten = kept.join("\n").into_bytes();
    if rewritten != content {
        debug!(
            before = content.len(),
            after = rewritten.len(),
            "page content rewritten"
        );
        doc.change_page_content(page_id, rewritten)?;
    }
    Ok(())
}

// -- Annotations --------------------------------------------------------------

/// Drop every annotation of subtype Stamp, preserving the order of the rest.
/// The `/Annots` key is removed entirely when the sequence empties.
fn remove_stamp_annotations(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let page = doc.get_object(page_id)?.as_dict()?;

    let annots_site = match page.get(b"Annots") {
        Ok(Object::Reference(id)) => DictSite::Indirect(*id),
        Ok(Object::Array(_)) => DictSite::Inline,
        _ => return Ok(()),
    };
    let annots: Vec<Object> = match annots_site {
        DictSite::Inline => page.get(b"Annots")?.as_array()?.clone(),
        DictSite::Indirect(id) => doc.get_object(id)?.as_array()?.clone(),
    };

    let total = annots.len();
    let kept: Vec<Object> = annots
        .into_iter()
        .filter(|annot| !is_stamp(doc, annot))
        .collect();

    if kept.len() == total {
        return Ok(());
    }
    info!(removed = total - kept.len(), "stamp annotations removed");

    if kept.is_empty() {
        doc.get_object_mut(page_id)?.as_dict_mut()?.remove(b"Annots");
    } else {
        match annots_site {
            DictSite::Inline => {
                doc.get_object_mut(page_id)?
                    .as_dict_mut()?
                    .set("Annots", Object::Array(kept));
            }
            DictSite::Indirect(id) => {
                *doc.get_object_mut(id)? = Object::Array(kept);
            }
        }
    }
    Ok(())
}

/// True if the annotation (inline or referenced) has `/Subtype /Stamp`.
fn is_stamp(doc: &Document, annot: &Object) -> bool {
    let dict = match annot {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return false,
        },
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Subtype"),
        Ok(Object::Name(subtype)) if subtype == b"Stamp"
    )
}
