//! Page-level PDF concatenation.
//!
//! Objects of every input are renumbered into one id space, all pages are
//! re-parented under a single page tree (in input order) and the first
//! catalog is kept as the document root. Outlines are dropped since their
//! destinations no longer line up.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Merges the PDFs at `inputs`, in order, into a new PDF at `output`.
#[instrument(skip_all, fields(inputs = inputs.len(), output = %output.as_ref().display()))]
pub async fn merge(inputs: &[PathBuf], output: impl AsRef<Path>) -> Result<()> {
    let output = output.as_ref().to_path_buf();
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        let bytes = tokio::fs::read(input).await.or_raise(|| ErrorKind::Io(input.clone()))?;
        let origin = input.clone();
        let document = tokio::task::spawn_blocking(move || {
            Document::load_mem(&bytes).or_raise(|| ErrorKind::InvalidPdf(origin))
        })
        .await
        .or_raise(|| ErrorKind::Worker)??;
        documents.push(document);
    }
    let target = output.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut merged = merge_documents(documents)?;
        let mut buffer = Vec::new();
        merged.save_to(&mut buffer).or_raise(|| ErrorKind::Io(target))?;
        Ok::<_, crate::error::Error>(buffer)
    })
    .await
    .or_raise(|| ErrorKind::Worker)??;
    tokio::fs::write(&output, bytes).await.or_raise(|| ErrorKind::Io(output.clone()))?;
    Ok(())
}

pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    for mut document in documents {
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;
        for page_id in document.get_pages().into_values() {
            if let Ok(page) = document.get_dictionary(page_id) {
                pages.push((page_id, with_inherited_attributes(&document, page)));
            }
        }
        objects.extend(document.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Dictionary)> = None;
    let mut tree: Option<(ObjectId, Dictionary)> = None;
    for (id, object) in objects {
        match type_of(&object) {
            Some(b"Catalog") => {
                if catalog.is_none()
                    && let Ok(dictionary) = object.as_dict()
                {
                    catalog = Some((id, dictionary.clone()));
                }
            },
            Some(b"Pages") => {
                if tree.is_none()
                    && let Ok(dictionary) = object.as_dict()
                {
                    tree = Some((id, dictionary.clone()));
                }
            },
            Some(b"Page" | b"Outlines" | b"Outline") => (),
            _ => {
                merged.objects.insert(id, object);
            },
        }
    }
    let (catalog_id, mut catalog) = catalog.ok_or_raise(|| ErrorKind::NothingToMerge)?;
    let (tree_id, mut tree) = tree.ok_or_raise(|| ErrorKind::NothingToMerge)?;

    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    for (id, mut page) in pages {
        page.set("Parent", tree_id);
        merged.objects.insert(id, Object::Dictionary(page));
    }
    tree.remove(b"Parent");
    tree.set("Count", Object::Integer(kids.len() as i64));
    tree.set("Kids", kids);
    merged.objects.insert(tree_id, Object::Dictionary(tree));

    catalog.set("Pages", tree_id);
    catalog.remove(b"Outlines");
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", catalog_id);

    merged.max_id = u32::try_from(merged.objects.len()).unwrap_or(u32::MAX);
    merged.renumber_objects();
    merged.compress();
    Ok(merged)
}

fn type_of(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Copies attributes a page inherits from intermediate page tree nodes onto
/// the page itself, since those nodes are not carried over.
fn with_inherited_attributes(document: &Document, page: &Dictionary) -> Dictionary {
    let mut page = page.clone();
    for key in INHERITABLE {
        if page.has(key) {
            continue;
        }
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        while let Some(id) = parent {
            let Ok(node) = document.get_dictionary(id) else { break };
            if let Ok(value) = node.get(key) {
                page.set(key, value.clone());
                break;
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }
    page
}
