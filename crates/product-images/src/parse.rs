use crate::error::ImportError;
use crate::product::{ImageDescriptor, MetadataDocument};

/// Extract the image descriptors from a catalog document.
///
/// Each element child of the root, in document order, becomes one
/// descriptor built from its `name` and `url` attributes. A blank body or a
/// root without element children yields no descriptors.
pub fn parse_document(doc: &MetadataDocument) -> Result<Vec<ImageDescriptor>, ImportError> {
    if doc.body.trim().is_empty() {
        tracing::debug!(product = %doc.product, "catalog returned an empty body");
        return Ok(Vec::new());
    }

    let xml = roxmltree::Document::parse(&doc.body).map_err(|e| ImportError::Parse {
        product: doc.product.clone(),
        message: e.to_string(),
    })?;

    xml.root_element()
        .children()
        .filter(|node| node.is_element())
        .enumerate()
        .map(|(index, element)| {
            let required = |attribute: &'static str| {
                element
                    .attribute(attribute)
                    .ok_or_else(|| ImportError::DataShape {
                        product: doc.product.clone(),
                        index,
                        attribute,
                    })
            };

            let name = required("name")?;
            let url = required("url")?;
            Ok(ImageDescriptor::new(doc.product.clone(), index, name, url))
        })
        .collect()
}
