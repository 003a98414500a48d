use std::fmt;

/// Opaque key naming one product, read from one line of the input list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a raw input line. Surrounding whitespace (including a stray
    /// `\r`) is trimmed; blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw catalog response body for one product.
#[derive(Debug, Clone)]
pub struct MetadataDocument {
    pub product: Identifier,
    pub body: String,
}

impl MetadataDocument {
    pub fn new(product: Identifier, body: impl Into<String>) -> Self {
        Self {
            product,
            body: body.into(),
        }
    }
}

/// One image belonging to one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub product: Identifier,
    /// `{ordinal}-{name}`, ordinal zero-padded to two digits.
    pub name: String,
    pub url: String,
}

impl ImageDescriptor {
    pub fn new(product: Identifier, index: usize, source_name: &str, url: impl Into<String>) -> Self {
        Self {
            product,
            name: format!("{index:02}-{source_name}"),
            url: url.into(),
        }
    }
}
