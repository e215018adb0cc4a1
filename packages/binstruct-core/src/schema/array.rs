//! Array field: a dynamically counted run of one element kind.

use encoding_rs::Encoding;

use crate::types::WireTag;

/// Composite descriptor repeating an element kind a run-time number of times.
///
/// The owning [`Field`](super::Field) supplies the element count and the
/// total byte length; each element then covers `length / count` bytes. The
/// array's wire tag and width alias the element's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayField {
    element: WireTag,
    /// Forwarded to every bytes-typed element
    encoding: Option<&'static Encoding>,
}

impl ArrayField {
    /// Creates an array of `element`.
    pub fn new(element: WireTag) -> Self {
        Self {
            element,
            encoding: None,
        }
    }

    /// Decodes bytes-typed elements as text in `encoding`.
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Returns the element kind.
    pub fn element(&self) -> WireTag {
        self.element
    }

    /// Returns the element encoding, if any.
    pub fn encoding(&self) -> Option<&'static Encoding> {
        self.encoding
    }

    /// Element width, treating variable-width elements as one byte.
    pub fn element_width(&self) -> usize {
        self.element.element_width()
    }

    pub(crate) fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

impl From<WireTag> for ArrayField {
    fn from(element: WireTag) -> Self {
        Self::new(element)
    }
}
