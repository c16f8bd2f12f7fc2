//! An in-memory DICOM data set: an ordered list of data elements.

use crate::header::{DataElement, Tag};

/// An ordered collection of data elements.
///
/// Element order is significant on write: file meta elements must precede
/// the body, and elements are expected in ascending tag order within each
/// level. The parser produces elements in stream order, which the format
/// guarantees to be ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// The elements, in stream order.
    pub elements: Vec<DataElement>,
}

impl Dataset {
    /// Create an empty data set.
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Create a data set from a list of elements, keeping their order.
    pub fn from_elements(elements: Vec<DataElement>) -> Self {
        Dataset { elements }
    }

    /// Find the first element with the given tag.
    pub fn find(&self, tag: Tag) -> Option<&DataElement> {
        self.elements.iter().find(|e| e.tag() == tag)
    }

    /// Whether the data set contains an element with the given tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.find(tag).is_some()
    }

    /// Append an element to the data set.
    pub fn push(&mut self, element: DataElement) {
        self.elements.push(element);
    }

    /// The number of elements at the top level.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate over the elements in stream order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataElement> {
        self.elements.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = DataElement;
    type IntoIter = std::vec::IntoIter<DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataElement;
    type IntoIter = std::slice::Iter<'a, DataElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::tags;
    use crate::value::Value;

    #[test]
    fn find_by_tag() {
        let mut ds = Dataset::new();
        ds.push(DataElement::new_inferred(
            tags::PATIENT_NAME,
            Value::strings(["Bob", "Jones"]),
        ));
        ds.push(DataElement::new_inferred(tags::ROWS, Value::ints([128])));

        let rows = ds.find(tags::ROWS).unwrap();
        assert_eq!(rows.value().ints_ref().unwrap(), &[128]);
        assert!(ds.find(tags::COLUMNS).is_none());
        assert!(ds.contains(tags::PATIENT_NAME));
        assert_eq!(ds.len(), 2);
    }
}
