//! Attribute dictionary interfaces and the standard dictionary.
//!
//! The codec consults a [`DataDictionary`] for two things: resolving the
//! canonical VR of a tag when the stream does not carry one (implicit
//! encoding), and verifying caller-supplied VRs on write. Tags that are not
//! found resolve to [`VR::UN`](crate::VR::UN) at the call sites.

pub mod tags;

use crate::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A dictionary entry: the canonical properties of one standard attribute.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DictionaryEntry {
    /// The attribute tag.
    pub tag: Tag,
    /// The canonical value representation.
    pub vr: VR,
    /// The attribute keyword, in PascalCase as given by the standard.
    pub alias: &'static str,
}

/// An attribute dictionary: a lookup from tag to canonical properties.
pub trait DataDictionary {
    /// Fetch the entry for the given tag, if it is known.
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry>;
}

static REGISTRY: Lazy<HashMap<Tag, &'static DictionaryEntry>> = Lazy::new(|| {
    let mut by_tag = HashMap::with_capacity(tags::ENTRIES.len());
    for entry in tags::ENTRIES {
        by_tag.insert(entry.tag, entry);
    }
    by_tag
});

/// A data dictionary which consults the library's
/// built-in attribute registry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardDataDictionary;

impl DataDictionary for StandardDataDictionary {
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry> {
        REGISTRY.get(&tag).copied()
    }
}

impl DataDictionary for &StandardDataDictionary {
    fn by_tag(&self, tag: Tag) -> Option<&DictionaryEntry> {
        (**self).by_tag(tag)
    }
}
