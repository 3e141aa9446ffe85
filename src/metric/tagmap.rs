//! tagmap is the collection of dimensional (name, value) pairs carried by a
//! `metric::MetricRecord`. Think of it as a specialized hashmap. The purpose
//! of record associated metadata is to distinguish identically named records
//! that come from different hosts, racks or clusters.

use std::slice::Iter;

/// The tagmap name, value collection. Behaves similarly to
/// `std::collections::BTreeMap` but with a specialized implementation for
/// fast iteration over a small collection. Iteration happens in name order,
/// which is the order tags are rendered onto the wire.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TagMap {
    inner: Vec<(String, String)>,
}

impl TagMap {
    /// Create a `tagmap::Iter` over (name, value) pairs, in name order.
    pub fn iter(&self) -> Iter<(String, String)> {
        self.inner.iter()
    }

    /// Get a value from the tagmap, if it exists.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.inner
            .binary_search_by(|probe| probe.0.as_str().cmp(name))
        {
            Ok(idx) => Some(&self.inner[idx].1),
            Err(_) => None,
        }
    }

    /// Insert a name / value into self
    ///
    /// This method will return the value previously stored under the given
    /// name, if there was such a value.
    pub fn insert(&mut self, name: String, val: String) -> Option<String> {
        match self.inner.binary_search_by(|probe| probe.0.cmp(&name)) {
            Ok(idx) => {
                self.inner.push((name, val));
                let old = self.inner.swap_remove(idx);
                Some(old.1)
            }
            Err(idx) => {
                self.inner.insert(idx, (name, val));
                None
            }
        }
    }

    /// Determine if the tagmap is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return the total number of name / value pairs stored in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
