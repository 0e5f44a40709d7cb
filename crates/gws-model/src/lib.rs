//! Retained-id sets and the element-to-node derived-set calculator.

use std::collections::BTreeSet;

/// An immutable set of node or element ids that must survive filtering.
///
/// One retained set is built per extraction run and shared by reference
/// across every rewriter in that run. Iteration order is ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedSet {
    ids: BTreeSet<i64>,
}

impl RetainedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// An empty retained set is legal; it yields zero-count sections.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<i64> for RetainedSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// One mesh element: id plus its ordered corner node ids.
///
/// Triangular elements in a quadrilateral-oriented table are padded with the
/// literal node id `0`, which is never a real node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: i64,
    pub nodes: Vec<i64>,
}

/// Element-to-node adjacency for the whole model mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementAdjacency {
    pub elements: Vec<Element>,
}

impl ElementAdjacency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: i64, nodes: Vec<i64>) {
        self.elements.push(Element { id, nodes });
    }
}

/// Compute the node set implied by a retained element set.
///
/// Unions the corner node ids of every retained element, drops the sentinel
/// `0` padding, and returns the result as an ascending, de-duplicated set.
pub fn derive_nodes(adjacency: &ElementAdjacency, retained_elements: &RetainedSet) -> RetainedSet {
    let mut ids = BTreeSet::new();
    for element in &adjacency.elements {
        if !retained_elements.contains(element.id) {
            continue;
        }
        for &node in &element.nodes {
            if node != 0 {
                ids.insert(node);
            }
        }
    }
    RetainedSet { ids }
}
