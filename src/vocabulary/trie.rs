use std::collections::BTreeMap;

/// Index of a node inside the arena
type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, NodeId>,
    complete: bool,
}

/// Prefix tree over ingredient names, stored as an arena of nodes.
///
/// The index stores names exactly as given. Canonicalization happens at the
/// service boundary (see [`crate::vocabulary::Vocabulary`]).
///
/// Nodes are never removed, so a `NodeId` handed out during a traversal stays
/// valid for the lifetime of the index.
#[derive(Debug, Clone)]
pub struct VocabularyIndex {
    nodes: Vec<Node>,
    len: usize,
}

impl Default for VocabularyIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VocabularyIndex {
    /// Create an index holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }

    /// Register a name. Returns `true` if it was not registered before.
    ///
    /// The empty string marks the root as complete.
    pub fn insert(&mut self, name: &str) -> bool {
        let mut cur = ROOT;

        for c in name.chars() {
            cur = match self.nodes[cur].children.get(&c) {
                Some(&child) => child,
                None => {
                    // Nodes are only appended, so existing ids stay valid
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[cur].children.insert(c, child);
                    child
                }
            };
        }

        let node = &mut self.nodes[cur];
        if node.complete {
            false
        } else {
            node.complete = true;
            self.len += 1;
            true
        }
    }

    /// True iff `name` was registered
    pub fn contains_exact(&self, name: &str) -> bool {
        self.find(name)
            .map(|id| self.nodes[id].complete)
            .unwrap_or(false)
    }

    /// True iff `name` is a prefix of at least one registered name
    pub fn contains_prefix(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Registered names starting with `prefix`, in character order, at most `limit` of them
    pub fn completions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }

        let Some(start) = self.find(prefix) else {
            return found;
        };

        // Depth-first walk; children are pushed in reverse so the smallest
        // character is visited first.
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((id, name)) = stack.pop() {
            let node = &self.nodes[id];
            if node.complete {
                found.push(name.clone());
                if found.len() == limit {
                    break;
                }
            }
            for (&c, &child) in node.children.iter().rev() {
                let mut next = name.clone();
                next.push(c);
                stack.push((child, next));
            }
        }

        found
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the arena, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, name: &str) -> Option<NodeId> {
        let mut cur = ROOT;
        for c in name.chars() {
            cur = *self.nodes[cur].children.get(&c)?;
        }
        Some(cur)
    }
}
