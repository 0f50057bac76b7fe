//! Flattened sample trees.
//!
//! Profiles can be very deep, so the nested JSON tree is flattened into an
//! arena once at load time and every later traversal walks indices.

use super::schema::{NodeMeta, ProfileData, SampleNode};
use crate::utils::config::ALL_THREADS_KEY;
use crate::utils::error::ProfileError;
use log::debug;
use std::collections::BTreeMap;

/// Index of a node within its [`SampleTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct FlatNode {
    pub meta: NodeMeta,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

/// One thread's call tree in pre-order; the root is `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct SampleTree {
    nodes: Vec<FlatNode>,
}

impl SampleTree {
    pub fn from_root(root: SampleNode) -> Self {
        let mut nodes: Vec<FlatNode> = Vec::new();
        let mut stack = vec![(root, None::<NodeId>, 0usize)];

        while let Some((SampleNode { meta, children }, parent, depth)) = stack.pop() {
            let id = NodeId(nodes.len());
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }
            nodes.push(FlatNode {
                meta,
                parent,
                children: Vec::with_capacity(children.len()),
                depth,
            });
            // reversed so siblings come off the stack in order
            for child in children.into_iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&FlatNode> {
        self.nodes.get(id.0)
    }

    pub fn meta(&self, id: NodeId) -> Option<&NodeMeta> {
        self.get(id).map(|n| &n.meta)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Follow child indices from the root, e.g. `[0, 2]` is the third child
    /// of the root's first child.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        path.iter().try_fold(self.root(), |id, &i| self.children(id).get(i).copied())
    }
}

/// Sample trees of every profiled thread
#[derive(Debug, Clone)]
pub struct ThreadProfiles {
    threads: BTreeMap<String, SampleTree>,
}

impl ThreadProfiles {
    pub fn from_data(data: ProfileData) -> Result<Self, ProfileError> {
        if data.is_empty() {
            return Err(ProfileError::EmptyProfile);
        }

        let threads: BTreeMap<String, SampleTree> = data
            .into_iter()
            .map(|(name, root)| (name, SampleTree::from_root(root)))
            .collect();

        debug!(
            "Loaded {} threads, {} nodes total",
            threads.len(),
            threads.values().map(SampleTree::len).sum::<usize>()
        );

        Ok(Self { threads })
    }

    pub fn thread_names(&self) -> impl Iterator<Item = &str> {
        self.threads.keys().map(String::as_str)
    }

    /// `"all"` when present, otherwise the first thread by name
    pub fn default_thread(&self) -> &str {
        if self.threads.contains_key(ALL_THREADS_KEY) {
            return ALL_THREADS_KEY;
        }
        self.thread_names().next().unwrap_or_default()
    }

    pub fn tree(&self, thread: &str) -> Option<&SampleTree> {
        self.threads.get(thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(func: &str, count: u64, children: Vec<SampleNode>) -> SampleNode {
        SampleNode {
            meta: NodeMeta {
                func: func.to_string(),
                file: "x.jl".to_string(),
                line: 1,
                count,
                flags: 0,
            },
            children,
        }
    }

    #[test]
    fn test_flatten_preorder() {
        let root = node(
            "root",
            10,
            vec![node("a", 6, vec![node("a1", 6, vec![])]), node("b", 4, vec![])],
        );
        let tree = SampleTree::from_root(root);

        assert_eq!(tree.len(), 4);
        let funcs: Vec<&str> = (0..4)
            .map(|i| tree.meta(NodeId(i)).unwrap().func.as_str())
            .collect();
        assert_eq!(funcs, vec!["root", "a", "a1", "b"]);
        assert_eq!(tree.children(tree.root()), &[NodeId(1), NodeId(3)]);
        assert_eq!(tree.get(NodeId(2)).unwrap().parent, Some(NodeId(1)));
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.node_at_path(&[0, 0]), Some(NodeId(2)));
        assert_eq!(tree.node_at_path(&[1]), Some(NodeId(3)));
        assert_eq!(tree.node_at_path(&[5]), None);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut deep = node("leaf", 1, vec![]);
        for _ in 0..50_000 {
            deep = node("frame", 1, vec![deep]);
        }
        let tree = SampleTree::from_root(deep);
        assert_eq!(tree.max_depth(), 50_000);
    }

    #[test]
    fn test_default_thread() {
        let mut data = ProfileData::new();
        data.insert("thread 2".to_string(), node("t2", 1, vec![]));
        data.insert("thread 1".to_string(), node("t1", 1, vec![]));
        let profiles = ThreadProfiles::from_data(data.clone()).unwrap();
        assert_eq!(profiles.default_thread(), "thread 1");

        data.insert("all".to_string(), node("all", 2, vec![]));
        let profiles = ThreadProfiles::from_data(data).unwrap();
        assert_eq!(profiles.default_thread(), "all");
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        assert!(matches!(
            ThreadProfiles::from_data(ProfileData::new()),
            Err(ProfileError::EmptyProfile)
        ));
    }
}
