//! Flattening of nested hierarchy payloads
//!
//! Both the collaboration graph and the dendrograms start from the same
//! nested tree shape. Flattening walks the tree post-order (children before
//! their parent, the root last), assigns a sequential integer id to every
//! node that arrived without one, and derives the parent→child link list.
//!
//! Invariants:
//! - every node ends up with exactly one id; payload-supplied ids are kept
//! - every node except the root has exactly one parent edge

use rhymeviz_common::api::types::HierarchyNode;

/// One flattened node, indexable by position in [`Flattened::nodes`]
#[derive(Debug, Clone)]
pub struct FlatNode {
    pub name: String,
    pub size: Option<u32>,
    pub img: Option<String>,
    pub link: Option<String>,
    /// Payload id when present, otherwise assigned during flattening
    pub id: u32,
    pub depth: usize,
    /// Index of the parent node; `None` only for the root
    pub parent: Option<usize>,
    /// Indices of children, in payload order
    pub children: Vec<usize>,
}

impl FlatNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Collaboration/occurrence count, defaulting to 1 when absent
    pub fn weight(&self) -> u32 {
        self.size.unwrap_or(1)
    }
}

/// Parent→child edge between node indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// Flattened hierarchy: node list, link list, root index
#[derive(Debug, Clone)]
pub struct Flattened {
    pub nodes: Vec<FlatNode>,
    pub links: Vec<Link>,
    /// Index of the root node (last in post-order)
    pub root: usize,
}

impl Flattened {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Leaf indices in depth-first traversal order from the root
    pub fn leaves_in_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, index: usize, out: &mut Vec<usize>) {
        let node = &self.nodes[index];
        if node.is_leaf() {
            out.push(index);
        } else {
            for &child in &node.children {
                self.collect_leaves(child, out);
            }
        }
    }
}

/// Flatten a nested tree into a node list with stable ids and parent links
pub fn flatten(root: &HierarchyNode) -> Flattened {
    let mut nodes = Vec::new();
    let mut next_id = 0;
    let root_index = recurse(root, 0, &mut nodes, &mut next_id);

    let links = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            node.parent.map(|parent| Link {
                source: parent,
                target: index,
            })
        })
        .collect();

    Flattened {
        nodes,
        links,
        root: root_index,
    }
}

fn recurse(
    node: &HierarchyNode,
    depth: usize,
    nodes: &mut Vec<FlatNode>,
    next_id: &mut u32,
) -> usize {
    let child_indices: Vec<usize> = node
        .children
        .iter()
        .map(|child| recurse(child, depth + 1, nodes, next_id))
        .collect();

    let id = node.id.unwrap_or_else(|| {
        *next_id += 1;
        *next_id
    });

    nodes.push(FlatNode {
        name: node.name.clone(),
        size: node.size,
        img: node.img.clone(),
        link: node.link.clone(),
        id,
        depth,
        parent: None,
        children: child_indices.clone(),
    });
    let index = nodes.len() - 1;

    for child in child_indices {
        nodes[child].parent = Some(index);
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhymeviz_common::api::types::HierarchyNode;

    fn sample_tree() -> HierarchyNode {
        let mut root = HierarchyNode::named("Big L");
        let mut a = HierarchyNode::named("Lord Finesse");
        a.size = Some(4);
        let mut b = HierarchyNode::named("Kid Capri");
        b.size = Some(1);
        let mut c = HierarchyNode::named("Showbiz");
        c.size = Some(2);
        a.children.push(c);
        root.children.push(a);
        root.children.push(b);
        root
    }

    #[test]
    fn test_every_node_gets_exactly_one_id() {
        let flat = flatten(&sample_tree());
        assert_eq!(flat.len(), 4);

        let mut ids: Vec<u32> = flat.nodes.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4, "ids must be unique");
    }

    #[test]
    fn test_payload_ids_are_kept() {
        let mut root = sample_tree();
        root.children[1].id = Some(99);
        let flat = flatten(&root);
        assert!(flat.nodes.iter().any(|n| n.id == 99));
    }

    #[test]
    fn test_every_non_root_has_one_parent_edge() {
        let flat = flatten(&sample_tree());
        for (index, _) in flat.nodes.iter().enumerate() {
            let edges = flat.links.iter().filter(|l| l.target == index).count();
            if index == flat.root {
                assert_eq!(edges, 0, "root must have no parent edge");
            } else {
                assert_eq!(edges, 1, "non-root node must have exactly one parent edge");
            }
        }
    }

    #[test]
    fn test_root_is_last_in_post_order() {
        let flat = flatten(&sample_tree());
        assert_eq!(flat.root, flat.len() - 1);
        assert_eq!(flat.nodes[flat.root].name, "Big L");
        assert!(flat.nodes[flat.root].is_root());
    }

    #[test]
    fn test_depths_and_leaf_order() {
        let flat = flatten(&sample_tree());
        assert_eq!(flat.max_depth(), 2);

        let leaves = flat.leaves_in_order();
        let names: Vec<&str> = leaves.iter().map(|&i| flat.nodes[i].name.as_str()).collect();
        assert_eq!(names, vec!["Showbiz", "Kid Capri"]);
    }

    #[test]
    fn test_single_node_tree() {
        let flat = flatten(&HierarchyNode::named("solo"));
        assert_eq!(flat.len(), 1);
        assert!(flat.links.is_empty());
        assert_eq!(flat.leaves_in_order(), vec![0]);
    }
}
