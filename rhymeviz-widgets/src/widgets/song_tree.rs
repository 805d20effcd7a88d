//! Song release-date tree widget
//!
//! Fetches the nested release-date tree for one song and renders it as a
//! dendrogram, radial (the default presentation) or horizontal cluster.
//! Leaf/internal distinction drives text anchors and rotation; every node
//! except the root is a click-through anchor to its `link`.

use crate::hierarchy::flatten;
use crate::layout::dendrogram::{cluster, radial, PlacedNode};
use crate::layout::Viewport;
use crate::render::svg::{element, escape, SvgDoc};
use rhymeviz_common::api::types::HierarchyNode;
use rhymeviz_common::api::DataClient;
use rhymeviz_common::Result;

const NODE_RADIUS: f64 = 4.5;
/// Radial diameter as a share of the viewport width
const RADIAL_DIAMETER_FACTOR: f64 = 0.9;
/// Vertical inset for the cluster variant
const CLUSTER_TOP_INSET: f64 = 50.0;

/// Presentation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeVariant {
    Radial,
    Cluster,
}

/// Which endpoint generation supplies the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSource {
    ReleaseDates,
    LegacySongTree,
}

/// The song tree widget for one song page
pub struct SongTreeWidget {
    slug: String,
    variant: TreeVariant,
    source: TreeSource,
    viewport: Viewport,
}

impl SongTreeWidget {
    pub fn radial(slug: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            slug: slug.into(),
            variant: TreeVariant::Radial,
            source: TreeSource::ReleaseDates,
            viewport,
        }
    }

    pub fn cluster(slug: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            slug: slug.into(),
            variant: TreeVariant::Cluster,
            source: TreeSource::ReleaseDates,
            viewport,
        }
    }

    /// Read from the legacy song-tree endpoint instead
    pub fn with_legacy_source(mut self) -> Self {
        self.source = TreeSource::LegacySongTree;
        self
    }

    /// Fetch once and build the render-ready view
    pub async fn hydrate(&self, client: &DataClient) -> Result<SongTreeView> {
        let tree = match self.source {
            TreeSource::ReleaseDates => client.fetch_release_date_tree(&self.slug).await?,
            TreeSource::LegacySongTree => client.fetch_song_tree(&self.slug).await?,
        };
        let view = build(&tree, self.variant, self.viewport);
        tracing::info!(song = %self.slug, nodes = view.nodes.len(), "Song tree laid out");
        Ok(view)
    }
}

/// One placed dendrogram node
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    /// Angle in degrees (radial) or horizontal pixels (cluster)
    pub x: f64,
    /// Radius in pixels (radial) or vertical pixels (cluster)
    pub y: f64,
    pub is_root: bool,
    pub is_leaf: bool,
    /// Navigation target; `None` for the root
    pub link: Option<String>,
}

/// Render-ready dendrogram
#[derive(Debug, Clone)]
pub struct SongTreeView {
    pub variant: TreeVariant,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<TreeNode>,
    /// Parent→child index pairs
    pub links: Vec<(usize, usize)>,
}

/// Lay out a fetched tree per variant
pub fn build(root: &HierarchyNode, variant: TreeVariant, viewport: Viewport) -> SongTreeView {
    let flat = flatten(root);

    let (placed, width, height): (Vec<PlacedNode>, f64, f64) = match variant {
        TreeVariant::Radial => {
            let diameter = viewport.width * RADIAL_DIAMETER_FACTOR;
            (radial(&flat, diameter), diameter, diameter + CLUSTER_TOP_INSET)
        }
        TreeVariant::Cluster => (
            cluster(&flat, viewport.width, viewport.height),
            viewport.width,
            viewport.height,
        ),
    };

    let nodes = placed
        .iter()
        .map(|p| {
            let node = &flat.nodes[p.index];
            TreeNode {
                name: node.name.clone(),
                x: p.x,
                y: p.y,
                is_root: node.is_root(),
                is_leaf: node.is_leaf(),
                link: if node.is_root() {
                    None
                } else {
                    node.link.clone()
                },
            }
        })
        .collect();

    SongTreeView {
        variant,
        width,
        height,
        nodes,
        links: flat.links.iter().map(|l| (l.source, l.target)).collect(),
    }
}

impl SongTreeView {
    /// Render the complete SVG document
    pub fn to_svg(&self) -> String {
        let mut doc = SvgDoc::new(self.width, self.height);
        let mut body = String::new();

        for &(source, target) in &self.links {
            body.push_str(&self.link_path(&self.nodes[source], &self.nodes[target]));
        }
        for node in &self.nodes {
            body.push_str(&self.node_group(node));
        }

        let transform = match self.variant {
            TreeVariant::Radial => {
                format!("translate({},{})", self.width / 2.0, self.width / 2.0)
            }
            TreeVariant::Cluster => format!("translate(0,{CLUSTER_TOP_INSET})"),
        };
        doc.push(&element("g", &[("transform", transform)], Some(&body)));
        doc.into_string()
    }

    fn link_path(&self, source: &TreeNode, target: &TreeNode) -> String {
        let d = match self.variant {
            TreeVariant::Radial => {
                let mid = (source.y + target.y) / 2.0;
                let p0 = polar(source.x, source.y);
                let c0 = polar(source.x, mid);
                let c1 = polar(target.x, mid);
                let p1 = polar(target.x, target.y);
                format!(
                    "M{},{}C{},{} {},{} {},{}",
                    fmt(p0.0),
                    fmt(p0.1),
                    fmt(c0.0),
                    fmt(c0.1),
                    fmt(c1.0),
                    fmt(c1.1),
                    fmt(p1.0),
                    fmt(p1.1)
                )
            }
            TreeVariant::Cluster => {
                // Vertical positions compress by a third, as rendered.
                let (y0, y1) = (source.y / 3.0, target.y / 3.0);
                let mid = (y0 + y1) / 2.0;
                format!(
                    "M{},{}C{},{} {},{} {},{}",
                    fmt(source.x),
                    fmt(y0),
                    fmt(source.x),
                    fmt(mid),
                    fmt(target.x),
                    fmt(mid),
                    fmt(target.x),
                    fmt(y1)
                )
            }
        };
        element("path", &[("class", "treeLink".to_string()), ("d", d)], None)
    }

    fn node_group(&self, node: &TreeNode) -> String {
        let mut inner = element("circle", &[("r", NODE_RADIUS.to_string())], None);
        inner.push_str(&self.node_label(node));

        let transform = match self.variant {
            TreeVariant::Radial => {
                format!("rotate({})translate({})", fmt(node.x - 90.0), fmt(node.y))
            }
            TreeVariant::Cluster => {
                format!("translate({},{})", fmt(node.x), fmt(node.y / 3.0))
            }
        };

        let group = element(
            "g",
            &[
                (
                    "class",
                    if node.is_root { "treeRoot" } else { "treeNode" }.to_string(),
                ),
                ("transform", transform),
            ],
            Some(&inner),
        );

        match &node.link {
            Some(href) => element("a", &[("href", href.clone())], Some(&group)),
            None => group,
        }
    }

    fn node_label(&self, node: &TreeNode) -> String {
        let text = escape(&node.name);
        match self.variant {
            TreeVariant::Radial => {
                // Labels on the left half flip so they read upright.
                let (anchor, transform) = if node.x < 180.0 {
                    ("start", "translate(8)".to_string())
                } else {
                    ("end", "rotate(180)translate(-8)".to_string())
                };
                element(
                    "text",
                    &[
                        ("dy", ".31em".to_string()),
                        ("text-anchor", anchor.to_string()),
                        ("transform", transform),
                    ],
                    Some(&text),
                )
            }
            TreeVariant::Cluster => {
                let (dx, dy, rotate) = if node.is_root {
                    (node.name.chars().count() as f64 * 4.75, -10.0, 0)
                } else if node.is_leaf {
                    (8.0, 3.0, 90)
                } else {
                    (-8.0, 3.0, 90)
                };
                let anchor = if node.is_leaf { "start" } else { "end" };
                element(
                    "text",
                    &[
                        ("dx", fmt(dx)),
                        ("dy", fmt(dy)),
                        ("text-anchor", anchor.to_string()),
                        ("transform", format!("rotate({rotate})")),
                    ],
                    Some(&text),
                )
            }
        }
    }
}

fn polar(angle_deg: f64, radius: f64) -> (f64, f64) {
    let a = (angle_deg - 90.0).to_radians();
    (radius * a.cos(), radius * a.sin())
}

fn fmt(value: f64) -> String {
    let mut s = format!("{value:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> HierarchyNode {
        let mut root = HierarchyNode::named("Protect Ya Neck");
        for year in ["1993", "1994"] {
            let mut branch = HierarchyNode::named(year);
            for n in 0..2 {
                let mut leaf = HierarchyNode::named(format!("{year}-song-{n}"));
                leaf.link = Some(format!("/songs/{year}-song-{n}"));
                branch.children.push(leaf);
            }
            root.children.push(branch);
        }
        root
    }

    #[test]
    fn test_radial_dimensions_derive_from_viewport() {
        let view = build(
            &sample_tree(),
            TreeVariant::Radial,
            Viewport::new(1000.0, 700.0),
        );
        assert_eq!(view.width, 900.0);
        assert_eq!(view.height, 950.0);
    }

    #[test]
    fn test_root_never_navigates() {
        let view = build(
            &sample_tree(),
            TreeVariant::Radial,
            Viewport::new(1000.0, 700.0),
        );
        let root = view.nodes.iter().find(|n| n.is_root).unwrap();
        assert!(root.link.is_none());

        let svg = view.to_svg();
        // Four leaves carry links; branch years have none.
        assert_eq!(svg.matches("<a ").count(), 4);
        assert!(svg.contains("class=\"treeRoot\""));
    }

    #[test]
    fn test_radial_label_flip_by_angle() {
        let view = build(
            &sample_tree(),
            TreeVariant::Radial,
            Viewport::new(1000.0, 700.0),
        );
        let svg = view.to_svg();
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("rotate(180)translate(-8)"));
    }

    #[test]
    fn test_cluster_root_label_offsets() {
        let view = build(
            &sample_tree(),
            TreeVariant::Cluster,
            Viewport::new(800.0, 600.0),
        );
        let svg = view.to_svg();
        let expected_dx = "Protect Ya Neck".chars().count() as f64 * 4.75;
        assert!(svg.contains(&format!("dx=\"{}\"", fmt(expected_dx))));
        assert!(svg.contains("dy=\"-10\""));
        // Leaf labels rotate to vertical.
        assert!(svg.contains("transform=\"rotate(90)\""));
    }

    #[test]
    fn test_cluster_compresses_vertical_axis() {
        let view = build(
            &sample_tree(),
            TreeVariant::Cluster,
            Viewport::new(800.0, 600.0),
        );
        let svg = view.to_svg();
        // Leaves sit at depth 2 of 2 => y=600, rendered at 600/3=200.
        assert!(svg.contains("translate(700,200)") || svg.contains(",200)"));
        assert!(svg.contains("translate(0,50)"));
    }

    #[test]
    fn test_every_parent_edge_renders_a_path() {
        let view = build(
            &sample_tree(),
            TreeVariant::Cluster,
            Viewport::new(800.0, 600.0),
        );
        let svg = view.to_svg();
        assert_eq!(svg.matches("class=\"treeLink\"").count(), 6);
    }
}
