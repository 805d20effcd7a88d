//! Artist collaboration network widget
//!
//! Fetches the collaboration tree for one artist, flattens it, runs the
//! force layout, and renders an SVG document: one image-patterned circle
//! per collaborator, arc links, tooltips, and click-through anchors on
//! every node except the root (which is pinned at the canvas center).

use crate::hierarchy::{flatten, Flattened};
use crate::layout::force::{image_extent, scale_adjustment, ForceLayout};
use crate::layout::Viewport;
use crate::render::svg::{element, escape, SvgDoc};
use rhymeviz_common::api::types::HierarchyNode;
use rhymeviz_common::api::DataClient;
use rhymeviz_common::Result;
use std::collections::HashSet;

const ROOT_RADIUS: f64 = 50.0;
const ROOT_IMAGE_SIZE: f64 = 100.0;

/// 32-bit string hash keying pattern ids, stable across re-renders
///
/// Matches the host page's historical hash (wrapping `h*31`-style shift
/// over UTF-16 units), so pattern ids survive a rewrite of either side.
pub fn name_hash(name: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash
}

/// Pattern id for a node name; identical names share one pattern
pub fn pattern_id(name: &str) -> String {
    format!("pat{}", name_hash(name))
}

/// Circle radius for a node
fn node_radius(weight: u32, is_root: bool) -> f64 {
    if is_root {
        ROOT_RADIUS
    } else {
        (weight as f64).sqrt().sqrt() * 20.0
    }
}

/// One placed, render-ready graph node
#[derive(Debug, Clone)]
pub struct NetworkNode {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub image_size: f64,
    pub pattern_id: String,
    pub img: Option<String>,
    /// Navigation target; `None` for the root
    pub link: Option<String>,
    /// Tooltip subtext; `None` for the root
    pub subtext: Option<String>,
    pub is_root: bool,
}

/// Render-ready collaboration graph
#[derive(Debug, Clone)]
pub struct NetworkView {
    pub width: f64,
    pub height: f64,
    /// Every node except the root
    pub collaborator_count: usize,
    pub nodes: Vec<NetworkNode>,
    /// Parent→child index pairs
    pub links: Vec<(usize, usize)>,
}

/// The network widget for one artist page
pub struct NetworkWidget {
    slug: String,
    viewport: Viewport,
}

impl NetworkWidget {
    pub fn new(slug: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            slug: slug.into(),
            viewport,
        }
    }

    /// Fetch once and build the render-ready view
    pub async fn hydrate(&self, client: &DataClient) -> Result<NetworkView> {
        let tree = client.fetch_network(&self.slug).await?;
        let view = build(&tree, self.viewport);
        tracing::info!(
            artist = %self.slug,
            collaborators = view.collaborator_count,
            "Collaboration graph laid out"
        );
        Ok(view)
    }
}

/// Flatten, scale, and lay out a collaboration tree
pub fn build(root: &HierarchyNode, viewport: Viewport) -> NetworkView {
    let flat = flatten(root);
    let node_count = flat.len();

    let adjustment = scale_adjustment(node_count, viewport.height);
    let width = viewport.width;
    let height = viewport.height * adjustment;

    let bodies: Vec<(u32, bool)> = flat
        .nodes
        .iter()
        .map(|n| (n.weight(), n.is_root()))
        .collect();
    let link_pairs: Vec<(usize, usize)> = flat
        .links
        .iter()
        .map(|l| (l.source, l.target))
        .collect();

    let mut layout = ForceLayout::new(width, height, bodies, link_pairs.clone(), layout_seed(&flat));
    layout.run();

    let nodes = flat
        .nodes
        .iter()
        .zip(layout.bodies())
        .map(|(node, body)| {
            let is_root = node.is_root();
            let weight = node.weight();
            NetworkNode {
                name: node.name.clone(),
                x: body.x,
                y: body.y,
                radius: node_radius(weight, is_root),
                image_size: if is_root {
                    ROOT_IMAGE_SIZE
                } else {
                    image_extent(weight)
                },
                pattern_id: pattern_id(&node.name),
                img: node.img.clone(),
                link: if is_root { None } else { node.link.clone() },
                subtext: if is_root {
                    None
                } else if weight == 1 {
                    Some("(1 collaboration)".to_string())
                } else {
                    Some(format!("({weight} collaborations)"))
                },
                is_root,
            }
        })
        .collect();

    NetworkView {
        width,
        height,
        collaborator_count: node_count.saturating_sub(1),
        nodes,
        links: link_pairs,
    }
}

/// Stable layout seed for a node set
fn layout_seed(flat: &Flattened) -> u64 {
    flat.nodes.iter().fold(0u64, |acc, n| {
        acc.wrapping_mul(31).wrapping_add(name_hash(&n.name) as u32 as u64)
    })
}

impl NetworkView {
    /// Render the complete SVG document
    pub fn to_svg(&self) -> String {
        let mut doc = SvgDoc::new(self.width, self.height);

        // One pattern per unique id; re-renders cannot duplicate defs.
        let mut seen = HashSet::new();
        let mut defs = String::new();
        for node in &self.nodes {
            if !seen.insert(node.pattern_id.as_str()) {
                continue;
            }
            let image = node.img.as_ref().map(|href| {
                element(
                    "image",
                    &[
                        ("xlink:href", href.clone()),
                        ("width", fmt_num(node.image_size)),
                        ("height", fmt_num(node.image_size)),
                        ("x", "0".to_string()),
                        ("y", "0".to_string()),
                    ],
                    None,
                )
            });
            defs.push_str(&element(
                "pattern",
                &[
                    ("id", node.pattern_id.clone()),
                    ("width", "2".to_string()),
                    ("height", "2".to_string()),
                    ("x", "0".to_string()),
                    ("y", "0".to_string()),
                ],
                Some(image.as_deref().unwrap_or("")),
            ));
        }
        doc.push(&element("defs", &[], Some(&defs)));

        for &(source, target) in &self.links {
            doc.push(&self.link_path(&self.nodes[source], &self.nodes[target]));
        }

        for node in &self.nodes {
            doc.push(&self.node_group(node));
        }

        doc.into_string()
    }

    /// Links draw as circular arcs whose radius is the endpoint distance
    fn link_path(&self, source: &NetworkNode, target: &NetworkNode) -> String {
        let dx = target.x - source.x;
        let dy = target.y - source.y;
        let dr = (dx * dx + dy * dy).sqrt();
        let d = format!(
            "M{},{}A{},{} 0 0,1 {},{}",
            fmt_num(source.x),
            fmt_num(source.y),
            fmt_num(dr),
            fmt_num(dr),
            fmt_num(target.x),
            fmt_num(target.y)
        );
        element(
            "path",
            &[
                ("class", "link".to_string()),
                ("d", d),
                ("stroke", "#ccc".to_string()),
                ("fill", "transparent".to_string()),
            ],
            None,
        )
    }

    fn node_group(&self, node: &NetworkNode) -> String {
        let mut inner = element(
            "circle",
            &[
                ("r", fmt_num(node.radius)),
                ("fill", format!("url(#{})", node.pattern_id)),
                ("stroke", "black".to_string()),
                ("stroke-width", "1".to_string()),
            ],
            None,
        );

        let mut tooltip = escape(&node.name);
        if let Some(subtext) = &node.subtext {
            tooltip.push(' ');
            tooltip.push_str(&escape(subtext));
        }
        inner.push_str(&element("title", &[], Some(&tooltip)));

        let group = element(
            "g",
            &[
                (
                    "class",
                    if node.is_root { "root" } else { "node" }.to_string(),
                ),
                (
                    "transform",
                    format!("translate({},{})", fmt_num(node.x), fmt_num(node.y)),
                ),
            ],
            Some(&inner),
        );

        match &node.link {
            Some(href) => element("a", &[("href", href.clone())], Some(&group)),
            None => group,
        }
    }
}

fn fmt_num(value: f64) -> String {
    // Trim insignificant trailing zeros the way hand-written markup reads.
    let mut s = format!("{value:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
