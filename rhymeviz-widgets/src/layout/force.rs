//! Force-directed layout for the collaboration graph
//!
//! The physical parameters are fixed constants, not configuration: the
//! graph always renders with the same gravity, charge, friction, and link
//! distance rule. Initial placement is seeded so a given node set lays out
//! the same way on every hydration.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frame margin; node centers never get closer to the edge than this
pub const MAX_NODE_SIZE: f64 = 50.0;

const GRAVITY: f64 = 0.05;
const CHARGE: f64 = -1500.0;
const FRICTION: f64 = 0.5;
const LINK_STRENGTH: f64 = 1.0;

const ALPHA_INITIAL: f64 = 0.1;
const ALPHA_DECAY: f64 = 0.99;
const ALPHA_MIN: f64 = 0.005;

/// Resting length of a link as a function of its target's weight
pub fn link_distance(target_weight: u32) -> f64 {
    (target_weight as f64).sqrt() * 35.0 + 25.0
}

/// Canvas scale factor from viewport height and node count
///
/// Small graphs on tall viewports shrink the canvas; short viewports get a
/// per-node correction so dense graphs still fit.
pub fn scale_adjustment(node_count: usize, viewport_height: f64) -> f64 {
    let mut adjustment = ((node_count as f64).sqrt() * 2.5) / viewport_height.sqrt();
    if adjustment < 0.175 {
        adjustment = 0.175;
    }
    if viewport_height < 600.0 {
        adjustment += node_count as f64 * 0.01;
    }
    adjustment
}

/// One simulated body
#[derive(Debug, Clone)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    /// Weight feeding radius and link distance
    pub weight: u32,
    /// Fixed bodies (the root) never move
    pub fixed: bool,
}

/// Force simulation over a node set with parent→child links
pub struct ForceLayout {
    width: f64,
    height: f64,
    bodies: Vec<Body>,
    links: Vec<(usize, usize)>,
}

impl ForceLayout {
    /// Seeded construction; unfixed bodies start at random positions
    pub fn new(
        width: f64,
        height: f64,
        bodies: Vec<(u32, bool)>,
        links: Vec<(usize, usize)>,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bodies = bodies
            .into_iter()
            .map(|(weight, fixed)| Body {
                x: if fixed {
                    width / 2.0
                } else {
                    rng.gen_range(0.0..width.max(1.0))
                },
                y: if fixed {
                    height / 2.0
                } else {
                    rng.gen_range(0.0..height.max(1.0))
                },
                weight,
                fixed,
            })
            .collect();

        Self {
            width,
            height,
            bodies,
            links,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Run the simulation to rest and clamp every body into the frame
    pub fn run(&mut self) {
        let mut alpha = ALPHA_INITIAL;
        while alpha > ALPHA_MIN {
            self.tick(alpha);
            alpha *= ALPHA_DECAY;
        }
        for index in 0..self.bodies.len() {
            self.clamp_to_frame(index);
        }
    }

    fn tick(&mut self, alpha: f64) {
        let count = self.bodies.len();
        let mut forces = vec![(0.0_f64, 0.0_f64); count];

        // Pairwise charge repulsion
        for i in 0..count {
            for j in (i + 1)..count {
                let dx = self.bodies[j].x - self.bodies[i].x;
                let dy = self.bodies[j].y - self.bodies[i].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                let magnitude = -CHARGE * alpha / dist;
                let fx = dx / dist * magnitude;
                let fy = dy / dist * magnitude;
                forces[i].0 -= fx;
                forces[i].1 -= fy;
                forces[j].0 += fx;
                forces[j].1 += fy;
            }
        }

        // Link springs pull endpoints toward the resting distance
        for &(source, target) in &self.links {
            let rest = link_distance(self.bodies[target].weight);
            let dx = self.bodies[target].x - self.bodies[source].x;
            let dy = self.bodies[target].y - self.bodies[source].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);
            let magnitude = (dist - rest) * LINK_STRENGTH * alpha / 2.0;
            let fx = dx / dist * magnitude;
            let fy = dy / dist * magnitude;
            forces[source].0 += fx;
            forces[source].1 += fy;
            forces[target].0 -= fx;
            forces[target].1 -= fy;
        }

        // Gravity toward the canvas center
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        for (index, force) in forces.iter_mut().enumerate() {
            force.0 += (cx - self.bodies[index].x) * GRAVITY * alpha;
            force.1 += (cy - self.bodies[index].y) * GRAVITY * alpha;
        }

        for (index, (fx, fy)) in forces.into_iter().enumerate() {
            if self.bodies[index].fixed {
                continue;
            }
            self.bodies[index].x += fx * FRICTION;
            self.bodies[index].y += fy * FRICTION;
        }
    }

    /// Keep a body's center inside the frame, leaving room for its image
    fn clamp_to_frame(&mut self, index: usize) {
        let pad = image_extent(self.bodies[index].weight);
        let body = &mut self.bodies[index];
        body.x = body.x.min(self.width - pad).max(MAX_NODE_SIZE);
        body.y = body.y.min(self.height - pad).max(MAX_NODE_SIZE);
    }
}

/// Pattern image extent for a node weight (also the clamp margin)
pub fn image_extent(weight: u32) -> f64 {
    (weight as f64).sqrt().sqrt() * 40.0
}
