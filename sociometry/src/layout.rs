//! Positioning of the sociogram.
//!
//! The layout is the Fruchterman-Reingold spring model: every pair of students repels, every
//! nomination pulls the two students together. Initial positions come from a seeded generator, so a
//! given input and [`LayoutConfig`] always produce the same drawing.

use log::{debug, warn};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use crate::config::*;

// Stop early when the mean displacement of a step falls below this.
const CONVERGENCE_THRESHOLD: f64 = 1e-4;
const MIN_DISTANCE: f64 = 0.01;

/// Builds the positioned sociogram.
///
/// The roster is expected in ranked order (as returned by [`crate::aggregate`]): the label of the
/// node at index `i` is `"{i + 1}. {name}"`. Every roster entry becomes a node, including students
/// who neither gave nor received a nomination. Edges naming someone outside the roster are dropped.
pub fn build(
    edges: &[NominationEdge],
    roster: &[RosterEntry],
    config: &LayoutConfig,
) -> PositionedGraph {
    let graph = nomination_graph(edges, roster);
    debug!(
        "build: {} nodes, {} edges, config: {:?}",
        graph.node_count(),
        graph.edge_count(),
        config
    );
    let positions = spring_layout(&graph, config);

    let nodes: Vec<GraphNode> = roster
        .iter()
        .enumerate()
        .map(|(idx, entry)| GraphNode {
            name: entry.name.clone(),
            position: positions[idx],
            color: entry.category.color(),
            label: format!("{}. {}", idx + 1, entry.name),
            category: entry.category,
        })
        .collect();

    let directed_edges: Vec<(String, String)> = graph
        .edge_references()
        .map(|e| {
            (
                roster[graph[e.source()]].name.clone(),
                roster[graph[e.target()]].name.clone(),
            )
        })
        .collect();

    PositionedGraph {
        nodes,
        directed_edges,
    }
}

// Node weights are indexes into the roster. Node i of the graph is roster entry i.
fn nomination_graph(edges: &[NominationEdge], roster: &[RosterEntry]) -> DiGraph<usize, ()> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(roster.len(), edges.len());
    let mut by_name: HashMap<&str, NodeIndex> = HashMap::new();
    for (idx, entry) in roster.iter().enumerate() {
        let node = graph.add_node(idx);
        by_name.entry(entry.name.as_str()).or_insert(node);
    }
    for edge in edges.iter() {
        match (by_name.get(edge.from.as_str()), by_name.get(edge.to.as_str())) {
            (Some(from), Some(to)) => {
                graph.add_edge(*from, *to, ());
            }
            _ => {
                warn!(
                    "nomination_graph: edge {:?} -> {:?} is not between two roster entries, dropping",
                    edge.from, edge.to
                );
            }
        }
    }
    graph
}

/// Positions indexed by node index, rescaled so that both axes fit in [-1, 1].
fn spring_layout(graph: &DiGraph<usize, ()>, config: &LayoutConfig) -> Vec<Position> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![Position { x: 0.0, y: 0.0 }],
        _ => {}
    }

    // Attraction ignores the direction: a nomination pulls both students.
    let mut attraction = vec![vec![0.0_f64; n]; n];
    for e in graph.edge_references() {
        let (s, t) = (e.source().index(), e.target().index());
        attraction[s][t] += 1.0;
        attraction[t][s] += 1.0;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n)
        .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
        .collect();

    // Optimal distance between nodes.
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1 * span(&pos);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for iteration in 0..config.iterations {
        let mut displacement = vec![[0.0_f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (distance * distance) - attraction[i][j] * distance / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        let mut moved = 0.0;
        for (p, d) in pos.iter_mut().zip(displacement.iter()) {
            let length = (d[0] * d[0] + d[1] * d[1]).sqrt();
            let length = if length < MIN_DISTANCE { 0.1 } else { length };
            let step = [d[0] * temperature / length, d[1] * temperature / length];
            p[0] += step[0];
            p[1] += step[1];
            moved += step[0] * step[0] + step[1] * step[1];
        }
        temperature -= cooling;

        if moved.sqrt() / (n as f64) < CONVERGENCE_THRESHOLD {
            debug!("spring_layout: converged after {} iterations", iteration + 1);
            break;
        }
    }

    rescale(&pos)
}

fn span(pos: &[[f64; 2]]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in pos.iter() {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    (max_x - min_x).max(max_y - min_y)
}

// Centers on the mean and scales the largest coordinate to 1.
fn rescale(pos: &[[f64; 2]]) -> Vec<Position> {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    let centered: Vec<[f64; 2]> = pos.iter().map(|p| [p[0] - mean_x, p[1] - mean_y]).collect();
    let extent = centered
        .iter()
        .map(|p| p[0].abs().max(p[1].abs()))
        .fold(0.0_f64, f64::max);
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    centered
        .iter()
        .map(|p| Position {
            x: p[0] * scale,
            y: p[1] * scale,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn sample() -> Aggregation {
        let mut builder = Builder::new();
        builder.add_response_simple("Alice", &["Bob", "Carol"]).unwrap();
        builder.add_response_simple("Bob", &["Carol"]).unwrap();
        builder.add_response_simple("Carol", &["Alice"]).unwrap();
        builder.add_response_simple("Dewi", &["Carol"]).unwrap();
        builder.add_response_simple("Eko", &[]).unwrap();
        builder.aggregate()
    }

    #[test]
    fn same_input_same_positions() {
        let agg = sample();
        let first = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        let second = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        assert_eq!(first, second);
        for (a, b) in first.nodes.iter().zip(second.nodes.iter()) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
        }
    }

    #[test]
    fn seed_changes_positions() {
        let agg = sample();
        let first = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        let other = LayoutConfig {
            seed: 7,
            ..LayoutConfig::DEFAULT_LAYOUT
        };
        let second = build(&agg.edges, &agg.roster, &other);
        let positions = |g: &PositionedGraph| -> Vec<(f64, f64)> {
            g.nodes.iter().map(|n| (n.position.x, n.position.y)).collect()
        };
        assert_ne!(positions(&first), positions(&second));
    }

    #[test]
    fn every_student_is_a_node() {
        let agg = sample();
        let graph = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        assert_eq!(graph.nodes.len(), 5);
        let eko = graph.node("Eko").unwrap();
        assert_eq!(eko.category, Category::Isolated);
        assert!(eko.position.x.is_finite() && eko.position.y.is_finite());
        assert_eq!(eko.label, "5. Eko");
    }

    #[test]
    fn labels_and_colors_follow_the_roster() {
        let agg = sample();
        let graph = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        // Carol: 3 nominations.
        let carol = &graph.nodes[0];
        assert_eq!(carol.label, "1. Carol");
        assert_eq!(carol.color, Category::AdequatelySocial.color());
        for (idx, (node, entry)) in graph.nodes.iter().zip(agg.roster.iter()).enumerate() {
            assert_eq!(node.label, format!("{}. {}", idx + 1, entry.name));
            assert_eq!(node.color, entry.category.color());
        }
    }

    #[test]
    fn edges_are_kept_in_order() {
        let agg = sample();
        let graph = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        let expected: Vec<(String, String)> = agg
            .edges
            .iter()
            .map(|e| (e.from.clone(), e.to.clone()))
            .collect();
        assert_eq!(graph.directed_edges, expected);
    }

    #[test]
    fn positions_fit_the_unit_square() {
        let agg = sample();
        let graph = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        let mut extent: f64 = 0.0;
        for node in graph.nodes.iter() {
            assert!(node.position.x.abs() <= 1.0 + 1e-9);
            assert!(node.position.y.abs() <= 1.0 + 1e-9);
            extent = extent.max(node.position.x.abs()).max(node.position.y.abs());
        }
        assert!((extent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_edges_are_dropped() {
        let agg = sample();
        let mut edges = agg.edges.clone();
        edges.push(NominationEdge::new("Alice", "Zorro"));
        let graph = build(&edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        assert_eq!(graph.directed_edges.len(), agg.edges.len());
    }

    #[test]
    fn small_graphs() {
        let empty = build(&[], &[], &LayoutConfig::DEFAULT_LAYOUT);
        assert!(empty.nodes.is_empty());

        let mut builder = Builder::new();
        builder.add_response_simple("Alice", &[]).unwrap();
        let agg = builder.aggregate();
        let single = build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT);
        assert_eq!(single.nodes[0].position, Position { x: 0.0, y: 0.0 });
    }
}
