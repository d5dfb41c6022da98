//! Hierarchical Navigable Small World graph over correlation vectors.
//!
//! Insert-only ANN index. `m` bounds graph connections per node and
//! `ef_construction` sizes the candidate list during build; both trade
//! build cost against recall and never affect codec correctness.
//! Similarity is cosine, queries return doc IDs by decreasing similarity.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use correlate_core::errors::CodecError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// A candidate node with its similarity to the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    score: f64,
    node: usize,
}

impl Eq for Scored {}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Node {
    doc_id: String,
    vector: Vec<f32>,
    /// Adjacency per layer; index 0 is the base layer.
    neighbors: Vec<Vec<usize>>,
}

/// An HNSW index over vectors of one fixed dimension.
pub struct HnswIndex {
    dimension: usize,
    m: usize,
    /// Base layer allows twice the connections of upper layers.
    m_max0: usize,
    ef_construction: usize,
    /// Level sampling multiplier, 1/ln(m).
    level_mult: f64,
    entry_point: Option<usize>,
    max_level: usize,
    nodes: Vec<Node>,
    rng: StdRng,
}

impl HnswIndex {
    pub fn new(dimension: usize, m: usize, ef_construction: usize) -> Self {
        let m = m.max(2);
        Self {
            dimension,
            m,
            m_max0: m * 2,
            ef_construction: ef_construction.max(m),
            level_mult: 1.0 / (m as f64).ln(),
            entry_point: None,
            max_level: 0,
            nodes: Vec::new(),
            // Seeded for reproducible graph shapes across runs.
            rng: StdRng::seed_from_u64(0x5eed),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a vector under a document ID.
    pub fn insert(&mut self, doc_id: impl Into<String>, vector: Vec<f32>) -> Result<(), CodecError> {
        if vector.len() != self.dimension {
            return Err(CodecError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let level = self.sample_level();
        let new_idx = self.nodes.len();
        self.nodes.push(Node {
            doc_id: doc_id.into(),
            vector,
            neighbors: vec![Vec::new(); level + 1],
        });

        let Some(entry) = self.entry_point else {
            self.entry_point = Some(new_idx);
            self.max_level = level;
            return Ok(());
        };

        // Greedy descent through layers above the new node's level.
        let mut ep = entry;
        for layer in ((level + 1)..=self.max_level).rev() {
            ep = self.closest_on_layer(new_idx, ep, layer);
        }

        // Connect on every layer the new node participates in.
        let mut entry_points = vec![ep];
        for layer in (0..=level.min(self.max_level)).rev() {
            let candidates =
                self.search_layer(&self.nodes[new_idx].vector, &entry_points, self.ef_construction, layer);

            let max_conn = if layer == 0 { self.m_max0 } else { self.m };
            let selected: Vec<usize> = candidates.iter().take(self.m).map(|c| c.node).collect();

            for &neighbor in &selected {
                self.nodes[new_idx].neighbors[layer].push(neighbor);
                self.nodes[neighbor].neighbors[layer].push(new_idx);
                if self.nodes[neighbor].neighbors[layer].len() > max_conn {
                    self.prune(neighbor, layer, max_conn);
                }
            }

            entry_points = candidates.iter().map(|c| c.node).collect();
            if entry_points.is_empty() {
                entry_points = vec![ep];
            }
        }

        if level > self.max_level {
            self.max_level = level;
            self.entry_point = Some(new_idx);
            debug!(level, nodes = self.nodes.len(), "new hnsw entry point");
        }

        Ok(())
    }

    /// Approximate k-nearest-neighbor query. Returns `(doc_id, cosine
    /// similarity)` pairs ordered by decreasing similarity.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(String, f64)>, CodecError> {
        if query.len() != self.dimension {
            return Err(CodecError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        let Some(entry) = self.entry_point else {
            return Ok(Vec::new());
        };

        let mut ep = entry;
        for layer in (1..=self.max_level).rev() {
            ep = self.closest_to_query(query, ep, layer);
        }

        let ef = self.ef_construction.max(k);
        let mut best = self.search_layer(query, &[ep], ef, 0);
        best.truncate(k);
        Ok(best
            .into_iter()
            .map(|c| (self.nodes[c.node].doc_id.clone(), c.score))
            .collect())
    }

    /// Sample a node level from the standard HNSW geometric distribution.
    fn sample_level(&mut self) -> usize {
        let uniform: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        ((-uniform.ln() * self.level_mult).floor() as usize).min(31)
    }

    /// Best-first search on one layer, returning up to `ef` candidates
    /// ordered by decreasing similarity.
    fn search_layer(&self, query: &[f32], entry_points: &[usize], ef: usize, layer: usize) -> Vec<Scored> {
        let mut visited: HashSet<usize> = HashSet::new();
        let mut candidates: BinaryHeap<Scored> = BinaryHeap::new();
        let mut results: BinaryHeap<std::cmp::Reverse<Scored>> = BinaryHeap::new();

        for &ep in entry_points {
            if visited.insert(ep) {
                let scored = Scored {
                    score: cosine_similarity(query, &self.nodes[ep].vector),
                    node: ep,
                };
                candidates.push(scored);
                results.push(std::cmp::Reverse(scored));
            }
        }

        while let Some(current) = candidates.pop() {
            let worst = results.peek().map(|r| r.0.score).unwrap_or(f64::MIN);
            if results.len() >= ef && current.score < worst {
                break;
            }

            let neighbors = self.nodes[current.node]
                .neighbors
                .get(layer)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for &neighbor in neighbors {
                if !visited.insert(neighbor) {
                    continue;
                }
                let score = cosine_similarity(query, &self.nodes[neighbor].vector);
                let worst = results.peek().map(|r| r.0.score).unwrap_or(f64::MIN);
                if results.len() < ef || score > worst {
                    let scored = Scored { score, node: neighbor };
                    candidates.push(scored);
                    results.push(std::cmp::Reverse(scored));
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        let mut out: Vec<Scored> = results.into_iter().map(|r| r.0).collect();
        out.sort_by(|a, b| b.cmp(a));
        out
    }

    /// Greedy single-step descent toward the node closest to `node`'s vector.
    fn closest_on_layer(&self, node: usize, from: usize, layer: usize) -> usize {
        let vector = self.nodes[node].vector.clone();
        self.closest_to_query(&vector, from, layer)
    }

    fn closest_to_query(&self, query: &[f32], from: usize, layer: usize) -> usize {
        let mut best = from;
        let mut best_score = cosine_similarity(query, &self.nodes[best].vector);
        loop {
            let mut improved = false;
            let neighbors = self.nodes[best]
                .neighbors
                .get(layer)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for &neighbor in neighbors {
                let score = cosine_similarity(query, &self.nodes[neighbor].vector);
                if score > best_score {
                    best = neighbor;
                    best_score = score;
                    improved = true;
                }
            }
            if !improved {
                return best;
            }
        }
    }

    /// Keep only the `max_conn` most similar neighbors of `node` on `layer`.
    fn prune(&mut self, node: usize, layer: usize, max_conn: usize) {
        let vector = self.nodes[node].vector.clone();
        let mut scored: Vec<Scored> = self.nodes[node].neighbors[layer]
            .iter()
            .map(|&n| Scored {
                score: cosine_similarity(&vector, &self.nodes[n].vector),
                node: n,
            })
            .collect();
        scored.sort_by(|a, b| b.cmp(a));
        scored.truncate(max_conn);
        scored.dedup_by_key(|c| c.node);
        self.nodes[node].neighbors[layer] = scored.into_iter().map(|c| c.node).collect();
    }
}

/// Cosine similarity between two vectors, zero when either has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
