use crate::config::FlowConfig;
use crate::connection::{ConnectionSource, NodeIndex, NodePair};
use crate::error::{Error, Result};
use log::debug;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub connections_read: usize,
    pub self_links_skipped: usize,
    pub merged: usize,
}

/// Aggregated adjacency of a connection source.
///
/// Links are unique per [`NodePair`] and kept in `NodePair` order. In undirected mode every
/// pair is stored as `(min, max)` and counts twice toward `total_weight`.
#[derive(Debug, Clone)]
pub struct Network {
    node_count: usize,
    links: Vec<(NodePair, f64)>,
    total_weight: f64,
    node_teleport_weights: Vec<f64>,
    sum_node_teleport_weight: f64,
    stats: ReadStats,
}

impl Network {
    pub fn read<S>(source: &S, node_count: usize, cfg: &FlowConfig) -> Result<Self>
    where
        S: ConnectionSource + ?Sized,
    {
        let mut link_map: FxHashMap<NodePair, f64> = FxHashMap::default();
        let mut total_weight = 0.0;
        let mut stats = ReadStats::default();

        for conn in source.connections() {
            stats.connections_read += 1;

            for index in [conn.source, conn.target] {
                if index >= node_count {
                    return Err(Error::NodeIndexOutOfRange { index, node_count });
                }
            }
            if !conn.weight.is_finite() || conn.weight < 0.0 {
                return Err(Error::InvalidWeight {
                    from: conn.source,
                    to: conn.target,
                    weight: conn.weight,
                });
            }

            if conn.is_self_link() && !cfg.include_self_links {
                stats.self_links_skipped += 1;
                continue;
            }

            let (s, t) = if cfg.undirected && conn.target < conn.source {
                (conn.target, conn.source)
            } else {
                (conn.source, conn.target)
            };

            total_weight += conn.weight;
            if cfg.undirected {
                total_weight += conn.weight;
            }

            match link_map.get_mut(&NodePair::new(s, t)) {
                Some(w) => {
                    *w += conn.weight;
                    stats.merged += 1;
                }
                None => {
                    link_map.insert(NodePair::new(s, t), conn.weight);
                }
            }
        }

        let mut links: Vec<(NodePair, f64)> = link_map.into_iter().collect();
        links.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        debug!(
            "Read {} connections into {} links ({} merged, {} self-links skipped), total weight {}",
            stats.connections_read,
            links.len(),
            stats.merged,
            stats.self_links_skipped,
            total_weight
        );

        Ok(Self {
            node_count,
            links,
            total_weight,
            node_teleport_weights: vec![1.0; node_count],
            sum_node_teleport_weight: node_count as f64,
            stats,
        })
    }

    /// Replaces the uniform teleport weights with caller-supplied node weights.
    pub fn with_node_teleport_weights(mut self, weights: Vec<f64>) -> Result<Self> {
        if weights.len() != self.node_count {
            return Err(Error::NodeWeightCountMismatch {
                expected: self.node_count,
                found: weights.len(),
            });
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(Error::InvalidNodeWeight { index, weight });
        }
        self.sum_node_teleport_weight = weights.iter().sum();
        self.node_teleport_weights = weights;
        Ok(self)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn links(&self) -> &[(NodePair, f64)] {
        &self.links
    }

    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    #[inline]
    pub fn node_teleport_weights(&self) -> &[f64] {
        &self.node_teleport_weights
    }

    #[inline]
    pub fn sum_node_teleport_weight(&self) -> f64 {
        self.sum_node_teleport_weight
    }

    #[inline]
    pub fn read_stats(&self) -> ReadStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.node_count == 0 || self.links.is_empty()
    }

    pub fn link_weight(&self, end1: NodeIndex, end2: NodeIndex) -> Option<f64> {
        let key = NodePair::new(end1, end2);
        self.links
            .binary_search_by(|(pair, _)| pair.cmp(&key))
            .ok()
            .map(|pos| self.links[pos].1)
    }
}
