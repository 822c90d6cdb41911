use std::cmp::Ordering;

/// Dense zero-based node position; callers map their own node ids onto `0..node_count`.
pub type NodeIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: f64,
    pub flow: f64,
}

impl Connection {
    pub fn new(source: NodeIndex, target: NodeIndex, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
            flow: weight,
        }
    }

    #[inline]
    pub fn with_flow(self, flow: f64) -> Self {
        Self { flow, ..self }
    }

    #[inline]
    pub fn is_self_link(&self) -> bool {
        self.source == self.target
    }
}

impl From<(NodeIndex, NodeIndex, f64)> for Connection {
    fn from((source, target, weight): (NodeIndex, NodeIndex, f64)) -> Self {
        Connection::new(source, target, weight)
    }
}

/// Aggregation key. Ordered by `end1`, then `end2`; `(a, b)` and `(b, a)` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodePair {
    pub end1: NodeIndex,
    pub end2: NodeIndex,
}

impl NodePair {
    pub fn new(end1: NodeIndex, end2: NodeIndex) -> Self {
        Self { end1, end2 }
    }
}

impl Ord for NodePair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.end1
            .cmp(&other.end1)
            .then(self.end2.cmp(&other.end2))
    }
}

impl PartialOrd for NodePair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A finite sequence of raw connections that can be walked any number of times.
pub trait ConnectionSource {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_;
}

impl ConnectionSource for [Connection] {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.iter().copied()
    }
}

impl ConnectionSource for Vec<Connection> {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.as_slice().connections()
    }
}

impl ConnectionSource for [(NodeIndex, NodeIndex, f64)] {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.iter().copied().map(Connection::from)
    }
}

impl ConnectionSource for Vec<(NodeIndex, NodeIndex, f64)> {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.as_slice().connections()
    }
}

impl<S: ConnectionSource + ?Sized> ConnectionSource for &S {
    fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        (**self).connections()
    }
}
