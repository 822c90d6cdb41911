use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TELEPORTATION_PROBABILITY: f64 = 0.15;

/// Which relation kind feeds the connection source. The flow core never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionType {
    #[default]
    Links,
    Edges,
    Transactions,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Links => "links",
            ConnectionType::Edges => "edges",
            ConnectionType::Transactions => "transactions",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "links" | "link" => Ok(ConnectionType::Links),
            "edges" | "edge" => Ok(ConnectionType::Edges),
            "transactions" | "transaction" => Ok(ConnectionType::Transactions),
            _ => Err(Error::UnknownConnectionType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowConfig {
    pub undirected: bool,
    pub directed: bool,
    pub outdirdir: bool,
    pub undirdir: bool,
    pub rawdir: bool,
    pub include_self_links: bool,
    pub teleport_to_nodes: bool,
    pub recorded_teleportation: bool,
    pub teleportation_probability: f64,
    pub connection_type: ConnectionType,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::undirected_flow()
    }
}

impl FlowConfig {
    fn base() -> Self {
        Self {
            undirected: false,
            directed: false,
            outdirdir: false,
            undirdir: false,
            rawdir: false,
            include_self_links: false,
            teleport_to_nodes: false,
            recorded_teleportation: false,
            teleportation_probability: DEFAULT_TELEPORTATION_PROBABILITY,
            connection_type: ConnectionType::Links,
        }
    }

    /// Links folded to canonical order, flow proportional to weighted degree.
    pub fn undirected_flow() -> Self {
        Self {
            undirected: true,
            ..Self::base()
        }
    }

    /// Teleporting random walk over directed links.
    pub fn directed_flow() -> Self {
        Self {
            directed: true,
            ..Self::base()
        }
    }

    /// Undirected steady state followed by one directed step.
    pub fn undirdir_flow() -> Self {
        Self {
            undirdir: true,
            ..Self::base()
        }
    }

    /// Like `undirdir_flow`, but the steady state is seeded from incoming links only.
    pub fn outdirdir_flow() -> Self {
        Self {
            outdirdir: true,
            ..Self::base()
        }
    }

    /// Normalized link weights used directly as flow.
    pub fn rawdir_flow() -> Self {
        Self {
            rawdir: true,
            ..Self::base()
        }
    }

    pub fn with_self_links(mut self, include: bool) -> Self {
        self.include_self_links = include;
        self
    }

    pub fn with_teleport_to_nodes(mut self, to_nodes: bool) -> Self {
        self.teleport_to_nodes = to_nodes;
        self
    }

    pub fn with_recorded_teleportation(mut self, recorded: bool) -> Self {
        self.recorded_teleportation = recorded;
        self
    }

    pub fn with_teleportation_probability(mut self, alpha: f64) -> Self {
        self.teleportation_probability = alpha;
        self
    }

    pub fn with_connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let alpha = self.teleportation_probability;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::InvalidTeleportationProbability(alpha));
        }
        Ok(())
    }
}
