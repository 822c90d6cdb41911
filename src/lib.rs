//! Flow-network construction for map-equation community detection.
//!
//! Raw weighted connections are aggregated into a [`Network`], then a [`FlowNetwork`]
//! computes a steady-state flow for every node and every aggregated link.

pub mod config;
pub mod connection;
pub mod error;
pub mod flow;
pub mod flow_data;
pub mod network;

pub use config::{ConnectionType, FlowConfig};
pub use connection::{Connection, ConnectionSource, NodeIndex, NodePair};
pub use error::{Error, Result};
pub use flow::{FlowModel, FlowNetwork, IterationStats};
pub use flow_data::FlowData;
pub use network::{Network, ReadStats};
