use crate::config::FlowConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::flow_data::{FlowData, node_flow_data};
use crate::network::Network;
use log::{debug, info, trace, warn};

pub const MAX_ITERATIONS: usize = 200;
pub const MIN_ITERATIONS: usize = 50;
pub const CONVERGENCE_TOLERANCE: f64 = 1.0e-15;
const RENORMALIZE_THRESHOLD: f64 = 1.0e-10;
const STAGNATION_NUDGE: f64 = 1.0e-10;

/// The propagation model, chosen once per computation from the config flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowModel {
    Raw,
    Undirected,
    UndirectedCorrected,
    Directed,
}

impl FlowModel {
    pub fn select(cfg: &FlowConfig) -> Self {
        if cfg.rawdir {
            FlowModel::Raw
        } else if !cfg.directed {
            if cfg.undirdir || cfg.outdirdir {
                FlowModel::UndirectedCorrected
            } else {
                FlowModel::Undirected
            }
        } else {
            FlowModel::Directed
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, FlowModel::Undirected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    pub iterations: usize,
    pub converged: bool,
    pub residual: f64,
    pub dangling_rank: f64,
    pub alpha: f64,
    pub perturbations: usize,
}

#[derive(Debug, Clone)]
pub struct FlowNetwork {
    model: FlowModel,
    node_out_degree: Vec<usize>,
    sum_link_out_weight: Vec<f64>,
    node_flow: Vec<f64>,
    node_teleport_rates: Vec<f64>,
    flow_connections: Vec<Connection>,
    iteration_stats: Option<IterationStats>,
}

// Directed links count both ends once each; undirected totals are already doubled.
fn sum_undir_weight(network: &Network, cfg: &FlowConfig) -> f64 {
    network.total_weight() * if cfg.undirected { 1.0 } else { 2.0 }
}

#[inline]
fn ratio(num: f64, denom: f64) -> f64 {
    if denom != 0.0 { num / denom } else { 0.0 }
}

/// L1-normalizes `v` in place and returns the sum it was divided by.
fn normalize(v: &mut [f64]) -> f64 {
    let sum: f64 = v.iter().sum();
    if sum != 0.0 {
        for x in v.iter_mut() {
            *x /= sum;
        }
    }
    sum
}

impl FlowNetwork {
    pub fn calculate_flow(network: &Network, cfg: &FlowConfig) -> Result<Self> {
        cfg.validate()?;

        let model = FlowModel::select(cfg);
        let mut fnet = Self::setup(network, cfg, model);
        debug!(
            "Calculating {:?} flow on {} nodes and {} links",
            model,
            network.node_count(),
            network.link_count()
        );

        if network.node_count() == 0 || network.total_weight() <= 0.0 {
            warn!("Network has no weighted links; flow left at its initial values");
            return Ok(fnet);
        }

        match model {
            FlowModel::Raw => fnet.raw_flow(network),
            FlowModel::Undirected => fnet.undirected_flow(network, cfg),
            FlowModel::UndirectedCorrected => fnet.corrected_undirected_flow(),
            FlowModel::Directed => fnet.directed_flow(network, cfg),
        }

        Ok(fnet)
    }

    fn setup(network: &Network, cfg: &FlowConfig, model: FlowModel) -> Self {
        let n = network.node_count();
        let mut node_out_degree = vec![0usize; n];
        let mut sum_link_out_weight = vec![0.0f64; n];
        let mut node_flow = vec![0.0f64; n];
        let mut flow_connections = Vec::with_capacity(network.link_count());

        let sum_undir_weight = sum_undir_weight(network, cfg);

        for &(pair, w) in network.links() {
            let (s, t) = (pair.end1, pair.end2);
            node_out_degree[s] += 1;
            sum_link_out_weight[s] += w;
            if cfg.undirected {
                sum_link_out_weight[t] += w;
            }

            let seed = ratio(w, sum_undir_weight);
            node_flow[s] += seed;
            if !cfg.outdirdir {
                node_flow[t] += seed;
            }

            flow_connections.push(Connection::new(s, t, w));
        }

        Self {
            model,
            node_out_degree,
            sum_link_out_weight,
            node_flow,
            node_teleport_rates: vec![0.0; n],
            flow_connections,
            iteration_stats: None,
        }
    }

    fn raw_flow(&mut self, network: &Network) {
        let total_weight = network.total_weight();
        let links: Vec<Connection> = self
            .flow_connections
            .iter()
            .map(|c| c.with_flow(ratio(c.flow, total_weight)))
            .collect();

        self.node_flow.fill(0.0);
        for c in &links {
            self.node_flow[c.target] += c.flow;
        }
        normalize(&mut self.node_flow);

        self.flow_connections = links;
    }

    fn undirected_flow(&mut self, network: &Network, cfg: &FlowConfig) {
        let sum_undir_weight = sum_undir_weight(network, cfg);
        self.flow_connections = self
            .flow_connections
            .iter()
            .map(|c| c.with_flow(ratio(c.flow, sum_undir_weight)))
            .collect();
    }

    // One power-iteration step from the undirected steady state over directed links.
    fn corrected_undirected_flow(&mut self) {
        let n = self.node_out_degree.len();
        let steady_state = std::mem::replace(&mut self.node_flow, vec![0.0; n]);
        let sum_out = &self.sum_link_out_weight;

        for c in &self.flow_connections {
            self.node_flow[c.target] += steady_state[c.source] * ratio(c.flow, sum_out[c.source]);
        }
        let sum = normalize(&mut self.node_flow);

        self.flow_connections = self
            .flow_connections
            .iter()
            .map(|c| {
                let scale = ratio(ratio(steady_state[c.source], sum_out[c.source]), sum);
                c.with_flow(c.flow * scale)
            })
            .collect();
    }

    fn directed_flow(&mut self, network: &Network, cfg: &FlowConfig) {
        self.node_teleport_rates = self.teleport_rates(network, cfg);

        let transitions: Vec<Connection> = self
            .flow_connections
            .iter()
            .map(|c| c.with_flow(ratio(c.flow, self.sum_link_out_weight[c.source])))
            .collect();

        let dangling: Vec<usize> = (0..self.node_out_degree.len())
            .filter(|&i| self.node_out_degree[i] == 0)
            .collect();

        let walk = power_iterate(
            &mut self.node_flow,
            &transitions,
            &self.node_teleport_rates,
            &dangling,
            cfg.teleportation_probability,
        );

        let (beta, normalizing_sum) = if cfg.recorded_teleportation {
            (walk.beta, 1.0)
        } else {
            // Unrecorded teleportation: node flow is what arrives over links only.
            let sum_node_rank = 1.0 - walk.stats.dangling_rank;
            self.node_flow.fill(0.0);
            for c in &transitions {
                self.node_flow[c.target] += ratio(c.flow * walk.flow_next[c.source], sum_node_rank);
            }
            (1.0, sum_node_rank)
        };

        self.flow_connections = transitions
            .iter()
            .map(|c| c.with_flow(ratio(c.flow * beta * walk.flow_next[c.source], normalizing_sum)))
            .collect();
        self.iteration_stats = Some(walk.stats);
    }

    fn teleport_rates(&self, network: &Network, cfg: &FlowConfig) -> Vec<f64> {
        if cfg.teleport_to_nodes {
            let sum = network.sum_node_teleport_weight();
            return network
                .node_teleport_weights()
                .iter()
                .map(|&w| ratio(w, sum))
                .collect();
        }

        let total_weight = network.total_weight();
        let mut rates = vec![0.0; self.node_out_degree.len()];
        for c in &self.flow_connections {
            let node = if cfg.recorded_teleportation { c.target } else { c.source };
            rates[node] += ratio(c.flow, total_weight);
        }
        rates
    }

    pub fn model(&self) -> FlowModel {
        self.model
    }

    pub fn node_count(&self) -> usize {
        self.node_flow.len()
    }

    pub fn node_flow(&self) -> &[f64] {
        &self.node_flow
    }

    pub fn node_teleport_rates(&self) -> &[f64] {
        &self.node_teleport_rates
    }

    pub fn flow_connections(&self) -> &[Connection] {
        &self.flow_connections
    }

    pub fn node_out_degree(&self) -> &[usize] {
        &self.node_out_degree
    }

    pub fn sum_link_out_weight(&self) -> &[f64] {
        &self.sum_link_out_weight
    }

    pub fn iteration_stats(&self) -> Option<&IterationStats> {
        self.iteration_stats.as_ref()
    }

    pub fn node_flow_data(&self) -> Vec<FlowData> {
        node_flow_data(
            self.model,
            &self.node_flow,
            &self.node_teleport_rates,
            &self.sum_link_out_weight,
            &self.flow_connections,
        )
    }

    /// Node flow, node teleport rates and link flows, in that order.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<Connection>) {
        (self.node_flow, self.node_teleport_rates, self.flow_connections)
    }
}

struct RandomWalk {
    // Last unnormalized iterate; link flows are derived from it.
    flow_next: Vec<f64>,
    beta: f64,
    stats: IterationStats,
}

fn power_iterate(
    node_flow: &mut [f64],
    transitions: &[Connection],
    teleport_rates: &[f64],
    dangling: &[usize],
    teleportation_probability: f64,
) -> RandomWalk {
    let n = node_flow.len();
    let mut flow_next = vec![0.0f64; n];

    let mut alpha = teleportation_probability;
    let mut beta = 1.0 - alpha;
    let mut iterations = 0usize;
    let mut perturbations = 0usize;
    let mut sqdiff = 1.0f64;
    let mut dangling_rank;

    loop {
        let sqdiff_old = sqdiff;

        dangling_rank = dangling.iter().map(|&i| node_flow[i]).sum::<f64>();

        let tele_flow = alpha + beta * dangling_rank;
        for (next, rate) in flow_next.iter_mut().zip(teleport_rates) {
            *next = tele_flow * rate;
        }

        for c in transitions {
            flow_next[c.target] += beta * c.flow * node_flow[c.source];
        }

        let mut sum = 0.0;
        sqdiff = 0.0;
        for i in 0..n {
            sum += flow_next[i];
            sqdiff += (flow_next[i] - node_flow[i]).abs();
        }

        node_flow.copy_from_slice(&flow_next);

        if sum != 0.0 && (sum - 1.0).abs() > RENORMALIZE_THRESHOLD {
            for x in node_flow.iter_mut() {
                *x /= sum;
            }
        }

        // Frozen above tolerance: perturb the damping so the iteration can move again.
        if sqdiff.to_bits() == sqdiff_old.to_bits() {
            alpha += STAGNATION_NUDGE;
            beta = 1.0 - alpha;
            perturbations += 1;
        }

        iterations += 1;
        trace!("Iteration {}: residual {:e}, dangling rank {}", iterations, sqdiff, dangling_rank);

        if iterations >= MAX_ITERATIONS
            || (sqdiff <= CONVERGENCE_TOLERANCE && iterations >= MIN_ITERATIONS)
        {
            break;
        }
    }

    let converged = sqdiff <= CONVERGENCE_TOLERANCE;
    if converged {
        info!(
            "Flow converged after {} iterations (residual {:e}, {} perturbations)",
            iterations, sqdiff, perturbations
        );
    } else {
        warn!(
            "Flow did not converge within {} iterations (residual {:e})",
            iterations, sqdiff
        );
    }

    RandomWalk {
        flow_next,
        beta,
        stats: IterationStats {
            iterations,
            converged,
            residual: sqdiff,
            dangling_rank,
            alpha,
            perturbations,
        },
    }
}
