use crate::connection::Connection;
use crate::flow::FlowModel;

/// Per-node flow summary handed to the clustering stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowData {
    pub flow: f64,
    pub enter_flow: f64,
    pub exit_flow: f64,
    pub teleport_rate: f64,
    pub dangling_flow: f64,
}

pub(crate) fn node_flow_data(
    model: FlowModel,
    node_flow: &[f64],
    node_teleport_rates: &[f64],
    sum_link_out_weight: &[f64],
    flow_connections: &[Connection],
) -> Vec<FlowData> {
    let mut data: Vec<FlowData> = node_flow
        .iter()
        .zip(node_teleport_rates)
        .zip(sum_link_out_weight)
        .map(|((&flow, &teleport_rate), &out_weight)| FlowData {
            flow,
            teleport_rate,
            dangling_flow: if out_weight == 0.0 { flow } else { 0.0 },
            ..FlowData::default()
        })
        .collect();

    // Self-links never cross a module boundary, so they add no enter or exit flow.
    for c in flow_connections.iter().filter(|c| !c.is_self_link()) {
        if model.is_symmetric() {
            // Undirected links carry the same flow both ways; enter and exit coincide.
            for node in [c.source, c.target] {
                data[node].enter_flow += c.flow;
                data[node].exit_flow += c.flow;
            }
        } else {
            data[c.source].exit_flow += c.flow;
            data[c.target].enter_flow += c.flow;
        }
    }

    data
}
