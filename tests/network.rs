use flownet::{Connection, ConnectionType, Error, FlowConfig, Network, NodeIndex, NodePair};

fn directed() -> FlowConfig {
    FlowConfig::directed_flow()
}

fn undirected() -> FlowConfig {
    FlowConfig::undirected_flow()
}

#[test]
fn undirected_folds_reverse_pairs_into_one_link() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> = vec![(3, 1, 2.0), (1, 3, 2.0)];
    let net = Network::read(&conns, 4, &undirected()).unwrap();

    assert_eq!(net.links(), &[(NodePair::new(1, 3), 4.0)]);
    assert!((net.total_weight() - 8.0).abs() < 1e-12);
    assert_eq!(net.read_stats().merged, 1);
}

#[test]
fn directed_keeps_reverse_pairs_apart() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> = vec![(3, 1, 2.0), (1, 3, 2.0)];
    let net = Network::read(&conns, 4, &directed()).unwrap();

    assert_eq!(
        net.links(),
        &[(NodePair::new(1, 3), 2.0), (NodePair::new(3, 1), 2.0)]
    );
    assert!((net.total_weight() - 4.0).abs() < 1e-12);
    assert_eq!(net.read_stats().merged, 0);
}

#[test]
fn duplicate_pairs_are_summed() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> = vec![(0, 1, 2.5), (0, 1, 0.5), (1, 2, 1.0)];
    let net = Network::read(&conns, 3, &directed()).unwrap();

    assert_eq!(net.link_count(), 2);
    assert_eq!(net.link_weight(0, 1), Some(3.0));
    assert_eq!(net.link_weight(1, 2), Some(1.0));
    assert_eq!(net.link_weight(2, 1), None);
    assert_eq!(net.read_stats().connections_read, 3);
}

#[test]
fn excluded_self_links_contribute_nothing() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> = vec![(0, 0, 5.0), (0, 1, 1.0), (2, 2, 1.0)];
    let net = Network::read(&conns, 3, &directed()).unwrap();

    assert_eq!(net.links(), &[(NodePair::new(0, 1), 1.0)]);
    assert!((net.total_weight() - 1.0).abs() < 1e-12);
    assert_eq!(net.read_stats().self_links_skipped, 2);
}

#[test]
fn included_self_links_are_aggregated() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> = vec![(0, 0, 5.0), (0, 1, 1.0)];
    let net = Network::read(&conns, 2, &undirected().with_self_links(true)).unwrap();

    assert_eq!(net.link_weight(0, 0), Some(5.0));
    assert!((net.total_weight() - 12.0).abs() < 1e-12);
    assert_eq!(net.read_stats().self_links_skipped, 0);
}

#[test]
fn links_are_ordered_by_node_pair() {
    let conns: Vec<(NodeIndex, NodeIndex, f64)> =
        vec![(2, 0, 1.0), (1, 1, 1.0), (0, 2, 1.0), (0, 1, 1.0)];
    let net = Network::read(&conns, 3, &directed().with_self_links(true)).unwrap();

    let pairs: Vec<NodePair> = net.links().iter().map(|(p, _)| *p).collect();
    assert_eq!(
        pairs,
        vec![
            NodePair::new(0, 1),
            NodePair::new(0, 2),
            NodePair::new(1, 1),
            NodePair::new(2, 0),
        ]
    );
}

#[test]
fn node_pair_orders_by_first_end() {
    assert!(NodePair::new(0, 9) < NodePair::new(1, 0));
    assert!(NodePair::new(1, 0) < NodePair::new(1, 2));
    assert_ne!(NodePair::new(1, 2), NodePair::new(2, 1));
}

#[test]
fn connection_slices_are_sources() {
    let conns = vec![Connection::new(0, 1, 1.0), Connection::new(1, 0, 3.0)];
    assert_eq!(conns[1].flow, 3.0);

    let net = Network::read(conns.as_slice(), 2, &undirected()).unwrap();
    assert_eq!(net.links(), &[(NodePair::new(0, 1), 4.0)]);
}

#[test]
fn default_teleport_weights_are_uniform() {
    let net = Network::read(&[(0, 1, 1.0)][..], 4, &directed()).unwrap();
    assert_eq!(net.node_teleport_weights(), &[1.0, 1.0, 1.0, 1.0]);
    assert!((net.sum_node_teleport_weight() - 4.0).abs() < 1e-12);
}

#[test]
fn custom_teleport_weights_replace_uniform_ones() {
    let net = Network::read(&[(0, 1, 1.0)][..], 2, &directed())
        .unwrap()
        .with_node_teleport_weights(vec![3.0, 1.0])
        .unwrap();
    assert!((net.sum_node_teleport_weight() - 4.0).abs() < 1e-12);

    let err = Network::read(&[(0, 1, 1.0)][..], 2, &directed())
        .unwrap()
        .with_node_teleport_weights(vec![1.0])
        .unwrap_err();
    assert_eq!(err, Error::NodeWeightCountMismatch { expected: 2, found: 1 });

    let err = Network::read(&[(0, 1, 1.0)][..], 2, &directed())
        .unwrap()
        .with_node_teleport_weights(vec![1.0, -1.0])
        .unwrap_err();
    assert_eq!(err, Error::InvalidNodeWeight { index: 1, weight: -1.0 });
}

#[test]
fn empty_source_yields_empty_network() {
    let conns: Vec<(usize, usize, f64)> = Vec::new();
    let net = Network::read(&conns, 0, &undirected()).unwrap();
    assert!(net.is_empty());
    assert_eq!(net.total_weight(), 0.0);
    assert_eq!(net.node_count(), 0);
}

#[test]
fn out_of_range_index_is_rejected() {
    let err = Network::read(&[(0, 5, 1.0)][..], 3, &directed()).unwrap_err();
    assert_eq!(err, Error::NodeIndexOutOfRange { index: 5, node_count: 3 });
}

#[test]
fn negative_and_nan_weights_are_rejected() {
    let err = Network::read(&[(0, 1, -1.0)][..], 2, &directed()).unwrap_err();
    assert!(matches!(err, Error::InvalidWeight { from: 0, to: 1, .. }));

    let err = Network::read(&[(1, 0, f64::NAN)][..], 2, &directed()).unwrap_err();
    assert!(matches!(err, Error::InvalidWeight { from: 1, to: 0, .. }));
}

#[test]
fn connection_type_parses_known_names() {
    assert_eq!("links".parse::<ConnectionType>().unwrap(), ConnectionType::Links);
    assert_eq!(" Edges ".parse::<ConnectionType>().unwrap(), ConnectionType::Edges);
    assert_eq!(
        "TRANSACTIONS".parse::<ConnectionType>().unwrap(),
        ConnectionType::Transactions
    );
    assert_eq!(ConnectionType::Edges.to_string(), "edges");

    let err = "hyperedges".parse::<ConnectionType>().unwrap_err();
    assert_eq!(err, Error::UnknownConnectionType("hyperedges".to_string()));
}
