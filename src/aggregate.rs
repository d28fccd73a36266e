use crate::canonical::canonicalize;
use crate::identity::{peer_id, target_id, workload_id};
use crate::ir::{Model, Target, Workload};
use crate::policy::{NetworkPolicy, NetworkPolicyPeer, NetworkPolicyPort, PolicyType};
use std::collections::HashMap;
use tracing::debug;

pub const BLOCK_ALL_INGRESS_PEER: &str = "_ALL_PEER_INGRESS_";
pub const BLOCK_ALL_EGRESS_PEER: &str = "_ALL_PEER_EGRESS_";
// The ingress allow-all peer has no trailing underscore; existing diagrams
// depend on the alias.
pub const ALLOW_ALL_INGRESS_PEER: &str = "_ALL_PEER_INGRESS";
pub const ALLOW_ALL_EGRESS_PEER: &str = "_ALL_PEER_EGRESS_";

/// Peers and ports of one rule, independent of direction.
struct RuleView<'a> {
    peers: &'a [NetworkPolicyPeer],
    ports: &'a [NetworkPolicyPort],
}

/// Groups policies by workload and expands their rules into targets.
pub fn aggregate(policies: &[NetworkPolicy]) -> Model {
    let mut workloads: HashMap<String, Workload> = HashMap::new();
    for policy in policies {
        let namespace = &policy.metadata.namespace;
        let name = &policy.metadata.name;
        let selector = &policy.spec.pod_selector;
        let id = workload_id(namespace, selector);

        let workload = workloads
            .entry(id.clone())
            .and_modify(|existing| {
                debug!(policy = %name, workload = %existing.id, "merging policy into existing workload");
                existing.names.push(name.clone());
                // Different selectors can share an id; keep the smallest.
                if (namespace.as_str(), selector) < (existing.namespace.as_str(), &existing.selector) {
                    existing.namespace = namespace.clone();
                    existing.selector = selector.clone();
                }
            })
            .or_insert_with(|| Workload::new(id.clone(), name, namespace, selector));

        for direction in [PolicyType::Ingress, PolicyType::Egress] {
            if !policy.spec.policy_types.contains(&direction) {
                continue;
            }
            let rules: Vec<RuleView<'_>> = match direction {
                PolicyType::Ingress => policy
                    .spec
                    .ingress
                    .iter()
                    .map(|rule| RuleView {
                        peers: &rule.from,
                        ports: &rule.ports,
                    })
                    .collect(),
                PolicyType::Egress => policy
                    .spec
                    .egress
                    .iter()
                    .map(|rule| RuleView {
                        peers: &rule.to,
                        ports: &rule.ports,
                    })
                    .collect(),
            };
            let targets = expand_rules(&workload.id, direction, &rules);
            workload.targets_mut(direction).extend(targets);
        }
    }
    debug!(workloads = workloads.len(), policies = policies.len(), "aggregated policies");
    canonicalize(workloads)
}

fn expand_rules(workload: &str, direction: PolicyType, rules: &[RuleView<'_>]) -> Vec<Target> {
    if rules.is_empty() {
        let peer = match direction {
            PolicyType::Ingress => BLOCK_ALL_INGRESS_PEER,
            PolicyType::Egress => BLOCK_ALL_EGRESS_PEER,
        };
        return vec![Target::block_all(format!("{workload}_ALL_"), peer)];
    }

    let mut targets = Vec::new();
    for rule in rules {
        if rule.peers.is_empty() {
            // No peers matches everything, whatever ports are listed.
            let peer = match direction {
                PolicyType::Ingress => ALLOW_ALL_INGRESS_PEER,
                PolicyType::Egress => ALLOW_ALL_EGRESS_PEER,
            };
            let id = target_id(&NetworkPolicyPeer::default(), &NetworkPolicyPort::default());
            targets.push(Target::allow_all(id, peer));
            continue;
        }
        for peer in rule.peers {
            if rule.ports.is_empty() {
                targets.push(peer_target(peer, &NetworkPolicyPort::default()));
            } else {
                for port in rule.ports {
                    targets.push(peer_target(peer, port));
                }
            }
        }
    }
    targets
}

fn peer_target(peer: &NetworkPolicyPeer, port: &NetworkPolicyPort) -> Target {
    Target {
        id: target_id(peer, port),
        peer_id: peer_id(peer),
        peer: peer.clone(),
        port: port.clone(),
        block_all: false,
        allow_all: false,
    }
}
