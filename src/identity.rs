//! Stable identifiers for workloads, peers and targets.
//!
//! Identifiers double as PlantUML aliases, so every derived value is passed
//! through [`normalize`] before use. Derivation is a plain ordered
//! concatenation of fields; identical input always yields identical output.

use crate::policy::{IpBlock, LabelSelector, NetworkPolicyPeer, NetworkPolicyPort};

/// Identifier of a selector that matches everything.
pub const MATCH_ALL: &str = "_ALL_";
/// Identifier of a peer with no selector and no IP block.
pub const UNRESTRICTED_PEER: &str = "_ALL_PEER_";

/// Replaces characters PlantUML does not accept in aliases.
pub fn normalize(value: &str) -> String {
    value.replace(['-', ':', '/'], "_")
}

pub fn label_selector_id(selector: &LabelSelector) -> String {
    if selector.is_empty() {
        return MATCH_ALL.to_string();
    }
    let mut id = String::new();
    for (key, value) in &selector.match_labels {
        id.push_str(key);
        id.push_str(value);
    }
    // Expression order is significant and is kept as declared.
    for expr in &selector.match_expressions {
        id.push_str(&expr.key);
        id.push_str(&expr.operator);
        for value in &expr.values {
            id.push_str(value);
        }
    }
    normalize(&id)
}

pub fn ip_block_id(block: &IpBlock) -> String {
    let mut id = block.cidr.clone();
    for except in &block.except {
        id.push_str(except);
    }
    normalize(&id)
}

pub fn peer_id(peer: &NetworkPolicyPeer) -> String {
    let mut id = String::new();
    if let Some(selector) = &peer.pod_selector {
        id.push_str(&label_selector_id(selector));
    }
    if let Some(selector) = &peer.namespace_selector {
        id.push_str(&label_selector_id(selector));
    }
    if let Some(block) = &peer.ip_block {
        id.push_str(&ip_block_id(block));
    }
    if id.is_empty() {
        return UNRESTRICTED_PEER.to_string();
    }
    normalize(&id)
}

pub fn target_id(peer: &NetworkPolicyPeer, port: &NetworkPolicyPort) -> String {
    let mut id = peer_id(peer);
    if let Some(protocol) = &port.protocol {
        id.push_str(protocol);
    }
    if let Some(value) = &port.port {
        id.push_str(&value.to_string());
    }
    if let Some(end_port) = port.end_port {
        id.push_str(&end_port.to_string());
    }
    normalize(&id)
}

pub fn workload_id(namespace: &str, selector: &LabelSelector) -> String {
    let mut id = namespace.to_string();
    id.push_str(&label_selector_id(selector));
    normalize(&id)
}
