use crate::policy::{LabelSelector, NetworkPolicyPeer, NetworkPolicyPort, PolicyType};

/// One or more policies sharing a selector within a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    pub id: String,
    pub names: Vec<String>,
    pub namespace: String,
    pub selector: LabelSelector,
    pub ingress: Vec<Target>,
    pub egress: Vec<Target>,
}

impl Workload {
    pub fn new(id: String, name: &str, namespace: &str, selector: &LabelSelector) -> Self {
        Self {
            id,
            names: vec![name.to_string()],
            namespace: namespace.to_string(),
            selector: selector.clone(),
            ingress: Vec::new(),
            egress: Vec::new(),
        }
    }

    pub fn targets(&self, direction: PolicyType) -> &[Target] {
        match direction {
            PolicyType::Ingress => &self.ingress,
            PolicyType::Egress => &self.egress,
        }
    }

    pub fn targets_mut(&mut self, direction: PolicyType) -> &mut Vec<Target> {
        match direction {
            PolicyType::Ingress => &mut self.ingress,
            PolicyType::Egress => &mut self.egress,
        }
    }
}

/// A single peer+port combination reachable (or blocked) in one direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    pub id: String,
    pub peer_id: String,
    pub peer: NetworkPolicyPeer,
    pub port: NetworkPolicyPort,
    pub block_all: bool,
    pub allow_all: bool,
}

impl Target {
    /// Deny-all marker for a direction listed in `policyTypes` without rules.
    pub fn block_all(id: String, peer_id: &str) -> Self {
        Self {
            id,
            peer_id: peer_id.to_string(),
            block_all: true,
            ..Default::default()
        }
    }

    /// Allow-all marker for a rule without peers.
    pub fn allow_all(id: String, peer_id: &str) -> Self {
        Self {
            id,
            peer_id: peer_id.to_string(),
            allow_all: true,
            ..Default::default()
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.block_all || self.allow_all
    }
}

/// Canonically ordered workloads, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub workloads: Vec<Workload>,
}

impl Model {
    pub fn get(&self, id: &str) -> Option<&Workload> {
        self.workloads.iter().find(|workload| workload.id == id)
    }
}
