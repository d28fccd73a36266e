use crate::ir::{Model, Target, Workload};
use crate::label::{port_label, target_label, workload_label};
use crate::policy::{LabelSelector, NetworkPolicyPeer, NetworkPolicyPort};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ModelDump {
    pub workloads: Vec<WorkloadDump>,
}

#[derive(Debug, Serialize)]
pub struct WorkloadDump {
    pub id: String,
    pub names: Vec<String>,
    pub namespace: String,
    pub selector: LabelSelector,
    pub label: String,
    pub ingress: Vec<TargetDump>,
    pub egress: Vec<TargetDump>,
}

#[derive(Debug, Serialize)]
pub struct TargetDump {
    pub id: String,
    pub peer_id: String,
    pub peer: NetworkPolicyPeer,
    pub port: NetworkPolicyPort,
    pub block_all: bool,
    pub allow_all: bool,
    pub label: String,
    pub port_label: String,
}

impl ModelDump {
    pub fn from_model(model: &Model) -> Self {
        Self {
            workloads: model.workloads.iter().map(WorkloadDump::from_workload).collect(),
        }
    }
}

impl WorkloadDump {
    fn from_workload(workload: &Workload) -> Self {
        Self {
            id: workload.id.clone(),
            names: workload.names.clone(),
            namespace: workload.namespace.clone(),
            selector: workload.selector.clone(),
            label: workload_label(workload),
            ingress: workload.ingress.iter().map(TargetDump::from_target).collect(),
            egress: workload.egress.iter().map(TargetDump::from_target).collect(),
        }
    }
}

impl TargetDump {
    fn from_target(target: &Target) -> Self {
        Self {
            id: target.id.clone(),
            peer_id: target.peer_id.clone(),
            peer: target.peer.clone(),
            port: target.port.clone(),
            block_all: target.block_all,
            allow_all: target.allow_all,
            label: target_label(target),
            port_label: port_label(&target.port),
        }
    }
}

pub fn write_model_dump(path: &Path, model: &Model) -> anyhow::Result<()> {
    let dump = ModelDump::from_model(model);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dump)?;
    writer.flush()?;
    Ok(())
}
