use crate::aggregate::aggregate;
use crate::canonical::sorted_keys;
use crate::config::RenderOptions;
use crate::ir::{Model, Target, Workload};
use crate::label::{port_label, target_label, workload_label};
use crate::policy::{NetworkPolicy, PolicyType};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const WILDCARD_PORTS: &str = "0-65535";

/// Aggregates `policies` and renders the resulting model.
pub fn render_policies(policies: &[NetworkPolicy], options: &RenderOptions) -> String {
    render(&aggregate(policies), options)
}

pub fn render(model: &Model, options: &RenderOptions) -> String {
    let mut uml = String::new();
    uml.push_str("@startuml\n");
    uml.push_str("left to right direction\n");
    if let Some(line_type) = options.line_type.as_deref().filter(|v| !v.is_empty()) {
        uml.push_str(&format!("skinparam linetype {line_type}\n"));
    }
    uml.push_str(&workloads_frame(model, options));
    if options.categories.ingress {
        uml.push_str(&ingress_frame(model));
    }
    if options.categories.egress {
        uml.push_str(&egress_frame(model));
    }
    uml.push_str("@enduml\n");
    uml
}

fn workloads_frame(model: &Model, options: &RenderOptions) -> String {
    let categories = options.categories;
    let mut uml = String::from("frame Pods {\n");
    for workload in &model.workloads {
        let visible = [PolicyType::Ingress, PolicyType::Egress]
            .into_iter()
            .any(|direction| categories.contains(direction) && !workload.targets(direction).is_empty());
        if !visible {
            continue;
        }
        uml.push_str(&format!(
            "component \"{}\" as {} {{\n",
            escape_label(&workload_label(workload)),
            workload.id
        ));
        if categories.ingress {
            for target in &workload.ingress {
                uml.push_str(&format!(
                    "    port \"{}\" as {}\n",
                    target_port_label(target),
                    ingress_port_alias(target)
                ));
            }
        }
        if categories.egress && !workload.egress.is_empty() {
            uml.push_str(&format!("    portout \" \" as {}\n", workload_portout_alias(workload)));
        }
        uml.push_str("}\n");
    }
    uml.push_str("}\n");
    uml
}

fn ingress_frame(model: &Model) -> String {
    let mut uml = String::from("frame Ingress {\n");
    let mut seen: HashSet<&str> = HashSet::new();
    for workload in &model.workloads {
        for target in &workload.ingress {
            if !seen.insert(&target.peer_id) {
                continue;
            }
            uml.push_str(&format!(
                "component \"{}\" as {}_i {{\n    portout \" \" as {}\n}}\n",
                escape_label(&target_label(target)),
                target.peer_id,
                ingress_peer_alias(target)
            ));
        }
    }
    uml.push_str("}\n");
    for workload in &model.workloads {
        for target in &workload.ingress {
            uml.push_str(&edge(&ingress_peer_alias(target), &ingress_port_alias(target), target));
        }
    }
    uml
}

fn egress_frame(model: &Model) -> String {
    let mut components: HashMap<String, String> = HashMap::new();
    for workload in &model.workloads {
        for target in &workload.egress {
            let component = components.entry(target.peer_id.clone()).or_insert_with(|| {
                format!(
                    "component \"{}\" as {}_e {{\n",
                    escape_label(&target_label(target)),
                    target.id
                )
            });
            component.push_str(&format!(
                "    port \"{}\" as {}\n",
                target_port_label(target),
                egress_port_alias(target)
            ));
        }
    }

    let mut uml = String::from("frame Egress {\n");
    for peer_id in sorted_keys(&components) {
        uml.push_str(&components[peer_id]);
        uml.push_str("}\n");
    }
    uml.push_str("}\n");
    for workload in &model.workloads {
        for target in &workload.egress {
            uml.push_str(&edge(&workload_portout_alias(workload), &egress_port_alias(target), target));
        }
    }
    uml
}

fn edge(from: &str, to: &str, target: &Target) -> String {
    let color = if target.block_all { "red" } else { "green" };
    format!("{from} --down[#{color}]--> {to}\n")
}

fn target_port_label(target: &Target) -> String {
    if target.is_wildcard() {
        return WILDCARD_PORTS.to_string();
    }
    port_label(&target.port)
}

fn ingress_port_alias(target: &Target) -> String {
    format!("{}port", target.id)
}

fn ingress_peer_alias(target: &Target) -> String {
    format!("{}ingressportout", target.peer_id)
}

fn egress_port_alias(target: &Target) -> String {
    format!("{}egressport", target.id)
}

fn workload_portout_alias(workload: &Workload) -> String {
    format!("{}portout", workload.id)
}

/// PlantUML wants `\l` (left-aligned line break) instead of raw newlines.
fn escape_label(label: &str) -> String {
    label.replace('\n', "\\l")
}

pub fn write_output(uml: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, uml)?;
        }
        _ => {
            print!("{}", uml);
        }
    }
    Ok(())
}
