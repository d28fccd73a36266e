//! Multi-line text shown inside diagram nodes.

use crate::ir::{Target, Workload};
use crate::policy::{IpBlock, LabelSelector, NetworkPolicyPeer, NetworkPolicyPort};

const INDENT: &str = "    ";

pub fn workload_label(workload: &Workload) -> String {
    let mut label = String::new();
    label.push_str(&format!("Name: {}\n", workload.names.join(", ")));
    label.push_str(&format!("Namespace: {}\n", workload.namespace));
    label.push_str(&selector_label("", &workload.selector));
    format!("{}\n", label.trim())
}

pub fn target_label(target: &Target) -> String {
    if target.is_wildcard() {
        return "ALL".to_string();
    }
    // PlantUML sizes the box from the line count, so long except lists need
    // extra trailing newlines to fit.
    let mut newlines = 1;
    if let Some(block) = &target.peer.ip_block {
        newlines += block.except.len() / 2;
    }
    format!("{}{}", peer_label(&target.peer).trim(), "\n".repeat(newlines))
}

pub fn port_label(port: &NetworkPolicyPort) -> String {
    match (&port.protocol, &port.port, port.end_port) {
        (Some(protocol), Some(value), Some(end_port)) => format!("{value}-{end_port} ({protocol})"),
        (Some(protocol), Some(value), None) => format!("{value} ({protocol})"),
        (None, Some(value), Some(end_port)) => format!("{value}-{end_port}"),
        (_, Some(value), _) => value.to_string(),
        _ => "0-65535".to_string(),
    }
}

pub fn selector_label(indent: &str, selector: &LabelSelector) -> String {
    if selector.is_empty() {
        return format!("{indent}All");
    }
    let mut label = String::new();
    if !selector.match_labels.is_empty() {
        label.push_str(indent);
        label.push_str("Match Labels:");
        for (key, value) in &selector.match_labels {
            label.push_str(&format!("\n{indent}{INDENT}{key}: {value}"));
        }
    }
    if !selector.match_expressions.is_empty() {
        if !selector.match_labels.is_empty() {
            label.push('\n');
        }
        label.push_str(indent);
        label.push_str("Match Expressions:");
        for expr in &selector.match_expressions {
            label.push_str(&format!(
                "\n{indent}{INDENT}{} {} {}",
                expr.key,
                expr.operator,
                expr.values.join(", ")
            ));
        }
    }
    label
}

pub fn peer_label(peer: &NetworkPolicyPeer) -> String {
    let mut sections = Vec::new();
    if let Some(selector) = &peer.namespace_selector {
        sections.push(format!("Namespace:\n{}", selector_label(INDENT, selector)));
    }
    if let Some(selector) = &peer.pod_selector {
        sections.push(format!("Pod:\n{}", selector_label(INDENT, selector)));
    }
    if let Some(block) = &peer.ip_block {
        sections.push(format!("IPBlock:\n{}", ip_block_label(block)));
    }
    sections.join("\n")
}

pub fn ip_block_label(block: &IpBlock) -> String {
    let mut label = format!("{INDENT}{}", block.cidr);
    if !block.except.is_empty() {
        let sep = format!(",\n{INDENT}{INDENT}{INDENT}");
        label.push_str(&format!(
            "\n{INDENT}{INDENT}except:\n{INDENT}{INDENT}{INDENT}{}",
            block.except.join(&sep)
        ));
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{LabelSelectorRequirement, PortValue};

    fn selector(pairs: &[(&str, &str)]) -> LabelSelector {
        LabelSelector {
            match_labels: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            match_expressions: Vec::new(),
        }
    }

    fn ip_target(except: &[&str]) -> Target {
        Target {
            id: "t".to_string(),
            peer_id: "t".to_string(),
            peer: NetworkPolicyPeer {
                ip_block: Some(IpBlock {
                    cidr: "10.0.0.0/8".to_string(),
                    except: except.iter().map(|e| e.to_string()).collect(),
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn workload_label_lists_names_namespace_and_selector() {
        let mut workload = Workload::new("x".to_string(), "a", "shop", &selector(&[("tier", "web"), ("app", "cart")]));
        workload.names.push("b".to_string());
        assert_eq!(
            workload_label(&workload),
            "Name: a, b\nNamespace: shop\nMatch Labels:\n    app: cart\n    tier: web\n"
        );
    }

    #[test]
    fn empty_selector_renders_all() {
        let workload = Workload::new("x".to_string(), "deny", "default", &LabelSelector::default());
        assert_eq!(workload_label(&workload), "Name: deny\nNamespace: default\nAll\n");
        assert_eq!(selector_label("    ", &LabelSelector::default()), "    All");
    }

    #[test]
    fn selector_with_labels_and_expressions() {
        let mut sel = selector(&[("app", "db")]);
        sel.match_expressions.push(LabelSelectorRequirement {
            key: "env".to_string(),
            operator: "NotIn".to_string(),
            values: vec!["dev".to_string(), "test".to_string()],
        });
        assert_eq!(
            selector_label("  ", &sel),
            "  Match Labels:\n      app: db\n  Match Expressions:\n      env NotIn dev, test"
        );
    }

    #[test]
    fn wildcard_targets_read_all() {
        let block = Target::block_all("x".to_string(), "p");
        let allow = Target::allow_all("y".to_string(), "p");
        assert_eq!(target_label(&block), "ALL");
        assert_eq!(target_label(&allow), "ALL");
    }

    #[test]
    fn peer_sections_in_namespace_pod_ipblock_order() {
        let target = Target {
            peer: NetworkPolicyPeer {
                pod_selector: Some(selector(&[("app", "api")])),
                namespace_selector: Some(LabelSelector::default()),
                ip_block: None,
            },
            ..Default::default()
        };
        assert_eq!(
            target_label(&target),
            "Namespace:\n    All\nPod:\n    Match Labels:\n        app: api\n"
        );
    }

    #[test]
    fn ip_block_exceptions_add_trailing_newlines() {
        assert_eq!(target_label(&ip_target(&[])), "IPBlock:\n    10.0.0.0/8\n");
        assert_eq!(
            target_label(&ip_target(&["10.1.0.0/16"])),
            "IPBlock:\n    10.0.0.0/8\n        except:\n            10.1.0.0/16\n"
        );
        let label = target_label(&ip_target(&["10.1.0.0/16", "10.2.0.0/16", "10.3.0.0/16", "10.4.0.0/16"]));
        assert!(label.ends_with("10.4.0.0/16\n\n\n"));
        assert!(label.contains("10.1.0.0/16,\n            10.2.0.0/16"));
    }

    #[test]
    fn port_label_precedence() {
        let port = |protocol: Option<&str>, value: Option<PortValue>, end_port: Option<i32>| NetworkPolicyPort {
            protocol: protocol.map(str::to_string),
            port: value,
            end_port,
        };
        assert_eq!(port_label(&port(Some("TCP"), Some(PortValue::Number(8000)), Some(8080))), "8000-8080 (TCP)");
        assert_eq!(port_label(&port(Some("UDP"), Some(PortValue::Number(53)), None)), "53 (UDP)");
        assert_eq!(port_label(&port(None, Some(PortValue::Number(8000)), Some(8080))), "8000-8080");
        assert_eq!(port_label(&port(None, Some(PortValue::Name("http".to_string())), None)), "http");
        assert_eq!(port_label(&port(Some("TCP"), None, None)), "0-65535");
        assert_eq!(port_label(&NetworkPolicyPort::default()), "0-65535");
    }
}
