use crate::error::RetrievalError;
use crate::policy::NetworkPolicy;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info};

/// Where policy records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    AllNamespaces,
    Namespaces(Vec<String>),
    /// Glob patterns of YAML or JSON manifests.
    Files(Vec<String>),
}

impl Scope {
    /// Files win over namespaces; with neither, every namespace is read.
    pub fn from_args(namespaces: Vec<String>, files: Vec<String>) -> Self {
        if !files.is_empty() {
            Scope::Files(files)
        } else if !namespaces.is_empty() {
            Scope::Namespaces(namespaces)
        } else {
            Scope::AllNamespaces
        }
    }
}

pub fn fetch_policies(scope: &Scope) -> Result<Vec<NetworkPolicy>, RetrievalError> {
    match scope {
        Scope::Files(patterns) => read_files(patterns),
        Scope::AllNamespaces => fetch_cluster(&[]),
        Scope::Namespaces(namespaces) => fetch_cluster(namespaces),
    }
}

pub fn read_files(patterns: &[String]) -> Result<Vec<NetworkPolicy>, RetrievalError> {
    let mut policies = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;
            let contents = std::fs::read_to_string(&path).map_err(|source| RetrievalError::Read {
                path: path.clone(),
                source,
            })?;
            let decoded = decode_documents(&contents).map_err(|source| RetrievalError::Decode {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), policies = decoded.len(), "read policy file");
            policies.extend(decoded);
        }
    }
    Ok(policies)
}

/// Decodes every NetworkPolicy in a (possibly multi-document) YAML or JSON
/// stream.
pub fn decode_documents(contents: &str) -> Result<Vec<NetworkPolicy>, serde_yaml::Error> {
    let mut policies = Vec::new();
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = Value::deserialize(document)?;
        collect_policies(value, None, &mut policies)?;
    }
    Ok(policies)
}

fn collect_policies(
    value: Value,
    implied_kind: Option<&str>,
    policies: &mut Vec<NetworkPolicy>,
) -> Result<(), serde_yaml::Error> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .or(implied_kind)
        .unwrap_or_default()
        .to_string();
    match kind.as_str() {
        "" => debug!("skipping document without kind"),
        "NetworkPolicy" => policies.push(serde_yaml::from_value(value)?),
        "List" | "NetworkPolicyList" => {
            // API list responses omit the kind of their items.
            let item_kind = (kind == "NetworkPolicyList").then_some("NetworkPolicy");
            let items = value.get("items").and_then(Value::as_sequence).cloned().unwrap_or_default();
            for item in items {
                collect_policies(item, item_kind, policies)?;
            }
        }
        other => debug!(kind = other, "skipping document"),
    }
    Ok(())
}

#[cfg(feature = "cluster")]
fn fetch_cluster(namespaces: &[String]) -> Result<Vec<NetworkPolicy>, RetrievalError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(RetrievalError::Runtime)?;
    runtime.block_on(cluster::list_policies(namespaces))
}

#[cfg(not(feature = "cluster"))]
fn fetch_cluster(_namespaces: &[String]) -> Result<Vec<NetworkPolicy>, RetrievalError> {
    Err(RetrievalError::ClusterUnavailable)
}

#[cfg(feature = "cluster")]
mod cluster {
    use super::*;
    use k8s_openapi::api::networking::v1::NetworkPolicy as ApiNetworkPolicy;
    use kube::api::{Api, ListParams};
    use kube::Client;

    /// Lists policies through the default client configuration, which honours
    /// `KUBECONFIG` and in-cluster service accounts.
    pub(super) async fn list_policies(namespaces: &[String]) -> Result<Vec<NetworkPolicy>, RetrievalError> {
        let client = Client::try_default().await?;
        let params = ListParams::default();
        let mut items = Vec::new();
        if namespaces.is_empty() {
            let api: Api<ApiNetworkPolicy> = Api::all(client);
            let list = api.list(&params).await?;
            info!(policies = list.items.len(), "listed network policies in all namespaces");
            items.extend(list.items);
        } else {
            for namespace in namespaces {
                let api: Api<ApiNetworkPolicy> = Api::namespaced(client.clone(), namespace);
                let list = api.list(&params).await?;
                info!(namespace = %namespace, policies = list.items.len(), "listed network policies");
                items.extend(list.items);
            }
        }
        items.into_iter().map(convert).collect()
    }

    fn convert(policy: ApiNetworkPolicy) -> Result<NetworkPolicy, RetrievalError> {
        let value = serde_json::to_value(&policy)?;
        Ok(serde_json::from_value(value)?)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::policy::{PolicyType, PortValue};

        #[test]
        fn converts_api_objects() {
            let api: ApiNetworkPolicy = serde_json::from_value(serde_json::json!({
                "apiVersion": "networking.k8s.io/v1",
                "kind": "NetworkPolicy",
                "metadata": {"name": "web", "namespace": "shop", "uid": "1234"},
                "spec": {
                    "podSelector": {"matchLabels": {"app": "web"}},
                    "policyTypes": ["Ingress"],
                    "ingress": [{"ports": [{"protocol": "TCP", "port": 80}]}]
                }
            }))
            .unwrap();
            let policy = convert(api).unwrap();
            assert_eq!(policy.metadata.name, "web");
            assert_eq!(policy.metadata.namespace, "shop");
            assert_eq!(policy.spec.policy_types, vec![PolicyType::Ingress]);
            assert_eq!(policy.spec.ingress[0].ports[0].port, Some(PortValue::Number(80)));
        }
    }
}
