//! Block explorer links for submitted transactions.

use solana_sdk::signature::Signature;
use url::Url;

use crate::config::schema::ExplorerConfig;

/// Which cluster the explorer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cluster {
    Mainnet,
    Devnet,
    Testnet,
    /// A node the explorer has to reach directly, e.g. a local validator.
    Custom(String),
    /// An explicitly configured `cluster` query value.
    Named(String),
}

impl Cluster {
    /// Infer the cluster from an RPC endpoint URL.
    pub fn from_rpc_url(rpc_url: &str) -> Self {
        // Only the host is considered; paths and queries may carry API keys.
        let host = Url::parse(rpc_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();

        match host.as_str() {
            "localhost" | "127.0.0.1" | "[::1]" | "0.0.0.0" => {
                Cluster::Custom(rpc_url.to_string())
            }
            h if h.contains("devnet") => Cluster::Devnet,
            h if h.contains("testnet") => Cluster::Testnet,
            _ => Cluster::Mainnet,
        }
    }
}

/// Builds explorer URLs for one RPC endpoint.
#[derive(Debug, Clone)]
pub struct Explorer {
    base_url: String,
    cluster: Cluster,
}

impl Explorer {
    /// Configured cluster wins; otherwise it is inferred from `rpc_url`.
    pub fn new(config: &ExplorerConfig, rpc_url: &str) -> Self {
        let cluster = match &config.cluster {
            Some(name) => Cluster::Named(name.trim().to_string()),
            None => Cluster::from_rpc_url(rpc_url),
        };
        Self {
            base_url: config.base_url.clone(),
            cluster,
        }
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// Link to a transaction.
    pub fn transaction_url(&self, signature: &Signature) -> String {
        let path = format!("{}/tx/{}", self.base_url.trim_end_matches('/'), signature);
        let mut url = match Url::parse(&path) {
            Ok(url) => url,
            // base_url is validated at load time; fall back to the bare path.
            Err(_) => return path,
        };

        {
            let mut query = url.query_pairs_mut();
            match &self.cluster {
                Cluster::Mainnet => {}
                Cluster::Devnet => {
                    query.append_pair("cluster", "devnet");
                }
                Cluster::Testnet => {
                    query.append_pair("cluster", "testnet");
                }
                Cluster::Custom(rpc_url) => {
                    query.append_pair("cluster", "custom");
                    query.append_pair("customUrl", rpc_url);
                }
                Cluster::Named(name) => {
                    query.append_pair("cluster", name);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        url.to_string()
    }
}
