//! Transport selection from host capabilities.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::debug;

use crate::http::HttpClient;
use crate::post::PostTransport;
use crate::script::{ScriptHost, ScriptTransport};
use crate::transport::Transport;

/// What the host environment can do, probed once by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostCapabilities {
    /// Credentialed cross-origin requests are supported.
    pub cors_credentials: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            cors_credentials: true,
        }
    }
}

/// Pick the delivery strategy for a host.
///
/// POST when credentialed cross-origin requests work, script tags otherwise.
pub fn select(
    capabilities: HostCapabilities,
    http: Arc<dyn HttpClient>,
    script_host: Arc<dyn ScriptHost>,
    runtime: Handle,
) -> Arc<dyn Transport> {
    if capabilities.cors_credentials {
        debug!("selected POST transport");
        Arc::new(PostTransport::new(http, runtime))
    } else {
        debug!("selected script transport");
        Arc::new(ScriptTransport::new(script_host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ReqwestClient;
    use crate::script::MemoryDocument;
    use crate::transport::TransportKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_select_by_capability() {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(Duration::from_secs(1)).unwrap());
        let document: Arc<dyn ScriptHost> = Arc::new(MemoryDocument::new());

        let post = select(
            HostCapabilities { cors_credentials: true },
            http.clone(),
            document.clone(),
            Handle::current(),
        );
        assert_eq!(post.kind(), TransportKind::Post);

        let script = select(
            HostCapabilities { cors_credentials: false },
            http,
            document,
            Handle::current(),
        );
        assert_eq!(script.kind(), TransportKind::Script);
    }

    #[test]
    fn test_capabilities_deserialize_default() {
        let caps: HostCapabilities = serde_json::from_str("{}").unwrap();
        assert!(caps.cors_credentials);
    }
}
