//! Deployment routes, contract bytecode and the displayed result.

use serde::Serialize;

use crate::core::Address;

use super::error::DeployError;

pub const EXPLORER_TX_URL: &str = "https://opscan.io/tx/";
pub const PENDING_ADDRESS: &str = "Pending...";

/// Compiled contract bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode(Vec<u8>);

impl Bytecode {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// A user-supplied file. Only `.wasm` names are accepted.
    pub fn from_upload(file_name: &str, bytes: Vec<u8>) -> Result<Self, DeployError> {
        if !file_name.to_ascii_lowercase().ends_with(".wasm") {
            return Err(DeployError::InvalidUpload);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the default template artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    Path(std::path::PathBuf),
    Url(String),
    Bytes(Vec<u8>),
}

impl ArtifactLocation {
    /// `http(s)://` becomes a URL, anything else a file path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ArtifactLocation::Url(value.to_string())
        } else {
            ArtifactLocation::Path(value.into())
        }
    }

    pub async fn load(&self) -> Result<Bytecode, DeployError> {
        match self {
            ArtifactLocation::Bytes(bytes) if !bytes.is_empty() => Ok(Bytecode::new(bytes.clone())),
            ArtifactLocation::Bytes(_) => Err(DeployError::ArtifactMissing),
            #[cfg(feature = "native")]
            ArtifactLocation::Path(path) => match tokio::fs::read(path).await {
                Ok(bytes) if !bytes.is_empty() => Ok(Bytecode::new(bytes)),
                Ok(_) => Err(DeployError::ArtifactMissing),
                Err(e) => {
                    tracing::warn!("Artifact {} unreadable: {}", path.display(), e);
                    Err(DeployError::ArtifactMissing)
                }
            },
            #[cfg(feature = "native")]
            ArtifactLocation::Url(url) => {
                let response = reqwest::get(url.as_str()).await.map_err(|e| {
                    tracing::warn!("Artifact fetch {} failed: {}", url, e);
                    DeployError::ArtifactMissing
                })?;
                if !response.status().is_success() {
                    tracing::warn!("Artifact fetch {} returned {}", url, response.status());
                    return Err(DeployError::ArtifactMissing);
                }
                let bytes = response.bytes().await.map_err(|_| DeployError::ArtifactMissing)?;
                Ok(Bytecode::new(bytes.to_vec()))
            }
            #[cfg(not(feature = "native"))]
            ArtifactLocation::Path(_) | ArtifactLocation::Url(_) => Err(DeployError::ArtifactMissing),
        }
    }
}

/// How the token gets on chain. Chosen once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentRoute {
    /// Call `deployToken` on an already-deployed factory.
    Factory { factory: String, sender: Address },
    /// Publish the template bytecode with the constructor calldata. The
    /// bytecode is the upload when present, else the default artifact,
    /// loaded only once the wallet checks have passed.
    Direct { upload: Option<Bytecode> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Factory,
    Direct,
}

impl DeploymentRoute {
    pub fn kind(&self) -> RouteKind {
        match self {
            DeploymentRoute::Factory { .. } => RouteKind::Factory,
            DeploymentRoute::Direct { .. } => RouteKind::Direct,
        }
    }
}

/// Outcome of a successful attempt. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    pub contract_address: Option<String>,
    pub funding_txid: Option<String>,
    pub reveal_txid: String,
    pub route: RouteKind,
}

impl DeploymentResult {
    pub fn contract_display(&self) -> &str {
        self.contract_address.as_deref().unwrap_or(PENDING_ADDRESS)
    }

    /// `first10...last8` of the reveal txid.
    pub fn tx_display(&self) -> String {
        let chars: Vec<char> = self.reveal_txid.chars().collect();
        if chars.len() <= 18 {
            return self.reveal_txid.clone();
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", head, tail)
    }

    pub fn explorer_url(&self) -> String {
        format!("{}{}", EXPLORER_TX_URL, self.reveal_txid)
    }
}
