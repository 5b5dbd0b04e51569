//! Outbound proxy URL templates
//!
//! These URLs are a compatibility contract with the third-party services and
//! must be reproduced byte for byte.

use crate::query::encode_component;
use serde::Serialize;

/// URL template of one proxy service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyTemplate {
    Rammerhead,
    Scramjet,
    Wisp,
    CroxyProxy,
}

impl ProxyTemplate {
    /// Template for an engine id; anything unrecognised uses CroxyProxy
    pub fn for_engine(engine_id: &str) -> Self {
        match engine_id {
            "rammerhead" => Self::Rammerhead,
            "scramjet" => Self::Scramjet,
            "wisp" => Self::Wisp,
            _ => Self::CroxyProxy,
        }
    }

    /// Prefix the encoded target is appended to
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Rammerhead => "https://browser.rammerhead.org/#",
            Self::Scramjet => "https://scramjet.org/browse.php?u=",
            Self::Wisp => "https://wisp.org/browse.php?u=",
            Self::CroxyProxy => "https://www.croxyproxy.com/start.php?b=0&u=",
        }
    }

    /// Fill the template with an already encoded target
    pub fn fill(&self, encoded_target: &str) -> String {
        format!("{}{}", self.prefix(), encoded_target)
    }
}

/// Build the proxy URL that opens `target` through `engine_id`
pub fn build_proxy_url(engine_id: &str, target: &str) -> String {
    ProxyTemplate::for_engine(engine_id).fill(&encode_component(target))
}
