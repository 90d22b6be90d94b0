// Mirror synthesis: one matched URL in, an ordered list of mirror links out.
//
// Twitter links are rewritten host-by-host onto Nitter instances. Instances
// reachable only over an overlay network (Tor, I2P, Lokinet) get a plain
// http:// scheme since they don't terminate TLS like clearnet hosts do.
// Nostr links are offered on every known web client instead.

use serde::{Deserialize, Serialize};

use super::patterns::{LinkFamily, LinkMatch};

/// Width of each half of an abbreviated onion/i2p label.
const LABEL_HALF_WIDTH: usize = 12;

/// Network overlay a mirror host is reachable over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    Clearnet,
    Onion,
    I2p,
    Lokinet,
}

impl Transport {
    /// Section order in the rendered comment.
    pub const ORDER: [Transport; 4] = [
        Transport::Clearnet,
        Transport::Onion,
        Transport::I2p,
        Transport::Lokinet,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Transport::Clearnet => "Clearnet",
            Transport::Onion => "Onion",
            Transport::I2p => "I2P",
            Transport::Lokinet => "Lokinet",
        }
    }

    pub fn is_clearnet(&self) -> bool {
        matches!(self, Transport::Clearnet)
    }

    /// Onion and I2P addresses are long opaque hashes and get abbreviated labels.
    fn abbreviates_label(&self) -> bool {
        matches!(self, Transport::Onion | Transport::I2p)
    }
}

/// A single generated mirror link. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorEndpoint {
    pub label: String,
    pub transport: Transport,
    pub url: String,
}

/// Nitter hosts per transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorHosts {
    pub clearnet: Vec<String>,
    pub onion: Vec<String>,
    pub i2p: Vec<String>,
    pub lokinet: Vec<String>,
}

impl MirrorHosts {
    /// Hosts for one transport.
    pub fn for_transport(&self, transport: Transport) -> &[String] {
        match transport {
            Transport::Clearnet => &self.clearnet,
            Transport::Onion => &self.onion,
            Transport::I2p => &self.i2p,
            Transport::Lokinet => &self.lokinet,
        }
    }
}

/// A nostr web client: note URLs are `url_prefix + note id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NostrClient {
    pub url_prefix: String,
    pub name: String,
}

impl NostrClient {
    fn new(url_prefix: &str, name: &str) -> Self {
        Self {
            url_prefix: url_prefix.to_string(),
            name: name.to_string(),
        }
    }
}

/// The client list published on nostr.com.
pub fn default_nostr_clients() -> Vec<NostrClient> {
    vec![
        NostrClient::new("https://primal.net/e/", "primal.net"),
        NostrClient::new("https://snort.social/e/", "snort.social"),
        NostrClient::new("https://nostrudel.ninja/#/n/", "nostrudel.ninja"),
        NostrClient::new("https://satellite.earth/thread/", "satellite.earth"),
        NostrClient::new("https://coracle.social/", "coracle.social"),
        NostrClient::new("https://nostter.app/", "nostter.app"),
        NostrClient::new("https://highlighter.com/a/", "highlighter.com"),
        NostrClient::new("https://iris.to/", "iris.to"),
    ]
}

/// Immutable mirror configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct MirrorSynthesizer {
    hosts: MirrorHosts,
    nostr_clients: Vec<NostrClient>,
}

impl MirrorSynthesizer {
    pub fn new(hosts: MirrorHosts, nostr_clients: Vec<NostrClient>) -> Self {
        Self {
            hosts,
            nostr_clients,
        }
    }

    /// Synthesizer with the given Nitter hosts and the default nostr clients.
    pub fn with_hosts(hosts: MirrorHosts) -> Self {
        Self::new(hosts, default_nostr_clients())
    }

    pub fn hosts(&self) -> &MirrorHosts {
        &self.hosts
    }

    /// Produce the ordered mirror list for a classified link.
    ///
    /// Output is grouped by transport in [`Transport::ORDER`], hosts in
    /// configured order within each group. Deterministic for equal input.
    pub fn synthesize(&self, link: &LinkMatch) -> Vec<MirrorEndpoint> {
        match link.family {
            LinkFamily::Twitter => self.nitter_mirrors(&link.url, &link.capture),
            LinkFamily::Nostr => self.nostr_mirrors(&link.capture),
        }
    }

    fn nitter_mirrors(&self, url: &str, origin: &str) -> Vec<MirrorEndpoint> {
        Transport::ORDER
            .iter()
            .flat_map(|&transport| {
                self.hosts
                    .for_transport(transport)
                    .iter()
                    .map(move |host| rewrite_onto(url, origin, host, transport))
            })
            .collect()
    }

    fn nostr_mirrors(&self, note_id: &str) -> Vec<MirrorEndpoint> {
        self.nostr_clients
            .iter()
            .map(|client| MirrorEndpoint {
                label: client.name.clone(),
                transport: Transport::Clearnet,
                url: format!("{}{}", client.url_prefix, note_id),
            })
            .collect()
    }
}

/// Replace the first occurrence of `origin` in `url` with `host`.
///
/// When `origin` doesn't occur in `url` the URL is returned untouched
/// (scheme included) with the host as label, rather than dropping the mirror.
fn rewrite_onto(url: &str, origin: &str, host: &str, transport: Transport) -> MirrorEndpoint {
    let label = display_label(host, transport);

    if origin.is_empty() || !url.contains(origin) {
        tracing::warn!(url, origin, host, "Origin not found in URL, leaving it unmodified");
        return MirrorEndpoint {
            label,
            transport,
            url: url.to_string(),
        };
    }

    let mut rewritten = url.replacen(origin, host, 1);
    if !transport.is_clearnet() {
        if let Some(rest) = rewritten.strip_prefix("https://") {
            rewritten = format!("http://{rest}");
        }
    }

    MirrorEndpoint {
        label,
        transport,
        url: rewritten,
    }
}

/// Label shown in the comment: onion/i2p hosts are shortened to
/// `first12..last12`, everything else is shown in full.
pub fn display_label(host: &str, transport: Transport) -> String {
    let len = host.chars().count();
    if !transport.abbreviates_label() || len <= LABEL_HALF_WIDTH * 2 {
        return host.to_string();
    }
    let head: String = host.chars().take(LABEL_HALF_WIDTH).collect();
    let tail: String = host.chars().skip(len - LABEL_HALF_WIDTH).collect();
    format!("{head}..{tail}")
}
