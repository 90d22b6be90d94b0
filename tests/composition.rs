// Composition tests: classify -> synthesize -> compose, end to end.
//
// No network, no ledger. These pin the exact comment bodies the bot posts.

use mirrorbot::engine::plan;
use mirrorbot::links::mirrors::default_nostr_clients;
use mirrorbot::links::{
    compose, LinkFamily, MirrorHosts, MirrorSynthesizer, PatternRegistry, Transport,
};

const ONION: &str = "abcdefghijklmnopqrstuvwxyz234567.onion";

fn clearnet_only() -> MirrorSynthesizer {
    MirrorSynthesizer::with_hosts(MirrorHosts {
        clearnet: vec!["nitter.example.org".into()],
        ..Default::default()
    })
}

fn body_for(synthesizer: &MirrorSynthesizer, url: &str) -> String {
    let registry = PatternRegistry::new().unwrap();
    let link = registry.classify(url).expect("url should classify");
    compose(link.family, &synthesizer.synthesize(&link))
}

// ============================================================
// Twitter -> Nitter
// ============================================================

#[test]
fn twitter_link_becomes_single_clearnet_mirror() {
    let body = body_for(&clearnet_only(), "https://twitter.com/jack/status/20");

    let sections: Vec<&str> = body.split("\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0], "**Twitter2Nitter**");
    assert_eq!(
        sections[1],
        "Clearnet: [nitter.example.org](https://nitter.example.org/jack/status/20)"
    );
    assert!(sections[2].contains("github.com/zedeus/nitter"));
}

#[test]
fn x_dot_com_and_www_prefix_rewrite_the_whole_host() {
    let synth = clearnet_only();
    for url in [
        "https://x.com/jack/status/20",
        "https://www.twitter.com/jack/status/20",
        "twitter.com/jack/status/20",
    ] {
        let body = body_for(&synth, url);
        assert!(
            body.contains("nitter.example.org/jack/status/20)"),
            "{url} produced {body}"
        );
        assert!(!body.contains("twitter.com/jack"), "{url} kept the origin");
        assert!(!body.contains("x.com/jack"), "{url} kept the origin");
    }
}

#[test]
fn onion_mirror_uses_plain_scheme_and_short_label() {
    let synth = MirrorSynthesizer::with_hosts(MirrorHosts {
        onion: vec![ONION.into()],
        ..Default::default()
    });
    let body = body_for(&synth, "https://twitter.com/jack/status/20");

    assert!(body.contains(&format!("(http://{ONION}/jack/status/20)")));
    assert!(!body.contains("https://abcdefghijkl"));
    assert!(body.contains("Onion: [abcdefghijkl..234567.onion]"));
    assert!(!body.contains("Clearnet:"), "empty groups are left out");
}

#[test]
fn transport_groups_keep_fixed_order() {
    let synth = MirrorSynthesizer::with_hosts(MirrorHosts {
        clearnet: vec!["a.example".into(), "b.example".into()],
        onion: vec![ONION.into()],
        i2p: vec!["nitter.i2p".into()],
        lokinet: vec!["nitter.loki".into()],
    });
    let body = body_for(&synth, "https://twitter.com/jack/status/20");

    let clearnet = body.find("Clearnet:").unwrap();
    let onion = body.find("Onion:").unwrap();
    let i2p = body.find("I2P:").unwrap();
    let lokinet = body.find("Lokinet:").unwrap();
    assert!(clearnet < onion && onion < i2p && i2p < lokinet);

    assert!(body.contains(
        "Clearnet: [a.example](https://a.example/jack/status/20) | \
         [b.example](https://b.example/jack/status/20)"
    ));
}

#[test]
fn synthesis_is_deterministic() {
    let synth = MirrorSynthesizer::with_hosts(MirrorHosts {
        clearnet: vec!["a.example".into(), "b.example".into()],
        onion: vec![ONION.into()],
        ..Default::default()
    });
    let url = "https://twitter.com/jack/status/20";
    assert_eq!(body_for(&synth, url), body_for(&synth, url));
}

// ============================================================
// Nostr -> client picker
// ============================================================

#[test]
fn nostr_note_lists_every_client() {
    let note = "note1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqsk8phq";
    let body = body_for(&clearnet_only(), &format!("https://primal.net/e/{note}"));

    assert!(body.starts_with("**Nostr Client Picker**\n\n"));
    for client in default_nostr_clients() {
        let link = format!("[{}]({}{note})", client.name, client.url_prefix);
        assert!(body.contains(&link), "missing {link}");
    }
    assert!(body.contains("nostr.com"));
}

#[test]
fn nostr_clients_ignore_nitter_hosts() {
    let synth = MirrorSynthesizer::with_hosts(MirrorHosts {
        clearnet: vec!["nitter.example.org".into()],
        onion: vec![ONION.into()],
        ..Default::default()
    });
    let registry = PatternRegistry::new().unwrap();
    let link = registry.classify("https://iris.to/note1abc").unwrap();
    let endpoints = synth.synthesize(&link);

    assert_eq!(endpoints.len(), default_nostr_clients().len());
    assert!(endpoints.iter().all(|e| e.transport == Transport::Clearnet));
    assert!(endpoints.iter().all(|e| e.url.ends_with("note1abc")));
}

// ============================================================
// Planning (what `check` prints)
// ============================================================

#[test]
fn plan_is_empty_for_unrelated_links() {
    let registry = PatternRegistry::new().unwrap();
    let synth = clearnet_only();
    assert!(plan(&registry, &synth, "https://example.com/post").is_empty());
    assert!(plan(&registry, &synth, "").is_empty());
    assert!(plan(&registry, &synth, "https://nottwitter.com/jack").is_empty());
}

#[test]
fn plan_matches_render_for_each_family() {
    let registry = PatternRegistry::new().unwrap();
    let synth = clearnet_only();

    let planned = plan(&registry, &synth, "https://x.com/jack/status/20");
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].link.family, LinkFamily::Twitter);
    assert_eq!(
        planned[0].body,
        body_for(&synth, "https://x.com/jack/status/20")
    );
}
