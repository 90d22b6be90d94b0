// Pattern registry: ordered (regex -> family) rules for item URLs.
//
// Patterns are anchored at the start of the URL (optional scheme, optional
// "www."), so classification is purely syntactic. An item may match more
// than one family; each match is reacted to independently.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The supported link families. Each owns a match pattern and a mirror strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFamily {
    /// twitter.com / x.com links, mirrored onto Nitter instances
    Twitter,
    /// nostr web-client note links, offered across other nostr clients
    Nostr,
}

impl LinkFamily {
    pub const ALL: [LinkFamily; 2] = [LinkFamily::Twitter, LinkFamily::Nostr];

    /// Stable name used as the ledger key column.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkFamily::Twitter => "twitter",
            LinkFamily::Nostr => "nostr",
        }
    }
}

impl fmt::Display for LinkFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "twitter" => Ok(LinkFamily::Twitter),
            "nostr" => Ok(LinkFamily::Nostr),
            other => anyhow::bail!("unknown link family: {other}"),
        }
    }
}

/// A successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub family: LinkFamily,
    /// The full URL that matched.
    pub url: String,
    /// The family's capture group: the origin host for Twitter, the
    /// note identifier for Nostr. Always a literal substring of `url`.
    pub capture: String,
}

const TWITTER_PATTERN: &str = r"^(?:https?://)?((www\.)?(twitter|x)\.com)/";

// Each alternative carries the client's own path prefix for note pages.
const NOSTR_PATTERN: &str = concat!(
    r"^(?:https?://)?(?:www\.)?",
    r"(?:",
    r"primal\.net/(?:e/)?",
    r"|snort\.social/(?:e/)?",
    r"|iris\.to/",
    r"|highlighter\.com/(?:a/)?",
    r"|nostter\.app/",
    r"|coracle\.social/",
    r"|satellite\.earth/",
    r"|nostrudel\.ninja/(?:#/n/)?",
    r")",
    r"((note|nevent)[a-zA-Z0-9]+)$",
);

struct Rule {
    family: LinkFamily,
    regex: Regex,
}

/// Ordered set of classification rules. Built once at startup.
pub struct PatternRegistry {
    rules: Vec<Rule>,
}

impl PatternRegistry {
    /// Build the registry with every supported family, in reaction order.
    pub fn new() -> anyhow::Result<Self> {
        let rules = vec![
            Rule {
                family: LinkFamily::Twitter,
                regex: Regex::new(TWITTER_PATTERN)?,
            },
            Rule {
                family: LinkFamily::Nostr,
                regex: Regex::new(NOSTR_PATTERN)?,
            },
        ];
        Ok(Self { rules })
    }

    /// Families in the order they are evaluated.
    pub fn families(&self) -> impl Iterator<Item = LinkFamily> + '_ {
        self.rules.iter().map(|r| r.family)
    }

    /// First family whose pattern matches `url`.
    pub fn classify(&self, url: &str) -> Option<LinkMatch> {
        self.rules.iter().find_map(|rule| apply(rule, url))
    }

    /// Every family whose pattern matches `url`, in registry order.
    pub fn classify_all(&self, url: &str) -> Vec<LinkMatch> {
        self.rules.iter().filter_map(|rule| apply(rule, url)).collect()
    }

    /// Match `url` against one specific family.
    pub fn match_family(&self, family: LinkFamily, url: &str) -> Option<LinkMatch> {
        self.rules
            .iter()
            .filter(|r| r.family == family)
            .find_map(|rule| apply(rule, url))
    }
}

fn apply(rule: &Rule, url: &str) -> Option<LinkMatch> {
    let caps = rule.regex.captures(url)?;
    let capture = caps.get(1)?.as_str().to_string();
    Some(LinkMatch {
        family: rule.family,
        url: url.to_string(),
        capture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PatternRegistry {
        PatternRegistry::new().unwrap()
    }

    #[test]
    fn twitter_variants_capture_origin() {
        let reg = registry();
        let cases = [
            ("https://twitter.com/alice/status/123", "twitter.com"),
            ("http://www.twitter.com/alice", "www.twitter.com"),
            ("https://x.com/bob/status/9", "x.com"),
            ("www.x.com/bob", "www.x.com"),
            ("twitter.com/carol", "twitter.com"),
        ];
        for (url, origin) in cases {
            let m = reg.classify(url).unwrap_or_else(|| panic!("{url} should match"));
            assert_eq!(m.family, LinkFamily::Twitter);
            assert_eq!(m.capture, origin);
            assert!(url.contains(&m.capture));
        }
    }

    #[test]
    fn twitter_rejects_lookalikes() {
        let reg = registry();
        for url in [
            "https://nottwitter.com/alice",
            "https://twitter.com.evil.org/alice",
            "https://example.org/?u=https://twitter.com/alice",
            "https://twitter.com",
            "ftp://twitter.com/alice",
        ] {
            assert!(
                reg.match_family(LinkFamily::Twitter, url).is_none(),
                "{url} should not match"
            );
        }
    }

    #[test]
    fn nostr_clients_capture_note_id() {
        let reg = registry();
        let note = "note1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";
        for prefix in [
            "https://primal.net/e/",
            "https://primal.net/",
            "https://snort.social/e/",
            "https://iris.to/",
            "https://highlighter.com/a/",
            "https://nostter.app/",
            "https://coracle.social/",
            "https://satellite.earth/",
            "https://nostrudel.ninja/#/n/",
            "www.snort.social/",
        ] {
            let url = format!("{prefix}{note}");
            let m = reg.classify(&url).unwrap_or_else(|| panic!("{url} should match"));
            assert_eq!(m.family, LinkFamily::Nostr);
            assert_eq!(m.capture, note);
        }
    }

    #[test]
    fn nostr_accepts_nevent_and_requires_end_of_url() {
        let reg = registry();
        let m = reg.classify("https://primal.net/e/nevent1abc123").unwrap();
        assert_eq!(m.capture, "nevent1abc123");

        assert!(reg.classify("https://primal.net/e/note1abc?ref=x").is_none());
        assert!(reg.classify("https://primal.net/p/npub1abc").is_none());
    }

    #[test]
    fn unrelated_urls_do_not_classify() {
        let reg = registry();
        assert!(reg.classify("https://stacker.news/items/1").is_none());
        assert!(reg.classify("").is_none());
        assert!(reg.classify_all("https://example.com").is_empty());
    }

    #[test]
    fn family_names_roundtrip() {
        for family in LinkFamily::ALL {
            assert_eq!(family.as_str().parse::<LinkFamily>().unwrap(), family);
        }
        assert!("mastodon".parse::<LinkFamily>().is_err());
    }

    #[test]
    fn families_in_reaction_order() {
        let order: Vec<_> = registry().families().collect();
        assert_eq!(order, vec![LinkFamily::Twitter, LinkFamily::Nostr]);
    }
}
