// Comment composer: renders a mirror list into the markdown reply body.

use super::mirrors::{MirrorEndpoint, Transport};
use super::patterns::LinkFamily;

const LINK_DELIMITER: &str = " | ";

const NITTER_TITLE: &str = "**Twitter2Nitter**";
const NITTER_FOOTER: &str = "_Nitter is a free and open source alternative Twitter front-end \
    focused on privacy and performance. \
    Click [here](https://github.com/zedeus/nitter) for more information._";

const NOSTR_TITLE: &str = "**Nostr Client Picker**";
const NOSTR_FOOTER: &str = "_Nostr is an open protocol, so any client can show this note. \
    Click [here](https://nostr.com) for more information._";

/// Render the comment body for a family's mirror list.
///
/// Title, then one paragraph per transport group (Twitter) or a single
/// line of clients (Nostr), then the family's footer. Empty transport
/// groups are left out.
pub fn compose(family: LinkFamily, endpoints: &[MirrorEndpoint]) -> String {
    let mut sections: Vec<String> = Vec::new();

    match family {
        LinkFamily::Twitter => {
            sections.push(NITTER_TITLE.to_string());
            for transport in Transport::ORDER {
                let group: Vec<&MirrorEndpoint> = endpoints
                    .iter()
                    .filter(|e| e.transport == transport)
                    .collect();
                if group.is_empty() {
                    continue;
                }
                sections.push(format!(
                    "{}: {}",
                    transport.display_name(),
                    link_line(group)
                ));
            }
            sections.push(NITTER_FOOTER.to_string());
        }
        LinkFamily::Nostr => {
            sections.push(NOSTR_TITLE.to_string());
            if !endpoints.is_empty() {
                sections.push(link_line(endpoints.iter()));
            }
            sections.push(NOSTR_FOOTER.to_string());
        }
    }

    sections.join("\n\n")
}

fn link_line<'a>(endpoints: impl IntoIterator<Item = &'a MirrorEndpoint>) -> String {
    endpoints
        .into_iter()
        .map(|e| format!("[{}]({})", e.label, e.url))
        .collect::<Vec<_>>()
        .join(LINK_DELIMITER)
}
