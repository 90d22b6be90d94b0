// Link handling: classify item URLs and turn them into mirror-link comments.
//
// Three pure stages, no I/O anywhere in here:
//   patterns   -> which family does this URL belong to, and what did it capture?
//   mirrors    -> rewrite the captured URL onto every configured mirror host
//   compose    -> render the mirror list into the markdown comment body

pub mod compose;
pub mod mirrors;
pub mod patterns;

pub use compose::compose;
pub use mirrors::{MirrorEndpoint, MirrorHosts, MirrorSynthesizer, NostrClient, Transport};
pub use patterns::{LinkFamily, LinkMatch, PatternRegistry};
