//! Content renderer: note text to display markup
//!
//! Pure string transform. The source is HTML-escaped first, then recognized
//! tokens are replaced with presentational spans. Contact substitution must
//! run before tag and wiki-link substitution so a contact name cannot be
//! re-matched by the later passes.

use crate::contacts::Contact;
use regex::{Captures, Regex};
use tracing::warn;

const CONTACT_TOKEN: &str = r"@([A-Z][a-z]+(?:[ \t][A-Z]?[a-z]+)?)";
const TAG_TOKEN: &str = r"#([A-Za-z0-9_-]+)";
const WIKI_TOKEN: &str = r"\[\[([^\]]+)\]\]";

/// Escape `&`, `<`, `>` for HTML embedding
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, pattern, "failed to compile render regex");
            None
        }
    }
}

/// Render note text to HTML-like markup, resolving contact mentions against
/// the given directory.
pub fn render(text: &str, contacts: &[Contact]) -> String {
    let mut out = escape_html(text);

    if let Some(re) = compile(CONTACT_TOKEN) {
        out = re
            .replace_all(&out, |cap: &Captures| {
                let name = &cap[1];
                match contacts.iter().find(|c| c.matches(name)) {
                    Some(contact) => format!(
                        r#"<a class="mention contact" href="/contacts/{}">@{}</a>"#,
                        contact.id, name
                    ),
                    None => format!(r#"<span class="mention unresolved">@{}</span>"#, name),
                }
            })
            .into_owned();
    }

    if let Some(re) = compile(TAG_TOKEN) {
        out = re
            .replace_all(&out, |cap: &Captures| {
                let tag = &cap[1];
                format!(
                    r#"<span class="tag" data-tag="{}">#{}</span>"#,
                    tag.to_lowercase(),
                    tag
                )
            })
            .into_owned();
    }

    if let Some(re) = compile(WIKI_TOKEN) {
        out = re
            .replace_all(&out, |cap: &Captures| {
                let title = &cap[1];
                format!(r#"<span class="wiki-link" data-title="{}">{}</span>"#, title, title)
            })
            .into_owned();
    }

    out.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<Contact> {
        vec![Contact {
            id: "c-1".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }]
    }

    #[test]
    fn test_escapes_html() {
        let out = render("a < b & c > d", &[]);
        assert_eq!(out, "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn test_resolved_contact_becomes_link() {
        let out = render("met @Jane Doe", &directory());
        assert!(out.contains(r#"<a class="mention contact" href="/contacts/c-1">@Jane Doe</a>"#));
    }

    #[test]
    fn test_unresolved_contact_becomes_span() {
        let out = render("met @Bob Smith", &directory());
        assert!(out.contains(r#"<span class="mention unresolved">@Bob Smith</span>"#));
    }

    #[test]
    fn test_tag_badge() {
        let out = render("work on #IoT", &[]);
        assert!(out.contains(r##"<span class="tag" data-tag="iot">#IoT</span>"##));
    }

    #[test]
    fn test_wiki_link_span() {
        let out = render("see [[Project Alpha]]", &[]);
        assert!(out.contains(r#"<span class="wiki-link" data-title="Project Alpha">Project Alpha</span>"#));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let out = render("one\ntwo", &[]);
        assert_eq!(out, "one<br>two");
    }

    #[test]
    fn test_render_is_idempotent_per_input() {
        let text = "met @Jane Doe about #iot, see [[Alpha]]\nnext line";
        let a = render(text, &directory());
        let b = render(text, &directory());
        assert_eq!(a, b);
    }
}
