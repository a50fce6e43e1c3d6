//! Link graph construction over a note collection
//!
//! Wiki-link titles resolve to notes by case-insensitive name equality or by
//! substring containment in either direction. Unresolvable titles are data,
//! not errors: forward links carry `exists: false` and the graph grows a
//! virtual node per orphan title.

use crate::annotate::{self, MentionKind};
use crate::note::Note;
use crate::text;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Radius of the context snippet captured around a link occurrence
const CONTEXT_RADIUS: usize = 100;

/// Prefix for graph nodes representing links to nonexistent notes
const VIRTUAL_PREFIX: &str = "virtual:";

/// A wiki link found in some content, resolved against the note collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardLink {
    pub title: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A note referencing the target title by wiki link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlink {
    pub source_path: String,
    pub source_name: String,
    /// Snippet around the first occurrence
    pub context: String,
}

/// Graph node: a real note or a virtual placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
}

/// Directed edge: source note path -> target node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// The full link multigraph. Cycles are valid; parallel edges are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Aggregate link statistics over a note collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total_links: usize,
    pub unique_targets: usize,
    pub orphan_links: usize,
    pub most_linked: Vec<LinkCount>,
}

/// A link title with its raw mention count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCount {
    pub title: String,
    pub count: usize,
}

/// Resolve a wiki-link title to a note.
///
/// Tie-break is deterministic: exact case-insensitive name match wins, then
/// the shortest name satisfying the containment rule, then list order.
fn resolve_target<'a>(title: &str, notes: &'a [Note]) -> Option<&'a Note> {
    let wanted = title.to_lowercase();
    if let Some(exact) = notes.iter().find(|n| n.name.to_lowercase() == wanted) {
        return Some(exact);
    }
    notes
        .iter()
        .filter(|n| {
            let name = n.name.to_lowercase();
            name.contains(&wanted) || wanted.contains(&name)
        })
        .min_by_key(|n| n.name.len())
}

/// Find every wiki link in `content` and resolve it against `notes`
pub fn find_forward_links(content: &str, notes: &[Note]) -> Vec<ForwardLink> {
    annotate::parse(content)
        .links
        .into_iter()
        .map(|title| match resolve_target(&title, notes) {
            Some(note) => ForwardLink {
                title,
                exists: true,
                path: Some(note.path.clone()),
            },
            None => ForwardLink {
                title,
                exists: false,
                path: None,
            },
        })
        .collect()
}

/// Find every note whose body references `target_title` by wiki link.
///
/// The title is matched case-insensitively with regex metacharacters
/// escaped; the snippet around the first occurrence is reported.
pub fn find_backlinks(target_title: &str, notes: &[Note]) -> Vec<Backlink> {
    let pattern = format!(r"(?i)\[\[{}\]\]", regex::escape(target_title));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(error = %e, title = target_title, "failed to compile backlink pattern");
            return Vec::new();
        }
    };

    let mut backlinks = Vec::new();
    for note in notes {
        if let Some(m) = re.find(&note.body) {
            backlinks.push(Backlink {
                source_path: note.path.clone(),
                source_name: note.name.clone(),
                context: text::context_window(&note.body, m.start(), m.end(), CONTEXT_RADIUS)
                    .to_string(),
            });
        }
    }
    backlinks
}

/// Build the full link graph: one real node per note, one edge per wiki
/// link, and deduplicated virtual nodes for unresolvable titles.
#[tracing::instrument(skip(notes), fields(note_count = notes.len()))]
pub fn build_link_graph(notes: &[Note]) -> LinkGraph {
    let mut graph = LinkGraph::default();
    let mut virtual_ids: HashSet<String> = HashSet::new();

    for note in notes {
        graph.nodes.push(GraphNode {
            id: note.path.clone(),
            label: note.name.clone(),
            is_virtual: false,
        });
    }

    for note in notes {
        for mention in annotate::parse(&note.body).mentions {
            if mention.kind != MentionKind::Link {
                continue;
            }
            let to = match resolve_target(&mention.value, notes) {
                Some(target) => target.path.clone(),
                None => {
                    let id = format!("{}{}", VIRTUAL_PREFIX, mention.value);
                    if virtual_ids.insert(id.clone()) {
                        graph.nodes.push(GraphNode {
                            id: id.clone(),
                            label: mention.value.clone(),
                            is_virtual: true,
                        });
                    }
                    id
                }
            };
            graph.edges.push(GraphEdge {
                from: note.path.clone(),
                to,
            });
        }
    }

    graph
}

/// Aggregate link statistics: totals, distinct targets, orphan titles, and
/// the top-10 most linked titles by raw mention count.
pub fn link_stats(notes: &[Note]) -> LinkStats {
    let mut total = 0usize;
    let mut counts: HashMap<String, usize> = HashMap::new();

    for note in notes {
        for mention in annotate::parse(&note.body).mentions {
            if mention.kind != MentionKind::Link {
                continue;
            }
            total += 1;
            *counts.entry(mention.value).or_insert(0) += 1;
        }
    }

    let orphan_links = counts
        .keys()
        .filter(|title| resolve_target(title, notes).is_none())
        .count();

    let mut most_linked: Vec<LinkCount> = counts
        .iter()
        .map(|(title, count)| LinkCount {
            title: title.clone(),
            count: *count,
        })
        .collect();
    most_linked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.title.cmp(&b.title)));
    most_linked.truncate(10);

    LinkStats {
        total_links: total,
        unique_targets: counts.len(),
        orphan_links,
        most_linked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        "2024-06-01T10:00:00Z".parse().expect("valid timestamp")
    }

    fn note(path: &str, name: &str, body: &str) -> Note {
        Note {
            path: path.to_string(),
            name: name.to_string(),
            body: body.to_string(),
            modified: ts(),
            kind: crate::note::NoteKind::Daily,
        }
    }

    #[test]
    fn test_forward_link_round_trip() {
        let alpha = note("alpha.md", "Alpha", "the target");
        let daily = note("2024-06-01.md", "2024-06-01", "see [[Alpha]]");

        let links = find_forward_links(&daily.body, &[alpha.clone(), daily.clone()]);
        assert_eq!(links.len(), 1);
        assert!(links[0].exists);
        assert_eq!(links[0].path.as_deref(), Some("alpha.md"));

        // Removing the target flips exists to false
        let links = find_forward_links(&daily.body, &[daily.clone()]);
        assert!(!links[0].exists);
        assert_eq!(links[0].path, None);
    }

    #[test]
    fn test_resolution_prefers_exact_then_shortest() {
        let long = note("a.md", "Alpha Project Notes", "");
        let short = note("b.md", "Alpha Project", "");
        let exact = note("c.md", "Alpha", "");

        let notes = vec![long.clone(), short.clone(), exact.clone()];
        let links = find_forward_links("[[alpha]]", &notes);
        assert_eq!(links[0].path.as_deref(), Some("c.md"));

        // Without the exact match, the shortest containing name wins
        let notes = vec![long, short];
        let links = find_forward_links("[[alpha]]", &notes);
        assert_eq!(links[0].path.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_containment_works_both_directions() {
        let target = note("a.md", "Alpha", "");
        // Link title longer than the note name
        let links = find_forward_links("[[Alpha roadmap]]", &[target]);
        assert!(links[0].exists);
    }

    #[test]
    fn test_backlinks_case_insensitive_with_context() {
        let source = note("2024-06-01.md", "2024-06-01", "prefix text [[alpha]] suffix text");
        let backlinks = find_backlinks("Alpha", &[source]);
        assert_eq!(backlinks.len(), 1);
        assert_eq!(backlinks[0].source_path, "2024-06-01.md");
        assert!(backlinks[0].context.contains("[[alpha]]"));
        assert!(backlinks[0].context.contains("prefix text"));
    }

    #[test]
    fn test_backlinks_escape_regex_metacharacters() {
        let source = note("x.md", "x", "see [[What? (draft)]] here");
        let backlinks = find_backlinks("What? (draft)", &[source]);
        assert_eq!(backlinks.len(), 1);
    }

    #[test]
    fn test_graph_introduces_virtual_node_for_orphan() {
        let daily = note("2024-06-01.md", "2024-06-01", "see [[Alpha]]");
        let graph = build_link_graph(&[daily]);
        assert_eq!(graph.nodes.len(), 2);
        let virtual_node = graph
            .nodes
            .iter()
            .find(|n| n.is_virtual)
            .expect("virtual node");
        assert_eq!(virtual_node.id, "virtual:Alpha");
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].to, "virtual:Alpha");
    }

    #[test]
    fn test_graph_virtual_nodes_deduplicated() {
        let a = note("a.md", "a", "[[Ghost]]");
        let b = note("b.md", "b", "[[Ghost]] and [[Ghost]]");
        let graph = build_link_graph(&[a, b]);
        let virtuals: Vec<_> = graph.nodes.iter().filter(|n| n.is_virtual).collect();
        assert_eq!(virtuals.len(), 1);
        // Multigraph: parallel edges are kept. Note that parse() collapses
        // duplicate titles per note in its links list, but edges come from
        // the positional mentions, one per occurrence.
        assert_eq!(graph.edges.len(), 3);
    }

    #[test]
    fn test_cycles_are_valid() {
        let a = note("a.md", "Alpha", "[[Beta]]");
        let b = note("b.md", "Beta", "[[Alpha]]");
        let graph = build_link_graph(&[a, b]);
        assert_eq!(graph.edges.len(), 2);
        assert!(graph.nodes.iter().all(|n| !n.is_virtual));
    }

    #[test]
    fn test_link_stats_orphans() {
        let daily = note("2024-06-01.md", "2024-06-01", "see [[Orphan]]");
        let stats = link_stats(&[daily]);
        assert_eq!(stats.total_links, 1);
        assert_eq!(stats.unique_targets, 1);
        assert_eq!(stats.orphan_links, 1);
        assert_eq!(stats.most_linked[0].title, "Orphan");
        assert_eq!(stats.most_linked[0].count, 1);
    }

    #[test]
    fn test_link_stats_empty_collection() {
        let stats = link_stats(&[]);
        assert_eq!(stats.total_links, 0);
        assert_eq!(stats.unique_targets, 0);
        assert_eq!(stats.orphan_links, 0);
        assert!(stats.most_linked.is_empty());
    }

    #[test]
    fn test_most_linked_sorted_and_capped() {
        let mut notes = Vec::new();
        for i in 0..12 {
            let body = format!("[[T{}]] ", i).repeat(i + 1);
            notes.push(note(&format!("n{}.md", i), &format!("n{}", i), &body));
        }
        let stats = link_stats(&notes);
        assert_eq!(stats.most_linked.len(), 10);
        assert_eq!(stats.most_linked[0].title, "T11");
        assert_eq!(stats.most_linked[0].count, 12);
        for pair in stats.most_linked.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }
}
