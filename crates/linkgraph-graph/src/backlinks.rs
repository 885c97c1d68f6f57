use std::collections::BTreeMap;

use linkgraph_core::types::{BacklinksEntry, Document, LinkRef, PostMeta, Slug, SuggestedLink};

/// Inbound view per post.
///
/// `explicit` lists every post whose wiki-links name this one, in input
/// order; dangling and self-links never appear. `ai_suggested` is copied
/// from the unified builder's ranking, not derived from edges.
pub fn aggregate_backlinks(
    docs: &[Document],
    suggestions: &BTreeMap<Slug, Vec<SuggestedLink>>,
) -> BTreeMap<Slug, BacklinksEntry> {
    let mut backlinks: BTreeMap<Slug, BacklinksEntry> = docs
        .iter()
        .map(|d| {
            let entry = BacklinksEntry {
                explicit: Vec::new(),
                ai_suggested: suggestions.get(&d.slug).cloned().unwrap_or_default(),
            };
            (d.slug.clone(), entry)
        })
        .collect();

    for source in docs {
        for target in &source.explicit_links {
            if target == &source.slug {
                continue;
            }
            if let Some(entry) = backlinks.get_mut(target) {
                let linked = LinkRef { slug: source.slug.clone(), title: source.title.clone() };
                if !entry.explicit.contains(&linked) {
                    entry.explicit.push(linked);
                }
            }
        }
    }
    backlinks
}

pub fn post_meta(docs: &[Document]) -> BTreeMap<Slug, PostMeta> {
    docs.iter()
        .map(|d| (d.slug.clone(), PostMeta { title: d.title.clone(), tags: d.tags.clone(), excerpt: d.excerpt.clone() }))
        .collect()
}
