//! Column alignment within one `Align` scope.
//!
//! Resolution runs in two passes over the scope's document. The measure pass
//! records the widest leaf of every alignment level; the apply pass pads
//! every shorter leaf of that level with trailing spaces. Neither pass enters
//! a nested `Align`: the printer resolves nested scopes when it reaches them.

use std::ops::ControlFlow;

use rustc_hash::FxHashMap;

use crate::doc::{self, Doc, DocNode};
use crate::walker::{self, Rewrite, Walk};

/// Pad the aligned leaves of `doc` to the widest leaf of their level.
///
/// Returns `doc` itself when it contains no aligned leaves.
pub fn resolve(doc: &Doc) -> Doc {
    let widths = measure(doc);
    if widths.is_empty() {
        return doc.clone();
    }

    walker::rewrite(doc, &mut |node| match node.node() {
        DocNode::Align(_) => Rewrite::Keep,
        DocNode::Text { content, align: Some(level) }
        | DocNode::Keyword { content, align: Some(level) } => {
            let pad = widths[level].saturating_sub(doc::width(content));
            if pad > 0 {
                Rewrite::Replace(doc::concat(node.clone(), doc::text(" ".repeat(pad))))
            } else {
                Rewrite::Keep
            }
        }
        _ => Rewrite::Descend,
    })
}

/// Widest content per alignment level, not looking into nested scopes.
pub fn measure(doc: &Doc) -> FxHashMap<usize, usize> {
    let mut widths: FxHashMap<usize, usize> = FxHashMap::default();
    let _ = walker::visit::<(), _>(doc, &mut |node| {
        match node.node() {
            DocNode::Align(_) => return ControlFlow::Continue(Walk::Skip),
            DocNode::Text { content, align: Some(level) }
            | DocNode::Keyword { content, align: Some(level) } => {
                let width = widths.entry(*level).or_insert(0);
                *width = (*width).max(doc::width(content));
            }
            _ => {}
        }
        ControlFlow::Continue(Walk::Descend)
    });
    widths
}
