//! Generic traversal over the document IR.
//!
//! Every pass that inspects or rebuilds a [`Doc`] goes through these
//! functions: `fits` is a [`visit`], the alignment resolver is a [`visit`]
//! followed by a [`rewrite`]. None of them know anything about layout.
//!
//! Traversals keep their pending nodes on a heap stack, so a list of many
//! thousand elements is as safe to walk as a short one.

use std::ops::ControlFlow;

use crate::doc::{self, Doc, DocNode};

/// What [`visit`] does after the callback has seen a node.
#[derive(Debug)]
pub enum Walk {
    /// Visit the node's children, left to right.
    Descend,
    /// Do not visit the node's children.
    Skip,
    /// Visit this document in place of the node's children.
    DescendInto(Doc),
}

/// What [`rewrite`] does with a node.
#[derive(Debug)]
pub enum Rewrite {
    /// Keep the node and its whole subtree as they are.
    Keep,
    /// Use this document in place of the node.
    Replace(Doc),
    /// Rewrite the node's children and rebuild it around them.
    Descend,
}

/// The direct children of a node, left to right.
pub fn children(doc: &Doc) -> impl DoubleEndedIterator<Item = &Doc> {
    let (first, second) = match doc.node() {
        DocNode::Concat(left, right) => (Some(left), Some(right)),
        DocNode::Union { flat, broken } => (Some(flat), Some(broken)),
        DocNode::Nest(child) | DocNode::Hang(child) | DocNode::Align(child) => (Some(child), None),
        DocNode::Empty
        | DocNode::Text { .. }
        | DocNode::Keyword { .. }
        | DocNode::SoftLine
        | DocNode::HardLine
        | DocNode::HardLines(_) => (None, None),
    };
    first.into_iter().chain(second)
}

/// Pre-order traversal. The callback decides, per node, whether to descend
/// and may stop the whole walk by returning `Break`.
pub fn visit<B, F>(doc: &Doc, f: &mut F) -> ControlFlow<B>
where
    F: FnMut(&Doc) -> ControlFlow<B, Walk>,
{
    let mut pending = vec![doc.clone()];
    while let Some(node) = pending.pop() {
        match f(&node)? {
            Walk::Descend => pending.extend(children(&node).rev().cloned()),
            Walk::Skip => {}
            Walk::DescendInto(inner) => pending.push(inner),
        }
    }
    ControlFlow::Continue(())
}

/// Fold over every node in pre-order.
pub fn fold<T, F>(doc: &Doc, init: T, f: &mut F) -> T
where
    F: FnMut(T, &Doc) -> T,
{
    let mut acc = init;
    let mut pending = vec![doc];
    while let Some(node) = pending.pop() {
        acc = f(acc, node);
        pending.extend(children(node).rev());
    }
    acc
}

/// Rebuild `doc` with each direct child replaced by `f(child)`.
///
/// Rebuilding goes through the smart constructors, so the result is in
/// normal form. If `f` returns every child unchanged, `doc` itself is
/// returned and no node is allocated.
pub fn map_children(doc: &Doc, mut f: impl FnMut(&Doc) -> Doc) -> Doc {
    match doc.node() {
        DocNode::Concat(left, right) => {
            let (l, r) = (f(left), f(right));
            if l.ptr_eq(left) && r.ptr_eq(right) {
                doc.clone()
            } else {
                doc::concat(l, r)
            }
        }
        DocNode::Union { flat, broken } => {
            let (fl, br) = (f(flat), f(broken));
            if fl.ptr_eq(flat) && br.ptr_eq(broken) {
                doc.clone()
            } else {
                doc::union(fl, br)
            }
        }
        DocNode::Nest(child) => map_single(doc, child, f, doc::nest),
        DocNode::Hang(child) => map_single(doc, child, f, doc::hang),
        DocNode::Align(child) => map_single(doc, child, f, doc::align),
        DocNode::Empty
        | DocNode::Text { .. }
        | DocNode::Keyword { .. }
        | DocNode::SoftLine
        | DocNode::HardLine
        | DocNode::HardLines(_) => doc.clone(),
    }
}

fn map_single(
    doc: &Doc,
    child: &Doc,
    mut f: impl FnMut(&Doc) -> Doc,
    rebuild: fn(Doc) -> Doc,
) -> Doc {
    let mapped = f(child);
    if mapped.ptr_eq(child) {
        doc.clone()
    } else {
        rebuild(mapped)
    }
}

/// Top-down rewrite: the callback picks, per node, whether to keep it,
/// replace it, or rewrite its children.
pub fn rewrite<F>(doc: &Doc, f: &mut F) -> Doc
where
    F: FnMut(&Doc) -> Rewrite,
{
    let mut frames = vec![Frame::Visit(doc.clone())];
    // Finished subtrees, in document order. A `Build` frame takes its
    // node's results off the top.
    let mut done: Vec<Doc> = Vec::new();
    while let Some(frame) = frames.pop() {
        match frame {
            Frame::Visit(node) => match f(&node) {
                Rewrite::Keep => done.push(node),
                Rewrite::Replace(replacement) => done.push(replacement),
                Rewrite::Descend => {
                    let kids: Vec<Doc> = children(&node).cloned().collect();
                    frames.push(Frame::Build(node));
                    frames.extend(kids.into_iter().rev().map(Frame::Visit));
                }
            },
            Frame::Build(node) => {
                let start = done.len() - children(&node).count();
                let rebuilt = {
                    let mut mapped = done.drain(start..);
                    map_children(&node, |child| mapped.next().unwrap_or_else(|| child.clone()))
                };
                done.push(rebuilt);
            }
        }
    }
    done.pop().unwrap_or_else(|| doc.clone())
}

enum Frame {
    Visit(Doc),
    /// All children of this node have been rewritten.
    Build(Doc),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::*;

    #[test]
    fn children_in_order() {
        let doc = union(text("flat"), text("broken"));
        let kids: Vec<&Doc> = children(&doc).collect();
        assert_eq!(kids, vec![&text("flat"), &text("broken")]);
        assert_eq!(children(&nest(text("x"))).count(), 1);
        assert_eq!(children(&softline()).count(), 0);
    }

    #[test]
    fn visit_is_pre_order_left_to_right() {
        let doc = concat(text("a"), nest(concat(softline(), text("b"))));
        let mut seen = Vec::new();
        let _ = visit::<(), _>(&doc, &mut |node| {
            if let DocNode::Text { content, .. } = node.node() {
                seen.push(content.clone());
            }
            ControlFlow::Continue(Walk::Descend)
        });
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn visit_skip_and_break() {
        let doc = concat(align(text("hidden")), concat(softline(), text("shown")));
        let mut texts = 0;
        let flow = visit(&doc, &mut |node| match node.node() {
            DocNode::Align(_) => ControlFlow::Continue(Walk::Skip),
            DocNode::Text { .. } => {
                texts += 1;
                ControlFlow::Continue(Walk::Descend)
            }
            DocNode::SoftLine => ControlFlow::Break("softline"),
            _ => ControlFlow::Continue(Walk::Descend),
        });
        assert_eq!(flow, ControlFlow::Break("softline"));
        assert_eq!(texts, 0);
    }

    #[test]
    fn fold_counts_nodes() {
        let doc = concat(text("a"), nest(softline()));
        assert_eq!(fold(&doc, 0, &mut |n, _| n + 1), 4);
    }

    #[test]
    fn map_children_identity_keeps_node() {
        let doc = concat(text("a"), nest(softline()));
        let mapped = map_children(&doc, |child| child.clone());
        assert!(mapped.ptr_eq(&doc));
    }

    #[test]
    fn rewrite_renormalizes() {
        let doc = concat(align_text("x", 0), text("y"));
        let plain = rewrite(&doc, &mut |node| match node.node() {
            DocNode::Text { content, align: Some(_) } => Rewrite::Replace(text(content.clone())),
            _ => Rewrite::Descend,
        });
        assert_eq!(plain, text("xy"));
    }

    #[test]
    fn rewrite_replaces_in_document_order() {
        let doc = concat_all([
            align_text("a", 0),
            nest(concat(softline(), align_text("b", 0))),
            union(align_text("c", 0), hardline()),
        ]);
        let mut order = Vec::new();
        let out = rewrite(&doc, &mut |node| match node.node() {
            DocNode::Text { content, align: Some(_) } => {
                order.push(content.clone());
                Rewrite::Replace(text(content.to_uppercase()))
            }
            _ => Rewrite::Descend,
        });
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(
            out,
            concat_all([
                text("A"),
                nest(concat(softline(), text("B"))),
                union(text("C"), hardline()),
            ])
        );
    }

    #[test]
    fn walks_long_lists_without_recursion() {
        let doc = concat_all((0..200_000).map(|i| align_text(format!("x{i}"), 0) + softline()));
        assert_eq!(fold(&doc, 0, &mut |n, _| n + 1), doc.size());
        let mut leaves = 0;
        let _ = visit::<(), _>(&doc, &mut |node| {
            if let DocNode::Text { .. } = node.node() {
                leaves += 1;
            }
            ControlFlow::Continue(Walk::Descend)
        });
        assert_eq!(leaves, 200_000);

        let plain = rewrite(&doc, &mut |node| match node.node() {
            DocNode::Text { content, align: Some(_) } => Rewrite::Replace(text(content.clone())),
            _ => Rewrite::Descend,
        });
        assert!(!plain.ptr_eq(&doc));
        let kept = rewrite(&doc, &mut |_| Rewrite::Descend);
        assert!(kept.ptr_eq(&doc));
    }

    #[test]
    fn rewrite_keep_leaves_subtree() {
        let inner = align(align_text("x", 0));
        let doc = concat(text("a"), inner.clone());
        let out = rewrite(&doc, &mut |node| match node.node() {
            DocNode::Align(_) => Rewrite::Keep,
            _ => Rewrite::Descend,
        });
        assert!(out.ptr_eq(&doc));
    }
}
