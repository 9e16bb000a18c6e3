//! Document IR for VHDL code formatting.
//!
//! A [`Doc`] captures layout intent (text, line breaks, indentation, choice
//! points, alignment scopes) without committing to a layout; the printer
//! decides the final shape. Documents are immutable and share structure:
//! cloning a `Doc` clones a handle, and every pass that changes a document
//! builds a new one around the untouched subtrees.
//!
//! The constructors in this module are the only way to build documents, and
//! they keep every tree in normal form:
//!
//! - no `Concat` has an `Empty` operand,
//! - adjacent unaligned leaves of the same kind are merged into one leaf,
//! - adjacent hard-break runs are merged into one `HardLines`.

use std::fmt;
use std::ops::Add;
use std::sync::Arc;

use crate::walker;

/// A shared handle to an immutable document node.
///
/// [`concat_all`] and [`join`] nest one `Concat` per element, so trees can
/// be as deep as the lists they hold. Equality and drop keep their pending
/// nodes on the heap.
#[derive(Clone)]
pub struct Doc(Arc<DocNode>);

/// One layout primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
    /// Produces no output.
    Empty,
    /// Literal text without line breaks. `align` names the alignment column
    /// this leaf belongs to within the nearest enclosing `Align`.
    Text { content: String, align: Option<usize> },
    /// Like `Text`, but case-folded by the printer using the keyword casing.
    Keyword { content: String, align: Option<usize> },
    /// A space when flat; a newline + indent when broken.
    SoftLine,
    /// Always a newline + indent.
    HardLine,
    /// `n` newline + indent emissions. `HardLines(0)` emits nothing but never
    /// fits, which forces the enclosing `Union` to break.
    HardLines(usize),
    /// `left` followed by `right`.
    Concat(Doc, Doc),
    /// Indent the child by one indent unit.
    Nest(Doc),
    /// Indent the child to the column where it starts.
    Hang(Doc),
    /// Two renderings of the same content. The printer uses `flat` if it fits
    /// the rest of the line and `broken` otherwise.
    Union { flat: Doc, broken: Doc },
    /// Alignment scope: columns are measured and padded within it, never
    /// across it.
    Align(Doc),
}

impl Doc {
    fn new(node: DocNode) -> Self {
        Doc(Arc::new(node))
    }

    pub fn node(&self) -> &DocNode {
        &self.0
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &Doc) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.node(), DocNode::Empty)
    }

    /// Number of nodes in the tree. Shared subtrees count once per parent.
    pub fn size(&self) -> usize {
        walker::fold(self, 0, &mut |count, _| count + 1)
    }

    /// Run length of a hard-break node: 1 for `HardLine`, `n` for `HardLines(n)`.
    fn hard_run(&self) -> Option<usize> {
        match self.node() {
            DocNode::HardLine => Some(1),
            DocNode::HardLines(n) => Some(*n),
            _ => None,
        }
    }
}

impl PartialEq for Doc {
    fn eq(&self, other: &Doc) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.ptr_eq(b) {
                continue;
            }
            if !a.node().same_head(b.node()) {
                return false;
            }
            pending.extend(walker::children(a).zip(walker::children(b)));
        }
        true
    }
}

impl Eq for Doc {}

impl Drop for Doc {
    fn drop(&mut self) {
        let Some(node) = Arc::get_mut(&mut self.0) else {
            return;
        };
        let mut pending = Vec::new();
        node.take_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            // Shared children are only released here; their other owners
            // keep the subtree alive.
            if let Some(node) = Arc::get_mut(&mut child.0) {
                node.take_children(&mut pending);
            }
        }
    }
}

impl DocNode {
    /// Whether both nodes are the same variant with the same leaf data.
    /// Children are not compared.
    fn same_head(&self, other: &DocNode) -> bool {
        match (self, other) {
            (
                DocNode::Text { content: a, align: x },
                DocNode::Text { content: b, align: y },
            )
            | (
                DocNode::Keyword { content: a, align: x },
                DocNode::Keyword { content: b, align: y },
            ) => a == b && x == y,
            (DocNode::HardLines(a), DocNode::HardLines(b)) => a == b,
            (DocNode::Empty, DocNode::Empty)
            | (DocNode::SoftLine, DocNode::SoftLine)
            | (DocNode::HardLine, DocNode::HardLine)
            | (DocNode::Concat(..), DocNode::Concat(..))
            | (DocNode::Nest(_), DocNode::Nest(_))
            | (DocNode::Hang(_), DocNode::Hang(_))
            | (DocNode::Union { .. }, DocNode::Union { .. })
            | (DocNode::Align(_), DocNode::Align(_)) => true,
            _ => false,
        }
    }

    /// Move this node's children into `out`, leaving it `Empty`.
    fn take_children(&mut self, out: &mut Vec<Doc>) {
        match std::mem::replace(self, DocNode::Empty) {
            DocNode::Concat(first, second) | DocNode::Union { flat: first, broken: second } => {
                out.push(first);
                out.push(second);
            }
            DocNode::Nest(child) | DocNode::Hang(child) | DocNode::Align(child) => out.push(child),
            DocNode::Empty
            | DocNode::Text { .. }
            | DocNode::Keyword { .. }
            | DocNode::SoftLine
            | DocNode::HardLine
            | DocNode::HardLines(_) => {}
        }
    }
}

impl fmt::Debug for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node().fmt(f)
    }
}

impl Add for Doc {
    type Output = Doc;

    fn add(self, rhs: Doc) -> Doc {
        concat(self, rhs)
    }
}

/// Display width of leaf content, in characters.
pub(crate) fn width(content: &str) -> usize {
    content.chars().count()
}

// ── Constructors ─────────────────────────────────────────────────────────

pub fn empty() -> Doc {
    Doc::new(DocNode::Empty)
}

/// Plain text that takes part in no alignment column.
pub fn text(s: impl Into<String>) -> Doc {
    leaf_text(s.into(), None)
}

/// Text belonging to alignment column `level`.
pub fn align_text(s: impl Into<String>, level: usize) -> Doc {
    leaf_text(s.into(), Some(level))
}

fn leaf_text(content: String, align: Option<usize>) -> Doc {
    debug_assert!(!content.contains('\n'), "text leaves cannot contain newlines");
    Doc::new(DocNode::Text { content, align })
}

/// A reserved word, case-folded at print time.
pub fn keyword(s: impl Into<String>) -> Doc {
    leaf_keyword(s.into(), None)
}

/// A reserved word belonging to alignment column `level`.
pub fn align_keyword(s: impl Into<String>, level: usize) -> Doc {
    leaf_keyword(s.into(), Some(level))
}

fn leaf_keyword(content: String, align: Option<usize>) -> Doc {
    debug_assert!(!content.contains('\n'), "keyword leaves cannot contain newlines");
    Doc::new(DocNode::Keyword { content, align })
}

pub fn softline() -> Doc {
    Doc::new(DocNode::SoftLine)
}

pub fn hardline() -> Doc {
    Doc::new(DocNode::HardLine)
}

/// `count` hard breaks. A count of one is the canonical `HardLine`; a count
/// of zero is the break enforcer.
pub fn hardlines(count: usize) -> Doc {
    if count == 1 {
        hardline()
    } else {
        Doc::new(DocNode::HardLines(count))
    }
}

/// Concatenate two documents, keeping the result in normal form.
pub fn concat(left: Doc, right: Doc) -> Doc {
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }
    if let Some(merged) = merge_edges(&left, &right) {
        return merged;
    }
    Doc::new(DocNode::Concat(left, right))
}

/// Merge `right` into `left` when the last leaf of `left` and the first leaf
/// of `right` can be combined.
fn merge_edges(left: &Doc, right: &Doc) -> Option<Doc> {
    let mut heads = Vec::new();
    let mut last = left;
    while let DocNode::Concat(head, tail) = last.node() {
        heads.push(head);
        last = tail;
    }
    let mut tails = Vec::new();
    let mut first = right;
    while let DocNode::Concat(head, tail) = first.node() {
        tails.push(tail);
        first = head;
    }

    let merged = merge_leaves(last, first)?;
    let merged = tails
        .into_iter()
        .rev()
        .fold(merged, |acc, tail| concat(acc, tail.clone()));
    Some(
        heads
            .into_iter()
            .rev()
            .fold(merged, |acc, head| concat(head.clone(), acc)),
    )
}

/// Combine two adjacent leaves into one, if they are of a mergeable kind.
fn merge_leaves(left: &Doc, right: &Doc) -> Option<Doc> {
    match (left.node(), right.node()) {
        (
            DocNode::Text { content: a, align: None },
            DocNode::Text { content: b, align: None },
        ) => return Some(leaf_text(format!("{a}{b}"), None)),
        (
            DocNode::Keyword { content: a, align: None },
            DocNode::Keyword { content: b, align: None },
        ) => return Some(leaf_keyword(format!("{a}{b}"), None)),
        _ => {}
    }

    let (a, b) = (left.hard_run()?, right.hard_run()?);
    Some(hardlines(a + b))
}

/// Concatenate a sequence of documents from left to right.
pub fn concat_all(docs: impl IntoIterator<Item = Doc>) -> Doc {
    docs.into_iter().fold(empty(), concat)
}

/// Concatenate `docs` with `sep` between consecutive elements.
pub fn join(docs: impl IntoIterator<Item = Doc>, sep: Doc) -> Doc {
    let mut out = empty();
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            out = concat(out, sep.clone());
        }
        out = concat(out, doc);
    }
    out
}

/// An optional sub-document; absent parts render as nothing.
pub fn opt(doc: Option<Doc>) -> Doc {
    doc.unwrap_or_else(empty)
}

pub fn nest(doc: Doc) -> Doc {
    Doc::new(DocNode::Nest(doc))
}

pub fn hang(doc: Doc) -> Doc {
    Doc::new(DocNode::Hang(doc))
}

pub fn union(flat: Doc, broken: Doc) -> Doc {
    Doc::new(DocNode::Union { flat, broken })
}

pub fn align(doc: Doc) -> Doc {
    Doc::new(DocNode::Align(doc))
}
