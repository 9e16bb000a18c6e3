//! Wadler-style printer for the VHDL document IR.
//!
//! The printer walks a [`Doc`] with an explicit work stack, threading the
//! indentation and the current mode through every command. At each `Union`
//! it asks [`fits`] whether the flat alternative stays within the rest of
//! the line; if not, the broken alternative is rendered in break mode.

use std::ops::ControlFlow;

use tracing::trace;

use crate::align;
use crate::config::{FormatConfig, IndentStyle};
use crate::doc::{self, Doc, DocNode};
use crate::walker::{self, Walk};

/// Whether the current context is rendering flat or broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Everything on one line; `SoftLine` renders as " ".
    Flat,
    /// `SoftLine` renders as newline + indent.
    Break,
}

/// A command on the printer's work stack.
#[derive(Debug)]
struct PrintCmd {
    indent: usize,
    mode: Mode,
    doc: Doc,
}

struct Printer<'c> {
    config: &'c FormatConfig,
    out: String,
    col: usize,
}

/// Render `doc` as text, starting at column 0 in break mode.
///
/// The output is exactly what the document describes: no trailing newline is
/// added and whitespace-only lines are kept.
pub fn print(doc: &Doc, config: &FormatConfig) -> String {
    let mut printer = Printer {
        config,
        out: String::new(),
        col: 0,
    };
    printer.run(doc.clone());
    printer.out
}

impl Printer<'_> {
    fn run(&mut self, root: Doc) {
        let mut stack = vec![PrintCmd {
            indent: 0,
            mode: Mode::Break,
            doc: root,
        }];

        while let Some(cmd) = stack.pop() {
            match cmd.doc.node() {
                DocNode::Empty => {}

                DocNode::Text { content, .. } => self.push_str(content),

                DocNode::Keyword { content, .. } => {
                    let cased = self.config.keyword_case.apply(content);
                    self.push_str(&cased);
                }

                DocNode::SoftLine => match cmd.mode {
                    Mode::Flat => self.push_str(" "),
                    Mode::Break => self.newline(cmd.indent),
                },

                DocNode::HardLine => self.newline(cmd.indent),

                DocNode::HardLines(count) => {
                    for _ in 0..*count {
                        self.newline(cmd.indent);
                    }
                }

                DocNode::Concat(left, right) => {
                    // Right first so the left side is popped first.
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode: cmd.mode,
                        doc: right.clone(),
                    });
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode: cmd.mode,
                        doc: left.clone(),
                    });
                }

                DocNode::Nest(child) => stack.push(PrintCmd {
                    indent: cmd.indent + self.config.indent_size,
                    mode: cmd.mode,
                    doc: child.clone(),
                }),

                DocNode::Hang(child) => stack.push(PrintCmd {
                    indent: self.col,
                    mode: cmd.mode,
                    doc: child.clone(),
                }),

                DocNode::Align(child) => {
                    let child = if self.config.align {
                        align::resolve(child)
                    } else {
                        child.clone()
                    };
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode: cmd.mode,
                        doc: child,
                    });
                }

                DocNode::Union { flat, broken } => {
                    let remaining = self.config.line_width as isize - self.col as isize;
                    let (mode, doc) = if cmd.mode == Mode::Flat || fits(remaining, flat) {
                        (Mode::Flat, flat.clone())
                    } else {
                        (Mode::Break, broken.clone())
                    };
                    trace!(col = self.col, remaining, ?mode, "union");
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode,
                        doc,
                    });
                }
            }
        }
    }

    fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
        self.col += doc::width(s);
    }

    fn newline(&mut self, indent: usize) {
        self.out.push_str(self.config.end_of_line.as_str());
        match self.config.indent_style {
            IndentStyle::Spaces => {
                self.out.extend(std::iter::repeat(' ').take(indent));
            }
            IndentStyle::Tabs => {
                let unit = self.config.indent_size.max(1);
                self.out.extend(std::iter::repeat('\t').take(indent / unit));
                self.out.extend(std::iter::repeat(' ').take(indent % unit));
            }
        }
        self.col = indent;
    }
}

/// Whether `doc`, rendered flat, stays within `width` columns.
///
/// Only `doc` itself is measured, not whatever follows it. Nested unions are
/// measured through their flat branch. Any hard break fails, including the
/// zero-count break enforcer.
pub fn fits(width: isize, doc: &Doc) -> bool {
    if width < 0 {
        return false;
    }
    let mut remaining = width;
    let flow = walker::visit(doc, &mut |node| {
        match node.node() {
            DocNode::Text { content, .. } | DocNode::Keyword { content, .. } => {
                remaining -= doc::width(content) as isize;
            }
            DocNode::SoftLine => remaining -= 1,
            DocNode::HardLine | DocNode::HardLines(_) => return ControlFlow::Break(()),
            DocNode::Union { flat, .. } => {
                return ControlFlow::Continue(Walk::DescendInto(flat.clone()));
            }
            DocNode::Empty
            | DocNode::Concat(..)
            | DocNode::Nest(_)
            | DocNode::Hang(_)
            | DocNode::Align(_) => {}
        }
        if remaining < 0 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(Walk::Descend)
        }
    });
    flow.is_continue()
}
