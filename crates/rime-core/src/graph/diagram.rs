//! Box-drawing rendering of a dependency cycle.
//!
//! The diagram is a closed loop drawn top to bottom. Node names are centered
//! in a column of width `W = 4 + longest / 2`; between consecutive nodes the
//! right rail carries the edge label and a `▼` arrow. The left rail is the
//! return path, marked with `▲` halfway down.
//!
//! ```text
//!   ┌─────────────────────────┐
//!   │                         │
//!   │        m:beanA
//!   │                         │
//!   │                         │ m:beanA:beanB
//!   │                         │
//!   ▲                         ▼
//!   │        m:beanB
//!   …
//!   └─────────────────────────┘
//! ```
//!
//! Every line starts with two spaces. Name lines have no trailing padding and
//! the bottom border ends with one space. There is no trailing newline.

use std::fmt::Write as _;

use super::cycles::{Cycle, CycleStep};
use crate::error::Diagnostic;
use crate::model::{ModuleName, QualifiedName};

const INDENT: &str = "  ";
const RAIL: char = '│';
const RETURN_ARROW: char = '▲';
const DOWN_ARROW: char = '▼';
const HORIZONTAL: char = '─';

/// One line of the diagram, split at the left rail.
struct Line {
    left: char,
    body: String,
}

impl Line {
    const fn rail(body: String) -> Self {
        Self { left: RAIL, body }
    }
}

/// Render `cycle` as a multi-line diagram.
///
/// An empty cycle renders as an empty box.
#[must_use]
pub fn render(cycle: &Cycle) -> String {
    let longest = cycle.nodes().map(QualifiedName::display_width).max().unwrap_or(0);
    let width = 4 + longest / 2;
    let blank = " ".repeat(width);

    let mut lines = Vec::with_capacity(5 * cycle.len() + 2);
    lines.push(Line {
        left: '┌',
        body: format!("{}┐", horizontal(width)),
    });
    lines.push(Line::rail(format!("{blank}{RAIL}")));

    let last = cycle.len().saturating_sub(1);
    for (i, step) in cycle.steps().iter().enumerate() {
        let pad = width - step.node.display_width() / 2;
        lines.push(Line::rail(format!("{}{}", " ".repeat(pad), step.node)));
        lines.push(Line::rail(format!("{blank}{RAIL}")));
        lines.push(Line::rail(format!("{blank}{RAIL} {}", edge_text(step))));
        lines.push(Line::rail(format!("{blank}{RAIL}")));
        if i != last {
            lines.push(Line::rail(format!("{blank}{DOWN_ARROW}")));
        }
    }

    lines.push(Line {
        left: '└',
        body: format!("{}┘ ", horizontal(width)),
    });

    let middle = lines.len() / 2;
    if let Some(line) = lines.get_mut(middle).filter(|line| line.left == RAIL) {
        line.left = RETURN_ARROW;
    }

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{INDENT}{}{}", line.left, line.body);
    }
    out
}

/// Text on the right rail below a node: `<node>:<label>`, or `(nested)` for
/// the synthetic hops of a nested chain.
fn edge_text(step: &CycleStep) -> String {
    if step.edge.nested {
        step.edge.label.clone()
    } else {
        format!("{}:{}", step.node, step.edge.label)
    }
}

fn horizontal(width: usize) -> String {
    std::iter::repeat_n(HORIZONTAL, width).collect()
}

/// One diagnostic per reportable node of every cycle.
///
/// Ordered by cycle discovery, then by position within the cycle. Every
/// diagnostic of a cycle carries the same diagram.
#[must_use]
pub fn cycle_diagnostics(module: &ModuleName, cycles: &[Cycle]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for cycle in cycles {
        let diagram = render(cycle);
        diagnostics.extend(cycle.reportable().iter().map(|anchor| Diagnostic {
            anchor: anchor.clone(),
            message: format!("Bean {anchor} forms a cycle in module {module}\n{diagram}"),
        }));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyGraph, find_cycles};
    use crate::model::{BeanDeclaration, ModuleDeclaration, ModuleName};

    fn single_cycle(module: &ModuleDeclaration) -> Cycle {
        let mut cycles = find_cycles(&DependencyGraph::build(module));
        assert_eq!(cycles.len(), 1);
        cycles.remove(0)
    }

    #[test]
    fn self_loop_diagram() {
        let m = ModuleName::new("m");
        let module = ModuleDeclaration::new(m.clone(), 1)
            .with_bean(BeanDeclaration::singleton(m.qualify("ab")).depends_on(m.qualify("ab"), "me"));
        let diagram = render(&single_cycle(&module));

        // "m:ab" is 4 wide: W = 6, pad = 4.
        let expected = [
            "  ┌──────┐",
            "  │      │",
            "  │    m:ab",
            "  ▲      │",
            "  │      │ m:ab:me",
            "  │      │",
            "  └──────┘ ",
        ]
        .join("\n");
        assert_eq!(diagram, expected);
    }

    #[test]
    fn two_node_diagram_geometry() {
        let m = ModuleName::new("m");
        let module = ModuleDeclaration::new(m.clone(), 1)
            .with_bean(BeanDeclaration::singleton(m.qualify("a")).depends_on(m.qualify("bb"), "x"))
            .with_bean(BeanDeclaration::singleton(m.qualify("bb")).depends_on(m.qualify("a"), "y"));
        let diagram = render(&single_cycle(&module));
        let lines: Vec<&str> = diagram.lines().collect();

        // "m:bb" is 4 wide: W = 6; "m:a" is 3 wide: pad = 5.
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[2], "  │     m:a");
        assert_eq!(lines[4], "  │      │ m:a:x");
        assert_eq!(lines[6], "  ▲      ▼");
        assert_eq!(lines[7], "  │    m:bb");
        assert_eq!(lines[9], "  │      │ m:bb:y");
        assert_eq!(lines[11], "  └──────┘ ");
        assert!(!diagram.ends_with('\n'));
    }

    #[test]
    fn nested_edges_show_nested_marker() {
        let m = ModuleName::new("m");
        let module = ModuleDeclaration::new(m.clone(), 1)
            .with_bean(BeanDeclaration::singleton(m.qualify("a")).depends_on(m.qualify("b"), "b"))
            .with_bean(BeanDeclaration::singleton(m.qualify("b")).depends_on_nested(
                m.qualify("a"),
                "r",
                ["inner"],
            ));
        let diagram = render(&single_cycle(&module));

        assert!(diagram.contains("│ m:b:r\n"));
        assert!(diagram.contains("│ (nested)\n"));
        assert!(!diagram.contains("m:a.inner:(nested)"));
    }

    #[test]
    fn diagnostics_share_one_diagram() {
        let m = ModuleName::new("m");
        let module = ModuleDeclaration::new(m.clone(), 1)
            .with_bean(BeanDeclaration::singleton(m.qualify("a")).depends_on(m.qualify("b"), "b"))
            .with_bean(BeanDeclaration::singleton(m.qualify("b")).depends_on(m.qualify("a"), "a"));
        let cycle = single_cycle(&module);
        let diagram = render(&cycle);
        let diagnostics = cycle_diagnostics(&m, &[cycle]);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].anchor, m.qualify("a"));
        assert_eq!(diagnostics[1].anchor, m.qualify("b"));
        assert_eq!(
            diagnostics[1].message,
            format!("Bean m:b forms a cycle in module m\n{diagram}")
        );
    }
}
