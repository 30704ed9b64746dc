//! Graphviz export of predicates.
//!
//! Conventions:
//! - terminals are squares at the bottom (sink rank), only `1` is stored, the
//!   `0` square stands for its complement;
//! - variable nodes are grouped by variable, so each rank is one variable;
//! - solid edges are high (token present) branches, dashed edges are low
//!   branches, dotted edges with a hollow circle are complemented;
//! - named roots are boxes at the top (source rank).
//!
//! ```
//! use petri_bdd::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let f = bdd.cube([1, -2]);
//! let dot = bdd.to_dot(&[("f", f)], |v| format!("x{}", v)).unwrap();
//! assert!(dot.starts_with("graph {"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Render the nodes reachable from `roots` in DOT format, labelling each
    /// variable node with `label(variable)`.
    pub fn to_dot(
        &self,
        roots: &[(&str, Ref)],
        label: impl Fn(u32) -> String,
    ) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape=circle];")?;

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "0 [shape=square, label=\"0\"];")?;
        writeln!(dot, "1 [shape=square, label=\"1\"];")?;
        writeln!(dot, "}}")?;

        let terminal = self.one().index();
        let mut ids: Vec<u32> = self
            .descendants(roots.iter().map(|&(_, r)| r))
            .into_iter()
            .filter(|&id| id != terminal)
            .collect();
        ids.sort_unstable();

        let mut ranks = BTreeMap::<u32, Vec<u32>>::new();
        for &id in &ids {
            ranks.entry(self.variable(id)).or_default().push(id);
        }
        for (&v, rank) in &ranks {
            writeln!(dot, "{{ rank=same")?;
            for &id in rank {
                writeln!(dot, "{} [label=\"{}\"];", id, label(v))?;
            }
            writeln!(dot, "}}")?;
        }

        for &id in &ids {
            let high = self.high(id);
            writeln!(dot, "{} -- {};", id, high.index())?;
            let low = self.low(id);
            if low == self.zero() {
                writeln!(dot, "{} -- 0 [style=dashed];", id)?;
            } else if low.is_negated() {
                writeln!(
                    dot,
                    "{} -- {} [style=dotted, dir=forward, arrowhead=odot];",
                    id,
                    low.index()
                )?;
            } else {
                writeln!(dot, "{} -- {} [style=dashed];", id, low.index())?;
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, (name, _)) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape=box, label=\"{}\"];", i, name)?;
        }
        writeln!(dot, "}}")?;
        for (i, &(_, root)) in roots.iter().enumerate() {
            if root == self.zero() {
                writeln!(dot, "r{} -- 0;", i)?;
            } else if root.is_negated() {
                writeln!(dot, "r{} -- {} [dir=forward, arrowhead=odot];", i, root.index())?;
            } else {
                writeln!(dot, "r{} -- {};", i, root.index())?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
