//! Plain-text (PlantUML) serialization of parse trees and epsilon-machines.
//!
//! Both diagram types implement [`Display`]; [`write_diagram`] stores the text in a file.
//! Turning the text into an image is left to an external renderer.

use crate::error::ReconstructionError;
use crate::transitions::TransitionTable;
use crate::tree::{NodeId, Symbol, SymbolTree};
use log::debug;
use std::fmt::{Display, Formatter};
use std::path::Path;

const HEADER: &str = "@startuml\nhide empty description";
const FOOTER: &str = "@enduml";

/// State diagram of a whole [`SymbolTree`]: one entity per node, edges labelled with
/// probabilities, and a `State`/`Count`/`Morph` annotation block for every non-root node.
pub struct StateDiagram<'a, S>(pub &'a SymbolTree<S>);

/// Transition diagram of an epsilon-machine: one edge per morph-to-morph transition.
pub struct TransitionDiagram<'a, S>(pub &'a TransitionTable<S>);

impl<S: Symbol> Display for StateDiagram<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{HEADER}")?;
        write_node(f, self.0, self.0.root())?;
        writeln!(f, "{FOOTER}")
    }
}

fn write_node<S: Symbol>(
    f: &mut Formatter<'_>,
    tree: &SymbolTree<S>,
    id: NodeId,
) -> std::fmt::Result {
    let node = tree.node(id);
    for (_, child) in tree.children(id) {
        let child = tree.node(child);
        writeln!(
            f,
            "{} --> {} : {}",
            node.path_id(),
            child.path_id(),
            Probability(child.prob())
        )?;
    }
    if id != tree.root() {
        let symbol = node
            .edge_symbol()
            .map(|it| it.to_string())
            .unwrap_or_default();
        let morph = node
            .morph()
            .map(|it| it.to_string())
            .unwrap_or_else(|| "unassigned".to_string());
        writeln!(f, "{} : State {}", node.path_id(), symbol)?;
        writeln!(f, "{} : Count {}", node.path_id(), node.leaf_count())?;
        writeln!(f, "{} : Morph {}", node.path_id(), morph)?;
    }
    for (_, child) in tree.children(id) {
        write_node(f, tree, child)?;
    }
    Ok(())
}

impl<S: Symbol> Display for TransitionDiagram<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{HEADER}")?;
        for (from, to, transition) in self.0.iter() {
            writeln!(
                f,
                "({}) --> ({}) : {}",
                from,
                to,
                Probability(transition.probability)
            )?;
        }
        writeln!(f, "{FOOTER}")
    }
}

/// Plain decimal notation that always keeps the decimal point (`1.0`, `0.00001`).
struct Probability(f64);

impl Display for Probability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Write the text of `diagram` into the file at `path`, replacing its contents.
pub fn write_diagram<D: Display, P: AsRef<Path>>(
    diagram: &D,
    path: P,
) -> Result<(), ReconstructionError> {
    let path = path.as_ref();
    let text = diagram.to_string();
    std::fs::write(path, &text).map_err(|source| ReconstructionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Diagram written to `{}` ({} bytes).", path.display(), text.len());
    Ok(())
}
