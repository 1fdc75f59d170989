//! Connectivity between terminals.
//!
//! Wires form an undirected graph over [`Terminal`]s. A net is a connected
//! component of that graph: every terminal transitively joined by wires,
//! so several wires meeting at one pin form a junction.

use std::collections::HashMap;

use petgraph::graphmap::UnGraphMap;
use petgraph::visit::{Bfs, Walker};

use crate::circuit::{Terminal, Wire};

/// The nets of a circuit, built from its wire list.
#[derive(Debug, Default)]
pub struct Nets {
    /// Net index of each wired terminal.
    net_of: HashMap<Terminal, usize>,
    /// Members of each net, in discovery order.
    members: Vec<Vec<Terminal>>,
}
impl Nets {
    /// Builds the nets for a set of wires.
    ///
    /// Wires to components that no longer exist are kept as graph nodes;
    /// they never drive anything, so they only matter to the callers that look them up.
    pub fn build<'a>(wires: impl IntoIterator<Item = &'a Wire>) -> Self {
        let mut graph = UnGraphMap::<Terminal, ()>::new();
        for w in wires {
            graph.add_edge(w.from, w.to, ());
        }

        let mut nets = Nets::default();
        for start in graph.nodes() {
            if nets.net_of.contains_key(&start) { continue; }

            let idx = nets.members.len();
            let members: Vec<_> = Bfs::new(&graph, start).iter(&graph).collect();
            for &t in &members {
                nets.net_of.insert(t, idx);
            }
            nets.members.push(members);
        }
        nets
    }

    /// The net containing a terminal (including the terminal itself).
    ///
    /// This is empty if no wire references the terminal.
    pub fn net(&self, t: Terminal) -> &[Terminal] {
        self.net_of.get(&t)
            .map_or(&[], |&i| &self.members[i])
    }

    /// The other terminals on a terminal's net.
    pub fn peers(&self, t: Terminal) -> impl Iterator<Item = Terminal> + '_ {
        self.net(t).iter().copied().filter(move |&m| m != t)
    }

    /// Whether any wire references the terminal.
    pub fn is_wired(&self, t: Terminal) -> bool {
        self.net_of.contains_key(&t)
    }

    /// Number of nets.
    pub fn len(&self) -> usize {
        self.members.len()
    }
    /// Whether there are no nets (no wires).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
