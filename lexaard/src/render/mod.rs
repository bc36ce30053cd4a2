//! Render automata to graphviz `.dot` files.
//!
//! Generally, use `gnfa.render_to(filename, RenderSettings::default())` for the
//! most basic rendering.

use crate::automaton::{Dfa, FiniteAutomaton};
use crate::gnfa::Gnfa;
use crate::Expression;
use itertools::Itertools;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

/// Global settings related to rendering automata.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Whether to display expressions or symbols next to edges
    pub show_edge_labels: bool,
    /// Whether to draw edges labeled [`Expression::Null`], which can never be taken
    pub show_null_edges: bool,
    /// The title which should be displayed above the graph.
    ///
    /// Defaults to the filename given to [`Gnfa::render_to`].
    pub title: Option<String>,
}

impl RenderSettings {
    /// Sets the title of the graph
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.title = Some(name.as_ref().to_string());
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_edge_labels: true,
            show_null_edges: false,
            title: None,
        }
    }
}

struct Node<'a> {
    name: &'a str,
    start: bool,
    accept: bool,
}

struct Edge<'a> {
    from: &'a str,
    to: &'a str,
    label: String,
}

fn escape_text(inp: &str) -> String {
    inp.replace('\\', "\\\\").replace('"', "\\\"")
}

fn write_graph<W: Write>(
    output: &mut W,
    settings: &RenderSettings,
    nodes: &[Node<'_>],
    edges: &[Edge<'_>],
) -> io::Result<()> {
    writeln!(output, "digraph {{")?;
    writeln!(output, "rankdir=LR;")?;

    if let Some(ref title) = settings.title {
        writeln!(output, r#"labelloc="t";"#)?;
        writeln!(output, r#"label="{}";"#, escape_text(title))?;
    }

    for node in nodes {
        let shape = if node.accept { "doublecircle" } else { "circle" };
        writeln!(
            output,
            r#""{}" [shape="{shape}"]"#,
            escape_text(node.name)
        )?;

        if node.start {
            // an arrow from nowhere marks the start state
            writeln!(output, r#""__start_{0}" [shape="point"]"#, escape_text(node.name))?;
            writeln!(
                output,
                r#""__start_{0}" -> "{0}""#,
                escape_text(node.name)
            )?;
        }
    }

    for edge in edges {
        let from = escape_text(edge.from);
        let to = escape_text(edge.to);

        if settings.show_edge_labels {
            writeln!(
                output,
                r#""{from}" -> "{to}" [label="{}"]"#,
                escape_text(&edge.label)
            )?
        } else {
            writeln!(output, r#""{from}" -> "{to}""#)?
        }
    }

    writeln!(output, "}}")?;

    Ok(())
}

fn create(path: &Path, settings: &mut RenderSettings) -> io::Result<File> {
    if settings.title.is_none() {
        settings.title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string());
    }
    File::create(path)
}

impl Gnfa {
    /// Visualize the automaton as a graph, by emitting a graphviz dot file.
    pub fn render<W: Write>(&self, output: &mut W, settings: RenderSettings) -> io::Result<()> {
        let nodes: Vec<_> = self
            .states()
            .iter()
            .map(|name| Node {
                name,
                start: name == self.start(),
                accept: name == self.accept(),
            })
            .collect();

        // sorted so the output doesn't depend on hash order
        let edges: Vec<_> = self
            .transitions()
            .filter(|(_, _, label)| settings.show_null_edges || **label != Expression::Null)
            .sorted_by_key(|&(from, to, _)| (from, to))
            .map(|(from, to, label)| Edge {
                from,
                to,
                label: label.to_string(),
            })
            .collect();

        write_graph(output, &settings, &nodes, &edges)
    }

    /// [`render`](Gnfa::render) directly to a file.
    pub fn render_to(&self, path: impl AsRef<Path>, mut settings: RenderSettings) -> io::Result<()> {
        let mut w = create(path.as_ref(), &mut settings)?;
        self.render(&mut w, settings)
    }
}

impl Dfa {
    /// Visualize the automaton as a graph. Symbols leading to the same state
    /// share one edge.
    pub fn render<W: Write>(&self, output: &mut W, settings: RenderSettings) -> io::Result<()> {
        let nodes: Vec<_> = self
            .states()
            .iter()
            .map(|name| Node {
                name,
                start: name == self.starting_state(),
                accept: self.accept_states().contains(name),
            })
            .collect();

        let mut edges = Vec::new();
        for from in self.states() {
            let targets = self
                .alphabet()
                .iter()
                .filter_map(|&symbol| Some((self.delta(from, symbol)?, symbol)))
                .into_group_map();
            for to in self.states() {
                if let Some(symbols) = targets.get(to.as_str()) {
                    edges.push(Edge {
                        from,
                        to,
                        label: symbols.iter().join(","),
                    });
                }
            }
        }

        write_graph(output, &settings, &nodes, &edges)
    }

    /// [`render`](Dfa::render) directly to a file.
    pub fn render_to(&self, path: impl AsRef<Path>, mut settings: RenderSettings) -> io::Result<()> {
        let mut w = create(path.as_ref(), &mut settings)?;
        self.render(&mut w, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderSettings;
    use crate::automaton::Dfa;
    use crate::gnfa::Gnfa;
    use crate::Expression;
    use pretty_assertions::assert_eq;

    fn render(g: &Gnfa, settings: RenderSettings) -> String {
        let mut out = Vec::new();
        g.render(&mut out, settings).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn gnfa() {
        let g = Gnfa::builder("g")
            .symbols(['a', 'b'])
            .start("s")
            .state("q")
            .accept("f")
            .transition("s", "q", Expression::Char('a'))
            .transition("q", "q", Expression::union(['a'.into(), 'b'.into()]))
            .transition("q", "f", Expression::Empty)
            .transition("s", "f", Expression::Null)
            .build()
            .unwrap();

        let expected = r#"digraph {
rankdir=LR;
labelloc="t";
label="example";
"s" [shape="circle"]
"__start_s" [shape="point"]
"__start_s" -> "s"
"q" [shape="circle"]
"f" [shape="doublecircle"]
"q" -> "f" [label="r."]
"q" -> "q" [label="(r| a b )"]
"s" -> "q" [label="a"]
}
"#;
        assert_eq!(
            render(&g, RenderSettings::default().with_name("example")),
            expected
        );

        let settings = RenderSettings {
            show_edge_labels: false,
            show_null_edges: true,
            title: None,
        };
        let rendered = render(&g, settings);
        assert!(rendered.contains("\"s\" -> \"f\"\n"));
        assert!(!rendered.contains("label="));
    }

    #[test]
    fn dfa() {
        let dfa: Dfa = "d\n a b\n q0 q1 q0\n*q1 q1 q1\n".parse().unwrap();
        let mut out = Vec::new();
        dfa.render(&mut out, RenderSettings::default()).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains(r#""q1" [shape="doublecircle"]"#));
        assert!(out.contains(r#""q0" -> "q0" [label="b"]"#));
        assert!(out.contains(r#""q0" -> "q1" [label="a"]"#));
        assert!(out.contains(r#""q1" -> "q1" [label="a,b"]"#));
    }
}
