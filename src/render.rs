use std::{collections::VecDeque, fmt, io};

use crate::{Color, NodeRef, RedBlackTree};

impl<K: fmt::Display> RedBlackTree<K> {
    /// Writes an indented rendering of the tree's keys and colors to `w`.
    ///
    /// ```text
    /// 55 [B]
    /// ├── 40 [B]
    /// │   ├── ·
    /// │   └── 42 [R]
    /// └── 58 [B]
    /// ```
    pub fn write_tree<W: fmt::Write>(&self, mut w: W) -> fmt::Result {
        let root = self.get_root();
        if root.is_null() {
            return writeln!(w, "(empty)");
        }

        write_label(&mut w, root)?;

        let mut prefix = String::new();
        write_children(&mut w, root, &mut prefix)
    }

    /// Prints [`write_tree`](Self::write_tree)'s rendering to standard output.
    pub fn print_tree(&self) -> io::Result<()> {
        use io::Write;

        let mut out = String::new();
        self.write_tree(&mut out)
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "formatting failed"))?;

        io::stdout().lock().write_all(out.as_bytes())
    }

    /// Writes the tree as a Graphviz digraph named `name`, one rank per tree level.
    ///
    /// Only the root, child links and colors are consulted.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, mut w: W) -> fmt::Result {
        use fmt::Write;

        let root = self.get_root();
        if root.is_null() {
            return write!(w, "digraph \"graph-{name}\" {{}}");
        }

        enum Item<'tree, T> {
            Node(NodeRef<'tree, T>, usize),
            Missing(usize),
        }

        let mut queue = VecDeque::new();
        let mut next_id = 0;
        queue.push_back(Item::Node(root, next_id));
        next_id += 1;

        writeln!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut links = String::new();

        while !queue.is_empty() {
            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let Some(item) = queue.pop_front() else {
                    break;
                };

                let (node, id) = match item {
                    Item::Node(node, id) => (node, id),
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-n{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let Some(key) = node.key() else {
                    continue;
                };
                let (fill, font) = match node.color() {
                    Color::Red => ("red", "white"),
                    Color::Black => ("black", "white"),
                };
                write!(
                    w,
                    "\"graph{name}-n{id}\" [label=\"{key}\", style=filled, fillcolor={fill}, \
                     fontcolor={font}]; "
                )?;

                for child in [node.left(), node.right()] {
                    let child_id = next_id;
                    next_id += 1;

                    if child.is_null() {
                        queue.push_back(Item::Missing(child_id));
                    } else {
                        queue.push_back(Item::Node(child, child_id));
                    }

                    writeln!(links, "\"graph{name}-n{id}\" -> \"graph{name}-n{child_id}\";")?;
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

impl<K: fmt::Display> fmt::Display for RedBlackTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f)
    }
}

fn write_label<W: fmt::Write, K: fmt::Display>(w: &mut W, node: NodeRef<'_, K>) -> fmt::Result {
    match node.key() {
        Some(key) => {
            let color = match node.color() {
                Color::Red => 'R',
                Color::Black => 'B',
            };
            writeln!(w, "{key} [{color}]")
        }
        None => writeln!(w, "·"),
    }
}

fn write_children<W: fmt::Write, K: fmt::Display>(
    w: &mut W,
    node: NodeRef<'_, K>,
    prefix: &mut String,
) -> fmt::Result {
    let (left, right) = (node.left(), node.right());
    if left.is_null() && right.is_null() {
        return Ok(());
    }

    for (child, last) in [(left, false), (right, true)] {
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        write!(w, "{prefix}{branch}")?;
        write_label(w, child)?;

        let len = prefix.len();
        prefix.push_str(indent);
        write_children(w, child, prefix)?;
        prefix.truncate(len);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::RedBlackTree;

    #[test]
    fn write_small_tree() {
        let tree: RedBlackTree<u32> = [55, 40, 58, 42].into_iter().collect();

        let mut out = String::new();
        tree.write_tree(&mut out).unwrap();

        let expected = "\
55 [B]
├── 40 [B]
│   ├── ·
│   └── 42 [R]
└── 58 [B]
";
        assert_eq!(out, expected);
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn write_empty_tree() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.to_string(), "(empty)\n");
    }

    #[test]
    fn dotgraph_colors() {
        let tree: RedBlackTree<u32> = [1, 2, 3].into_iter().collect();

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();

        assert!(out.starts_with("digraph \"graph-t\""));
        assert!(out.contains("[label=\"2\", style=filled, fillcolor=black"));
        assert!(out.contains("[label=\"1\", style=filled, fillcolor=red"));
        assert!(out.contains("[label=\"3\", style=filled, fillcolor=red"));
        assert!(out.contains("\"grapht-n0\" -> \"grapht-n1\";"));
        assert!(out.contains("\"grapht-n3\" [shape=point];"));
    }

    #[test]
    fn dotgraph_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();

        let mut out = String::new();
        tree.dotgraph("e", &mut out).unwrap();
        assert_eq!(out, "digraph \"graph-e\" {}");
    }
}
