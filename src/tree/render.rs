use colored::Colorize;

use crate::parser::infer_kind;
use crate::tree::{Node, NodeKind};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUATION: &str = "│   ";
const BLANK: &str = "    ";
const DIRECTORY_ICON: &str = "📁";
const FILE_ICON: &str = "📄";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Icons and comments for a human-readable preview
    Decorated { color: bool },
    /// Names with trailing `/` on directories, suitable for parsing again.
    /// Files without an extension carry the `📄` hint.
    Plain,
}

/// Renders `root` as an ASCII tree, one entry per line.
pub fn render(root: &Node, style: RenderStyle) -> String {
    let mut out = String::new();
    write_entry(&mut out, root, style);
    write_children(&mut out, &root.children, "", style);
    out
}

fn write_children(out: &mut String, children: &[Node], indent: &str, style: RenderStyle) {
    for (index, child) in children.iter().enumerate() {
        let is_last = index + 1 == children.len();
        out.push_str(indent);
        out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
        write_entry(out, child, style);

        if !child.children.is_empty() {
            let nested = format!("{indent}{}", if is_last { BLANK } else { CONTINUATION });
            write_children(out, &child.children, &nested, style);
        }
    }
}

fn write_entry(out: &mut String, node: &Node, style: RenderStyle) {
    match style {
        RenderStyle::Plain => {
            // Files whose name reads as a directory keep their kind through the icon.
            if node.is_file() && infer_kind(&node.name) != NodeKind::File {
                out.push_str(FILE_ICON);
                out.push(' ');
            }
            out.push_str(&node.name.replace('#', "\\#"));
            if node.is_directory() {
                out.push('/');
            }
            if let Some(comment) = &node.comment {
                out.push_str(" # ");
                out.push_str(comment);
            }
        }
        RenderStyle::Decorated { color } => {
            let icon = if node.is_directory() {
                DIRECTORY_ICON
            } else {
                FILE_ICON
            };
            let name = match (color, node.is_directory()) {
                (true, true) => node.name.blue().bold().to_string(),
                _ => node.name.clone(),
            };
            out.push_str(&format!("{icon} {name}"));
            if let Some(comment) = &node.comment {
                let comment = format!("# {comment}");
                let comment = if color {
                    comment.dimmed().to_string()
                } else {
                    comment
                };
                out.push_str(&format!("  {comment}"));
            }
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::directory("my-project");
        root.push_child(Node::new(
            "README.md",
            NodeKind::File,
            Some("Project overview".into()),
        ));
        let mut src = Node::directory("src");
        src.push_child(Node::new("main.py", NodeKind::File, None));
        src.push_child(Node::new("utils.py", NodeKind::File, None));
        root.push_child(src);
        let mut tests = Node::directory("tests");
        tests.push_child(Node::new("test_main.py", NodeKind::File, None));
        root.push_child(tests);
        root
    }

    #[test]
    fn plain_render() {
        let expected = "\
my-project/
├── README.md # Project overview
├── src/
│   ├── main.py
│   └── utils.py
└── tests/
    └── test_main.py
";
        assert_eq!(render(&sample(), RenderStyle::Plain), expected);
    }

    #[test]
    fn decorated_render_without_color() {
        let expected = "\
📁 my-project
├── 📄 README.md  # Project overview
├── 📁 src
│   ├── 📄 main.py
│   └── 📄 utils.py
└── 📁 tests
    └── 📄 test_main.py
";
        assert_eq!(
            render(&sample(), RenderStyle::Decorated { color: false }),
            expected
        );
    }

    #[test]
    fn plain_render_escapes_comment_markers() {
        let mut root = Node::directory("root");
        root.push_child(Node::new("notes #1.txt", NodeKind::File, None));
        assert_eq!(
            render(&root, RenderStyle::Plain),
            "root/\n└── notes \\#1.txt\n"
        );
    }

    #[test]
    fn plain_render_marks_files_without_extension() {
        let mut root = Node::directory("root");
        root.push_child(Node::new("LICENSE", NodeKind::File, None));
        root.push_child(Node::new("main.rs", NodeKind::File, None));
        assert_eq!(
            render(&root, RenderStyle::Plain),
            "root/\n├── 📄 LICENSE\n└── main.rs\n"
        );
    }

    #[test]
    fn single_node() {
        assert_eq!(
            render(&Node::directory("alone"), RenderStyle::Plain),
            "alone/\n"
        );
    }
}
