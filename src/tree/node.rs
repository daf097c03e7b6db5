use derive_more::Display;

/// Kind of filesystem entry a [`Node`] stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

/// One entry to be created, with its children in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub comment: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind, comment: Option<String>) -> Self {
        Node {
            name: name.into(),
            kind,
            comment,
            children: Vec::new(),
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Directory, None)
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Appends `child` as the last child. A file that receives children
    /// becomes a directory.
    pub fn push_child(&mut self, child: Node) {
        if self.is_file() {
            tracing::debug!(
                "Promoting '{}' to a directory because it has children",
                self.name
            );
            self.kind = NodeKind::Directory;
        }
        self.children.push(child);
    }

    /// Pre-order traversal yielding each node with its depth (root = 0).
    pub fn walk(&self) -> impl Iterator<Item = (usize, &Node)> {
        let mut pending = vec![(0, self)];
        std::iter::from_fn(move || {
            let (depth, node) = pending.pop()?;
            pending.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }

    /// Total number of nodes, the root included.
    pub fn count(&self) -> usize {
        self.walk().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::directory("root");
        let mut src = Node::directory("src");
        src.push_child(Node::new("main.rs", NodeKind::File, None));
        root.push_child(src);
        root.push_child(Node::new("README.md", NodeKind::File, Some("docs".into())));
        root
    }

    #[test]
    fn walk_is_pre_order_with_depths() {
        let root = sample();
        let visited = root
            .walk()
            .map(|(depth, node)| (depth, node.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            visited,
            vec![(0, "root"), (1, "src"), (2, "main.rs"), (1, "README.md")]
        );
    }

    #[test]
    fn count_includes_root() {
        assert_eq!(sample().count(), 4);
        assert_eq!(Node::directory("alone").count(), 1);
    }

    #[test]
    fn pushing_into_a_file_promotes_it() {
        let mut conf = Node::new("conf.d", NodeKind::File, None);
        conf.push_child(Node::new("10-base.conf", NodeKind::File, None));
        assert!(conf.is_directory());
        assert_eq!(conf.children.len(), 1);
    }

    #[test]
    fn kind_display() {
        assert_eq!(NodeKind::File.to_string(), "file");
        assert_eq!(NodeKind::Directory.to_string(), "directory");
    }
}
