use derive_more::Display;
use tracing::debug;

use crate::tree::NodeKind;

/// Tee and corner glyphs that open a branch marker such as `├──` or `|--`
const BRANCH_GLYPHS: [char; 7] = ['├', '└', '┣', '┗', '|', '+', '`'];
/// Box-drawing horizontals; a single one after a branch glyph is enough
const BOX_HORIZONTALS: [char; 2] = ['─', '━'];
/// ASCII horizontal; two are needed so names like `+-x` are not eaten
const ASCII_HORIZONTAL: char = '-';
const VERTICAL_GLYPHS: [char; 3] = ['│', '┃', '|'];
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];
const COMMENT_MARKER: char = '#';
const DIRECTORY_ICON: &str = "📁";
const FILE_ICON: &str = "📄";

pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// A single classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// 1-based line number in the (dedented) input
    pub line: usize,
    pub depth: usize,
    pub name: String,
    pub kind: NodeKind,
    pub comment: Option<String>,
    pub is_root: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WarningKind {
    #[display("entry has no name")]
    Unnamed,
    #[display("line holds only a comment")]
    CommentOnly,
    #[display("indentation does not match a known tree pattern, treated as top level")]
    UnmatchedIndentation,
    #[display("name '{_0}' would escape the destination folder")]
    UnsafeName(String),
    #[display("input has no root line, using '{_0}'")]
    MissingRoot(String),
}

/// Non-fatal problem found while reading the tree
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("line {line}: {kind}")]
pub struct ParseWarning {
    pub line: usize,
    pub kind: WarningKind,
}

/// Turns raw lines into [`LineRecord`]s, remembering whether the root has
/// been seen and collecting warnings for lines it has to drop.
#[derive(Debug)]
pub struct LineClassifier {
    indent_width: usize,
    root_decided: bool,
    warnings: Vec<ParseWarning>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        LineClassifier {
            indent_width: DEFAULT_INDENT_WIDTH,
            root_decided: false,
            warnings: Vec::new(),
        }
    }

    /// Width of one indentation level for lines indented with plain spaces.
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width.max(1);
        self
    }

    pub fn classify(&mut self, line_number: usize, line: &str) -> Option<LineRecord> {
        let line = line.trim_end();
        if line.is_empty() {
            return None;
        }

        let prefix = scan_prefix(line, self.indent_width);
        let (icon_kind, remainder) = strip_icon(&line[prefix.consumed..]);
        let (raw_name, comment) = split_comment(remainder);

        let name = raw_name.trim_end_matches(PATH_SEPARATORS);
        if name.is_empty() {
            let kind = if comment.is_some() && raw_name.is_empty() {
                WarningKind::CommentOnly
            } else {
                WarningKind::Unnamed
            };
            self.warn(line_number, kind);
            return None;
        }

        let mut depth = prefix.depth;
        if prefix.irregular && !prefix.branch {
            self.warn(line_number, WarningKind::UnmatchedIndentation);
            depth = 0;
        }

        let is_root = !self.root_decided && depth == 0 && !prefix.branch;
        let kind = if is_root {
            NodeKind::Directory
        } else {
            icon_kind.unwrap_or_else(|| infer_kind(&raw_name))
        };

        // The first named line settles the root, even when it is rejected below.
        self.root_decided = true;
        let unsafe_name = if is_root {
            !is_safe_root_name(name)
        } else {
            is_unsafe_name(name)
        };
        if unsafe_name {
            self.warn(line_number, WarningKind::UnsafeName(name.to_string()));
            return None;
        }

        let record = LineRecord {
            line: line_number,
            depth,
            name: name.to_string(),
            kind,
            comment,
            is_root,
        };
        debug!("Classified line {}: {:?}", line_number, record);
        Some(record)
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }

    fn warn(&mut self, line: usize, kind: WarningKind) {
        debug!("Line {}: {}", line, kind);
        self.warnings.push(ParseWarning { line, kind });
    }
}

/// Decides whether a name denotes a file or a directory.
///
/// A trailing separator always means a directory. Otherwise the last path
/// segment needs a dot followed by at least one character to be a file.
pub fn infer_kind(name: &str) -> NodeKind {
    if name.ends_with(PATH_SEPARATORS) {
        return NodeKind::Directory;
    }
    let last_segment = name.rsplit(PATH_SEPARATORS).next().unwrap_or(name);
    match last_segment.rfind('.') {
        Some(dot) if dot + 1 < last_segment.len() => NodeKind::File,
        _ => NodeKind::Directory,
    }
}

/// Whether a line starts with a tree-drawing glyph, ignoring leading spaces.
pub fn starts_with_tree_glyph(line: &str) -> bool {
    line.trim_start_matches(is_space)
        .starts_with(|c: char| BRANCH_GLYPHS.contains(&c) || VERTICAL_GLYPHS.contains(&c))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Prefix {
    consumed: usize,
    depth: usize,
    branch: bool,
    irregular: bool,
}

fn scan_prefix(line: &str, indent_width: usize) -> Prefix {
    let mut prefix = Prefix::default();
    loop {
        let rest = &line[prefix.consumed..];
        if let Some(len) = branch_marker_len(rest) {
            prefix.consumed += len;
            prefix.depth += 1;
            prefix.branch = true;
            break;
        }
        if let Some(len) = continuation_len(rest) {
            prefix.consumed += len;
            prefix.depth += 1;
            continue;
        }

        let spaces = rest.chars().take_while(|c| is_space(*c)).count();
        if spaces == 0 {
            break;
        }
        let unit = spaces.min(indent_width);
        prefix.consumed += rest.chars().take(unit).map(char::len_utf8).sum::<usize>();
        if unit == indent_width {
            prefix.depth += 1;
        } else {
            prefix.irregular = true;
        }
    }
    prefix
}

fn branch_marker_len(text: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let (_, glyph) = chars.next()?;
    if !BRANCH_GLYPHS.contains(&glyph) {
        return None;
    }

    let mut end = glyph.len_utf8();
    let (mut box_count, mut ascii_count) = (0, 0);
    for (index, c) in chars {
        if BOX_HORIZONTALS.contains(&c) {
            box_count += 1;
        } else if c == ASCII_HORIZONTAL {
            ascii_count += 1;
        } else {
            break;
        }
        end = index + c.len_utf8();
    }
    if box_count == 0 && ascii_count < 2 {
        return None;
    }

    end += text[end..]
        .chars()
        .take_while(|c| is_space(*c))
        .map(char::len_utf8)
        .sum::<usize>();
    Some(end)
}

fn continuation_len(text: &str) -> Option<usize> {
    let glyph = text.chars().next()?;
    if glyph == '\t' {
        return Some(1);
    }
    if !VERTICAL_GLYPHS.contains(&glyph) {
        return None;
    }

    let mut end = glyph.len_utf8();
    let after = &text[end..];
    if after.starts_with('\t') {
        end += 1;
    } else {
        end += after
            .chars()
            .take_while(|c| is_space(*c))
            .take(3)
            .map(char::len_utf8)
            .sum::<usize>();
    }
    Some(end)
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\u{a0}'
}

fn strip_icon(text: &str) -> (Option<NodeKind>, &str) {
    if let Some(rest) = text.strip_prefix(DIRECTORY_ICON) {
        (Some(NodeKind::Directory), rest.trim_start())
    } else if let Some(rest) = text.strip_prefix(FILE_ICON) {
        (Some(NodeKind::File), rest.trim_start())
    } else {
        (None, text)
    }
}

/// Splits `name # comment`. A name wrapped in quotes may contain `#`.
fn split_comment(text: &str) -> (String, Option<String>) {
    let text = text.trim();
    if let Some(quote) = text.chars().next().filter(|c| *c == '"' || *c == '\'') {
        if let Some(close) = text[1..].find(quote) {
            let quoted = &text[1..1 + close];
            let (tail, comment) = split_unquoted(&text[2 + close..]);
            return (format!("{quoted}{tail}"), comment);
        }
    }
    split_unquoted(text)
}

fn split_unquoted(text: &str) -> (String, Option<String>) {
    let mut name = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c == '\\' && chars.peek().is_some_and(|(_, next)| *next == COMMENT_MARKER) {
            chars.next();
            name.push(COMMENT_MARKER);
            previous = Some(COMMENT_MARKER);
            continue;
        }
        if c == COMMENT_MARKER && previous.is_none_or(char::is_whitespace) {
            let comment = text[index + c.len_utf8()..].trim();
            let comment = (!comment.is_empty()).then(|| comment.to_string());
            return (name.trim().to_string(), comment);
        }
        name.push(c);
        previous = Some(c);
    }

    (name.trim().to_string(), None)
}

/// Whether `name` may name the top folder: `.` for the destination itself, or
/// a relative name that stays below it.
pub fn is_safe_root_name(name: &str) -> bool {
    name == "." || (!name.trim().is_empty() && !is_unsafe_name(name))
}

fn is_unsafe_name(name: &str) -> bool {
    name.starts_with(PATH_SEPARATORS)
        || name
            .split(PATH_SEPARATORS)
            .any(|segment| segment == "." || segment == "..")
}
