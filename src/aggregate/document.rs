//! Final Markdown document assembly.

use std::fmt::Write;

use super::language::fence_language;
use crate::types::PageFragment;
use crate::walker::WalkOutput;

/// Concatenate page fragments in crawl completion order
pub fn render_web(fragments: &[PageFragment]) -> String {
    let mut doc = String::new();
    for fragment in fragments {
        let markdown = fragment.markdown.trim();
        if markdown.is_empty() {
            continue;
        }
        let _ = write!(
            doc,
            "\n\n## Source URL: {}\n\n{}\n\n---\n\n",
            fragment.url, markdown
        );
    }
    doc.trim().to_string()
}

/// Render the tree followed by every file, sorted by relative path
pub fn render_directory(root_name: &str, output: WalkOutput) -> String {
    let WalkOutput { tree, mut files } = output;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut doc = String::new();
    let _ = write!(doc, "# Directory Structure and Content: {}\n\n", root_name);
    let _ = write!(doc, "## Directory Tree\n\n```\n{}\n{}```\n", root_name, tree);
    doc.push_str("\n\n## File Contents\n");

    for file in &files {
        let _ = write!(
            doc,
            "\n\n### File: `{}`\n\n```{}\n{}\n```\n\n---\n",
            file.relative_path,
            fence_language(&file.relative_path),
            file
        );
    }

    doc.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileContent, FileDescriptor};
    use url::Url;

    fn text(path: &str, content: &str) -> FileDescriptor {
        FileDescriptor::new(path, FileContent::Text(content.to_string()))
    }

    #[test]
    fn test_files_sorted_by_path() {
        let output = WalkOutput {
            tree: "├── b.txt\n└── a.txt\n".to_string(),
            files: vec![text("b.txt", "hi"), text("a.txt", "yo")],
        };
        let doc = render_directory("proj", output);

        let a = doc.find("### File: `a.txt`").unwrap();
        let b = doc.find("### File: `b.txt`").unwrap();
        assert!(a < b);

        // Tree keeps enumeration order
        let tree_b = doc.find("├── b.txt").unwrap();
        let tree_a = doc.find("└── a.txt").unwrap();
        assert!(tree_b < tree_a);
    }

    #[test]
    fn test_directory_layout() {
        let output = WalkOutput {
            tree: "└── main.rs\n".to_string(),
            files: vec![text("main.rs", "fn main() {}")],
        };
        let doc = render_directory("proj", output);

        assert_eq!(
            doc,
            "# Directory Structure and Content: proj\n\n\
             ## Directory Tree\n\n```\nproj\n└── main.rs\n```\n\n\n\
             ## File Contents\n\n\n\
             ### File: `main.rs`\n\n```rust\nfn main() {}\n```\n\n---"
        );
    }

    #[test]
    fn test_markers_inside_fences() {
        let output = WalkOutput {
            tree: String::new(),
            files: vec![
                FileDescriptor::new(
                    "logo.png",
                    FileContent::Omitted {
                        extension: ".png".to_string(),
                    },
                ),
                text("empty.txt", ""),
            ],
        };
        let doc = render_directory("proj", output);

        assert!(doc.contains("```\n[Content omitted (file type: .png)]\n```"));
        assert!(doc.contains("```\n[EMPTY FILE]\n```"));
    }

    #[test]
    fn test_web_fragments_in_order() {
        let fragments = vec![
            PageFragment {
                url: Url::parse("https://x.test/").unwrap(),
                depth: 0,
                markdown: "# Home\n".to_string(),
            },
            PageFragment {
                url: Url::parse("https://x.test/about").unwrap(),
                depth: 1,
                markdown: "About us".to_string(),
            },
        ];

        assert_eq!(
            render_web(&fragments),
            "## Source URL: https://x.test/\n\n# Home\n\n---\n\n\n\n\
             ## Source URL: https://x.test/about\n\nAbout us\n\n---"
        );
    }

    #[test]
    fn test_no_fragments_is_empty() {
        assert!(render_web(&[]).is_empty());
    }
}
