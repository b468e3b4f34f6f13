//! HTML to Markdown conversion over a parsed `scraper` tree.
//!
//! Produces ATX headings, fenced code blocks and `*` emphasis. Whitespace in
//! text collapses everywhere except inside `<pre>`.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-line pattern"));

const FENCE: &str = "```";

/// Convert the children of `root` to Markdown
pub fn element_to_markdown(root: ElementRef<'_>) -> String {
    let mut writer = MarkdownWriter::default();
    writer.children(root);
    finish(&writer.out)
}

/// Trim line ends and collapse blank runs, leaving fenced code untouched
fn finish(raw: &str) -> String {
    let mut out = String::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut fence: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if !fence.is_empty() {
            fence.push(line);
            if line == FENCE {
                out.push_str(&fence.join("\n"));
                fence.clear();
            }
        } else if line.starts_with(FENCE) {
            push_prose(&mut out, &prose);
            prose.clear();
            fence.push(line.trim_end());
        } else {
            prose.push(line.trim_end());
        }
    }

    // unterminated fence
    out.push_str(&fence.join("\n"));
    push_prose(&mut out, &prose);
    out.trim().to_string()
}

/// Append prose lines framed by newlines so runs spanning a fence edge collapse too
fn push_prose(out: &mut String, lines: &[&str]) {
    let segment = format!("\n{}\n", lines.join("\n"));
    out.push_str(&BLANK_RUNS.replace_all(&segment, "\n\n"));
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(usize),
}

#[derive(Default)]
struct MarkdownWriter {
    out: String,
    lists: Vec<ListKind>,
}

impl MarkdownWriter {
    fn children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.text(text);
            } else if let Some(child) = ElementRef::wrap(child) {
                self.element(child);
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                let text = inline(element);
                if !text.is_empty() {
                    self.block_break();
                    self.out.push_str(&"#".repeat(level));
                    self.out.push(' ');
                    self.out.push_str(&text);
                    self.block_break();
                }
            }
            "br" => self.out.push('\n'),
            "hr" => {
                self.block_break();
                self.out.push_str("---");
                self.block_break();
            }
            "strong" | "b" => self.wrap_inline(element, "**"),
            "em" | "i" => self.wrap_inline(element, "*"),
            "code" | "kbd" | "samp" => {
                let code: String = element.text().collect();
                if !code.is_empty() {
                    self.space_if_needed();
                    self.out.push('`');
                    self.out.push_str(&code);
                    self.out.push('`');
                }
            }
            "pre" => self.pre(element),
            "a" => self.link(element),
            "ul" | "ol" => self.list(element, name == "ol"),
            "li" => self.list_item(element),
            "blockquote" => self.blockquote(element),
            "table" => self.table(element),
            "script" | "style" | "noscript" | "template" | "head" | "title" => {}
            "p" | "div" | "section" | "article" | "main" | "header" | "footer" | "figure"
            | "figcaption" | "dl" | "dt" | "dd" | "details" | "summary" | "address" => {
                self.block_break();
                self.children(element);
                self.block_break();
            }
            _ => self.children(element),
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let leading_space = text.starts_with(char::is_whitespace);
        let trailing_space = text.ends_with(char::is_whitespace);
        let words: Vec<&str> = text.split_whitespace().collect();

        if words.is_empty() {
            self.space_if_needed();
            return;
        }
        if leading_space {
            self.space_if_needed();
        }
        self.out.push_str(&words.join(" "));
        if trailing_space {
            self.out.push(' ');
        }
    }

    fn space_if_needed(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with(char::is_whitespace) {
            self.out.push(' ');
        }
    }

    fn wrap_inline(&mut self, element: ElementRef<'_>, marker: &str) {
        let text = inline(element);
        if text.is_empty() {
            return;
        }
        self.out.push_str(marker);
        self.out.push_str(&text);
        self.out.push_str(marker);
    }

    fn link(&mut self, element: ElementRef<'_>) {
        let text = inline(element);
        if text.is_empty() {
            return;
        }
        match element.value().attr("href").map(str::trim) {
            Some(href) if !href.is_empty() => {
                self.out.push_str(&format!("[{}]({})", text, href));
            }
            _ => self.out.push_str(&text),
        }
    }

    fn pre(&mut self, element: ElementRef<'_>) {
        let language = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "code")
            .and_then(|code| {
                code.value()
                    .classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let code: String = element.text().collect();

        self.block_break();
        self.out.push_str(FENCE);
        self.out.push_str(&language);
        self.out.push('\n');
        self.out.push_str(code.trim_end_matches('\n'));
        self.out.push('\n');
        self.out.push_str(FENCE);
        self.block_break();
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        if self.lists.is_empty() {
            self.block_break();
        } else {
            self.line_break();
        }
        self.lists.push(if ordered {
            ListKind::Ordered(0)
        } else {
            ListKind::Unordered
        });
        self.children(element);
        self.lists.pop();
        if self.lists.is_empty() {
            self.block_break();
        } else {
            self.line_break();
        }
    }

    fn list_item(&mut self, element: ElementRef<'_>) {
        self.line_break();
        let depth = self.lists.len().max(1);
        let marker = match self.lists.last_mut() {
            Some(ListKind::Ordered(n)) => {
                *n += 1;
                format!("{}. ", n)
            }
            _ => "- ".to_string(),
        };
        self.out.push_str(&"  ".repeat(depth - 1));
        self.out.push_str(&marker);
        self.children(element);
    }

    fn blockquote(&mut self, element: ElementRef<'_>) {
        let mut inner = MarkdownWriter::default();
        inner.children(element);
        let body = finish(&inner.out);
        if body.is_empty() {
            return;
        }
        self.block_break();
        for line in body.lines() {
            if line.is_empty() {
                self.out.push_str(">\n");
            } else {
                self.out.push_str("> ");
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
        self.block_break();
    }

    fn table(&mut self, element: ElementRef<'_>) {
        let rows: Vec<Vec<String>> = element
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "tr")
            .map(|row| {
                row.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "th" | "td"))
                    .map(|cell| inline(cell).replace('|', "\\|"))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        if rows.is_empty() {
            return;
        }

        self.block_break();
        for (index, cells) in rows.iter().enumerate() {
            self.out.push_str(&format!("| {} |\n", cells.join(" | ")));
            if index == 0 {
                self.out.push('|');
                self.out.push_str(&" --- |".repeat(cells.len()));
                self.out.push('\n');
            }
        }
        self.block_break();
    }

    fn line_break(&mut self) {
        trim_trailing_spaces(&mut self.out);
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn block_break(&mut self) {
        trim_trailing_spaces(&mut self.out);
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }
}

fn trim_trailing_spaces(out: &mut String) {
    let trimmed = out.trim_end_matches([' ', '\t']).len();
    out.truncate(trimmed);
}

/// Render an element's content on a single line
fn inline(element: ElementRef<'_>) -> String {
    let mut writer = MarkdownWriter::default();
    writer.children(element);
    writer.out.split_whitespace().collect::<Vec<_>>().join(" ")
}
