//! Markdown rendering (thread tree -> text).
//!
//! The output shapes are fixed by the export contract, so this is a direct
//! line-oriented serializer rather than a trip through a CommonMark AST.

use crate::ir::nodes::{Block, Inline, Message, Thread};
use crate::options::ConversionOptions;

/// Render a converted thread to a single Markdown document.
pub fn render_thread(thread: &Thread, opts: &ConversionOptions) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(meta) = &thread.meta {
        if let Some(title) = &meta.title {
            sections.push(format!("# {title}"));
        }
        if let Some(url) = &meta.source_url {
            sections.push(format!("**Source:** {url}"));
        }
        sections.push(format!("**Exported:** {}", meta.exported_at));
        sections.push("---".to_string());
    }

    for message in &thread.messages {
        sections.push(render_message(message, opts));
    }

    let mut doc = sections.join("\n\n");
    doc.push('\n');
    doc
}

/// Render one message: `### role[ — timestamp]`, blank line, body.
pub fn render_message(message: &Message, opts: &ConversionOptions) -> String {
    let mut header = format!("### {}", message.role.as_str());
    if let Some(ts) = &message.timestamp {
        header.push_str(&format!(" — {ts}"));
    }

    let mut parts = vec![header];
    for block in &message.body {
        parts.push(render_block(block, opts));
    }
    parts.join("\n\n")
}

pub fn render_block(block: &Block, opts: &ConversionOptions) -> String {
    match block {
        Block::Heading { level, text } => {
            let level = (*level).clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), text)
        }
        Block::Paragraph(inlines) => {
            let mut out = String::new();
            for inline in inlines {
                out.push_str(&render_inline(inline, opts));
            }
            out.trim().to_string()
        }
        Block::CodeFence { language, code } => {
            format!("```{language}\n{code}\n```")
        }
        Block::List { ordered, items } => {
            let lines: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    if *ordered {
                        format!("{}. {}", i + 1, item)
                    } else {
                        format!("- {item}")
                    }
                })
                .collect();
            lines.join("\n")
        }
        Block::Blockquote(text) => text
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::MathBlock(source) => format!("$$\n{source}\n$$"),
    }
}

pub fn render_inline(inline: &Inline, opts: &ConversionOptions) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Code(code) => format!("`{}`", code.replace('`', "\\`")),
        Inline::Link { text, href } => format!("[{text}]({href})"),
        Inline::Image { alt, src } => {
            if opts.collapse_images {
                let label = if alt.is_empty() { "img" } else { alt };
                format!("[image: {label}]({src})")
            } else {
                format!("![{alt}]({src})")
            }
        }
        Inline::Math(source) => format!("${source}$"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::{Role, ThreadMeta};

    fn opts() -> ConversionOptions {
        ConversionOptions::default()
    }

    #[test]
    fn renders_link_exactly() {
        let inline = Inline::Link {
            text: "Go".to_string(),
            href: "https://x".to_string(),
        };
        assert_eq!(render_inline(&inline, &opts()), "[Go](https://x)");
    }

    #[test]
    fn escapes_backticks_in_inline_code() {
        let inline = Inline::Code("a`b".to_string());
        assert_eq!(render_inline(&inline, &opts()), "`a\\`b`");
    }

    #[test]
    fn image_collapse_switches_to_text_link() {
        let image = Inline::Image {
            alt: "cat".to_string(),
            src: "pic.png".to_string(),
        };
        assert_eq!(render_inline(&image, &opts()), "![cat](pic.png)");

        let collapsed = ConversionOptions {
            collapse_images: true,
            ..ConversionOptions::default()
        };
        assert_eq!(render_inline(&image, &collapsed), "[image: cat](pic.png)");

        let no_alt = Inline::Image {
            alt: String::new(),
            src: "pic.png".to_string(),
        };
        assert_eq!(render_inline(&no_alt, &collapsed), "[image: img](pic.png)");
    }

    #[test]
    fn code_fence_carries_language_tag() {
        let block = Block::CodeFence {
            language: "py".to_string(),
            code: "print(1)".to_string(),
        };
        assert_eq!(render_block(&block, &opts()), "```py\nprint(1)\n```");
    }

    #[test]
    fn ordered_list_numbers_from_one() {
        let block = Block::List {
            ordered: true,
            items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert_eq!(render_block(&block, &opts()), "1. a\n2. b\n3. c");
    }

    #[test]
    fn blockquote_prefixes_every_line() {
        let block = Block::Blockquote("one\ntwo".to_string());
        assert_eq!(render_block(&block, &opts()), "> one\n> two");
    }

    #[test]
    fn message_header_includes_timestamp_when_present() {
        let message = Message {
            role: Role::User,
            timestamp: Some("2025-08-07T10:00:00Z".to_string()),
            body: vec![Block::Paragraph(vec![Inline::Text("hi".to_string())])],
        };
        let rendered = render_message(&message, &opts());
        assert_eq!(rendered, "### user — 2025-08-07T10:00:00Z\n\nhi");
    }

    #[test]
    fn thread_preamble_precedes_messages() {
        let thread = Thread {
            meta: Some(ThreadMeta {
                title: Some("My Thread".to_string()),
                source_url: Some("https://chat.example/c/1".to_string()),
                exported_at: "2025-08-07T10:00:00Z".to_string(),
            }),
            messages: vec![Message {
                role: Role::Assistant,
                timestamp: None,
                body: vec![Block::Paragraph(vec![Inline::Text("hello".to_string())])],
            }],
        };
        let doc = render_thread(&thread, &opts());
        assert!(doc.ends_with("hello\n"), "document ends with a newline");
        insta::assert_snapshot!(doc.trim_end(), @r"
        # My Thread

        **Source:** https://chat.example/c/1

        **Exported:** 2025-08-07T10:00:00Z

        ---

        ### assistant

        hello
        ");
    }
}
