//! Documentation summary from JSDoc-style comments.
//!
//! Only the last `/** ... */` block of a file is read. The structural
//! `functionality` line comes from the syntax tree, not the comment.

use lazy_static::lazy_static;
use regex::Regex;

use crate::ast::{NodeKind, SyntaxNode};

use super::types::{DocumentationSummary, ParamDoc};

lazy_static! {
    static ref DOC_BLOCK: Regex = Regex::new(r"(?s)/\*\*(.*?)\*/").unwrap();
    static ref TAG: Regex = Regex::new(r"^@(\w+)\s*(.*)$").unwrap();
    static ref PARAM: Regex =
        Regex::new(r"^(?:\{([^}]*)\}\s*)?(\[[^\]]*\]|[\w$.]+)\s*(?:-\s*)?(.*)$").unwrap();
}

/// Build the documentation summary of a parsed file.
pub fn extract(text: &str, root: &SyntaxNode) -> DocumentationSummary {
    let mut summary = last_doc_block(text)
        .map(|block| parse_block(&block))
        .unwrap_or_default();
    summary.functionality = describe_structure(root);
    summary
}

/// Body of the last doc block with comment decoration removed.
fn last_doc_block(text: &str) -> Option<Vec<String>> {
    let body = DOC_BLOCK.captures_iter(text).last()?.get(1)?.as_str();
    Some(
        body.lines()
            .map(|line| {
                let line = line.trim();
                let line = line.strip_prefix('*').unwrap_or(line);
                line.trim().to_string()
            })
            .collect(),
    )
}

/// A tag and the text that belongs to it, continuation lines included.
struct TagSection {
    name: String,
    lines: Vec<String>,
}

fn parse_block(lines: &[String]) -> DocumentationSummary {
    let mut leading = Vec::new();
    let mut sections: Vec<TagSection> = Vec::new();

    for line in lines {
        if let Some(caps) = TAG.captures(line) {
            sections.push(TagSection {
                name: caps[1].to_string(),
                lines: vec![caps[2].to_string()],
            });
        } else if let Some(section) = sections.last_mut() {
            section.lines.push(line.clone());
        } else {
            leading.push(line.clone());
        }
    }

    let mut summary = DocumentationSummary::default();
    for section in sections {
        match section.name.as_str() {
            "description" => summary.purpose = join_prose(&section.lines),
            "param" | "arg" | "argument" => {
                if let Some(param) = parse_param(&join_prose(&section.lines)) {
                    summary.parameters.push(param);
                }
            }
            "returns" | "return" => summary.returns = Some(join_prose(&section.lines)),
            "example" => {
                let example = section.lines.join("\n").trim().to_string();
                if !example.is_empty() {
                    summary.examples.push(example);
                }
            }
            _ => {}
        }
    }

    if summary.purpose.is_empty() {
        summary.purpose = join_prose(&leading);
    }
    summary
}

fn join_prose(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_param(text: &str) -> Option<ParamDoc> {
    let caps = PARAM.captures(text)?;
    let type_name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let raw_name = &caps[2];
    let bracketed = raw_name.starts_with('[');
    let name = raw_name
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split('=')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    Some(ParamDoc {
        optional: type_name.contains('?') || bracketed,
        name,
        type_name,
        description: caps[3].trim().to_string(),
    })
}

/// One-line structural summary: counts of top-level building blocks.
pub fn describe_structure(root: &SyntaxNode) -> String {
    let (mut functions, mut classes, mut imports, mut exports) = (0, 0, 0, 0);
    for node in root.descendants() {
        match node.kind {
            NodeKind::Function => functions += 1,
            NodeKind::Class => classes += 1,
            NodeKind::Import(_) => imports += 1,
            NodeKind::ExportNamed(_) | NodeKind::ExportDefault => exports += 1,
            _ => {}
        }
    }

    [
        (functions, "function"),
        (classes, "class"),
        (imports, "import"),
        (exports, "export"),
    ]
    .iter()
    .map(|&(count, noun)| plural(count, noun))
    .collect::<Vec<_>>()
    .join(", ")
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.ends_with('s')) {
        (1, _) => format!("1 {}", noun),
        (_, true) => format!("{} {}es", count, noun),
        _ => format!("{} {}s", count, noun),
    }
}
