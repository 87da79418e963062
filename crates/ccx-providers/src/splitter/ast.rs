//! Structural splitter
//!
//! Parses source with tree-sitter and chunks along top-level declarations.
//! Import statements cluster into one chunk, stray top-level statements and
//! comments accumulate into filler chunks, and chunk spans tile the file so
//! every line is covered. Oversized chunks are subdivided by the size
//! splitter; undersized ones coalesce with the following sibling.
//!
//! Unknown languages, parser setup failures and parses that produce no
//! usable top-level structure all degrade to the size splitter, so `split`
//! is total.

use super::profiles::{self, LanguageProfile};
use super::size::SizeSplitter;
use super::SplitterConfig;
use ccx_domain::entities::CodeChunk;
use ccx_domain::ports::CodeSplitter;
use std::path::Path;
use tracing::trace;
use tree_sitter::Parser;

/// Classification of a top-level node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    /// A declaration boundary: chunk of its own
    Declaration,
    /// An import-like statement: clusters with adjacent imports
    Import,
    /// Anything else: accumulates until the next boundary
    Filler,
}

/// A candidate chunk span in 1-based inclusive file lines
#[derive(Debug, Clone, Copy)]
struct Span {
    start: u32,
    end: u32,
    kind: SpanKind,
}

/// Language-aware structural splitter with size-based degradation
#[derive(Debug, Clone, Default)]
pub struct AstSplitter {
    config: SplitterConfig,
}

impl AstSplitter {
    /// Create a splitter with default sizing
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a splitter with explicit sizing
    pub fn with_config(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Attempt structural chunking; `None` requests size-based fallback
    fn try_structural(
        &self,
        content: &str,
        language: &str,
        file_path: &Path,
    ) -> Option<Vec<CodeChunk>> {
        let grammar = profiles::grammar_for(language, file_path)?;
        let profile = profiles::profile_for(language)?;

        let mut parser = Parser::new();
        parser.set_language(&grammar).ok()?;
        let tree = parser.parse(content, None)?;
        let root = tree.root_node();

        let lines: Vec<&str> = content.lines().collect();
        let spans = self.collect_spans(&root, profile, &lines);
        if spans.is_empty() {
            return None;
        }

        Some(self.emit_chunks(&spans, &lines, language, file_path))
    }

    /// Walk the root's children into classified, clustered, tiled spans
    fn collect_spans(
        &self,
        root: &tree_sitter::Node<'_>,
        profile: &LanguageProfile,
        lines: &[&str],
    ) -> Vec<Span> {
        let line_count = lines.len() as u32;
        let mut spans: Vec<Span> = Vec::new();
        let mut cursor = root.walk();

        for node in root.named_children(&mut cursor) {
            let start = node.start_position().row as u32 + 1;
            let end = (node.end_position().row as u32 + 1).min(line_count).max(start);
            let kind = classify(node.kind(), profile);

            // Adjacent imports cluster; adjacent filler accumulates.
            if let Some(last) = spans.last_mut() {
                let mergeable = matches!(kind, SpanKind::Import | SpanKind::Filler);
                if last.kind == kind && mergeable {
                    last.end = last.end.max(end);
                    continue;
                }
            }
            spans.push(Span { start, end, kind });
        }

        if spans.is_empty() {
            return spans;
        }

        // Spans tile the file: each starts right after the previous end,
        // covering blank lines between declarations and collapsing overlap.
        // The first span owns the top of the file.
        spans[0].start = 1;
        for i in 1..spans.len() {
            let prev_end = spans[i - 1].end;
            spans[i].start = prev_end + 1;
            if spans[i].end < spans[i].start {
                spans[i].end = spans[i].start;
            }
        }

        self.coalesce_small(spans, lines)
    }

    /// Merge spans shorter than `min_chunk_size` into the following sibling
    fn coalesce_small(&self, spans: Vec<Span>, lines: &[&str]) -> Vec<Span> {
        let mut result: Vec<Span> = Vec::with_capacity(spans.len());
        let mut pending: Option<Span> = None;

        for span in spans {
            let merged = match pending.take() {
                Some(prev) => Span {
                    start: prev.start,
                    end: span.end,
                    kind: span.kind,
                },
                None => span,
            };
            if span_chars(merged, lines) < self.config.min_chunk_size {
                pending = Some(merged);
            } else {
                result.push(merged);
            }
        }

        // A trailing small span joins its predecessor instead.
        if let Some(last) = pending {
            match result.last_mut() {
                Some(prev) => prev.end = last.end,
                None => result.push(last),
            }
        }

        result
    }

    /// Slice spans out of the source and subdivide oversized ones
    fn emit_chunks(
        &self,
        spans: &[Span],
        lines: &[&str],
        language: &str,
        file_path: &Path,
    ) -> Vec<CodeChunk> {
        let size_splitter = SizeSplitter::from_config(&self.config);
        let mut chunks = Vec::with_capacity(spans.len());

        for span in spans {
            let start_idx = (span.start - 1) as usize;
            let end_idx = (span.end as usize).min(lines.len());
            if start_idx >= end_idx {
                continue;
            }
            let text = lines[start_idx..end_idx].join("\n");
            if text.trim().is_empty() {
                continue;
            }

            if text.chars().count() > self.config.max_chunk_size {
                trace!(
                    start = span.start,
                    end = span.end,
                    "subdividing oversized structural chunk"
                );
                for window in size_splitter.split_text(&text) {
                    chunks.push(CodeChunk::new(
                        window.text,
                        language,
                        file_path,
                        span.start + window.start_line - 1,
                        span.start + window.end_line - 1,
                    ));
                }
            } else {
                chunks.push(CodeChunk::new(
                    text,
                    language,
                    file_path,
                    span.start,
                    span.end,
                ));
            }
        }

        chunks
    }
}

impl CodeSplitter for AstSplitter {
    fn split(&self, content: &str, language: &str, file_path: &Path) -> Vec<CodeChunk> {
        if content.trim().is_empty() {
            return Vec::new();
        }
        if let Some(chunks) = self.try_structural(content, language, file_path) {
            if !chunks.is_empty() {
                return chunks;
            }
        }
        SizeSplitter::from_config(&self.config).split(content, language, file_path)
    }
}

/// Character length of a span, newlines included
fn span_chars(span: Span, lines: &[&str]) -> usize {
    let start = (span.start - 1) as usize;
    let end = (span.end as usize).min(lines.len());
    if start >= end {
        return 0;
    }
    lines[start..end]
        .iter()
        .map(|line| line.chars().count() + 1)
        .sum()
}

fn classify(kind: &str, profile: &LanguageProfile) -> SpanKind {
    if profile.imports.contains(&kind) {
        SpanKind::Import
    } else if profile.declarations.contains(&kind) {
        SpanKind::Declaration
    } else {
        SpanKind::Filler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Coalescing off so small fixtures keep one chunk per declaration
    fn split(content: &str, language: &str, file: &str) -> Vec<CodeChunk> {
        AstSplitter::with_config(SplitterConfig {
            min_chunk_size: 0,
            ..SplitterConfig::default()
        })
        .split(content, language, Path::new(file))
    }

    fn assert_covers_all_lines(chunks: &[CodeChunk], content: &str) {
        let line_count = content.lines().count() as u32;
        let last_nonblank = content
            .lines()
            .collect::<Vec<_>>()
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0);
        let mut covered = vec![false; line_count as usize + 1];
        for chunk in chunks {
            for line in chunk.start_line..=chunk.end_line {
                covered[line as usize] = true;
            }
        }
        for line in 1..=last_nonblank {
            assert!(covered[line as usize], "line {line} not covered");
        }
    }

    #[test]
    fn rust_declarations_become_chunks() {
        let content = "\
use std::fmt;

const LIMIT: usize = 8;

pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

fn helper() -> usize {
    LIMIT
}
";
        let chunks = split(content, "rust", "/src/point.rs");
        assert!(chunks.len() >= 3, "expected several chunks, got {chunks:#?}");
        assert!(chunks[0].content.contains("use std::fmt"));
        assert!(chunks.iter().any(|c| c.content.contains("impl Point")));
        assert_covers_all_lines(&chunks, content);

        // Spans are non-decreasing.
        for pair in chunks.windows(2) {
            assert!(pair[1].start_line >= pair[0].start_line);
        }
    }

    #[test]
    fn python_functions_and_classes() {
        let content = "\
import os
import sys

def entry(argv):
    return run(argv)

class Runner:
    def run(self, argv):
        return os.getpid()
";
        let chunks = split(content, "python", "/app/main.py");
        assert!(chunks.iter().any(|c| c.content.contains("def entry")));
        assert!(chunks.iter().any(|c| c.content.contains("class Runner")));
        assert_covers_all_lines(&chunks, content);
    }

    #[test]
    fn import_cluster_is_one_chunk() {
        let content = "\
import os
import sys
import json
import re


def solo():
    return 1
";
        let chunks = AstSplitter::with_config(SplitterConfig {
            min_chunk_size: 0,
            ..SplitterConfig::default()
        })
        .split(content, "python", Path::new("/app/i.py"));

        let import_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.content.contains("import os"))
            .collect();
        assert_eq!(import_chunks.len(), 1);
        assert!(import_chunks[0].content.contains("import re"));
    }

    #[test]
    fn typescript_interfaces_split() {
        let content = "\
import { api } from './api';

export interface User {
    id: string;
    name: string;
}

export function load(id: string): Promise<User> {
    return api.get(id);
}
";
        let chunks = split(content, "typescript", "/web/user.ts");
        assert!(chunks.iter().any(|c| c.content.contains("interface User")));
        assert_covers_all_lines(&chunks, content);
    }

    #[test]
    fn oversized_declaration_is_subdivided() {
        let body: String = (0..120)
            .map(|i| format!("    let v{i} = {i} + {i};"))
            .collect::<Vec<_>>()
            .join("\n");
        let content = format!("fn big() {{\n{body}\n}}\n");

        let chunks = AstSplitter::with_config(SplitterConfig {
            max_chunk_size: 300,
            overlap: 0,
            min_chunk_size: 0,
        })
        .split(&content, "rust", Path::new("/src/big.rs"));

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].start_line, 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 300);
        }
        assert_covers_all_lines(&chunks, &content);
    }

    #[test]
    fn unknown_language_falls_back_to_size_splitting() {
        let content = "plain prose, no grammar here.\nsecond line.\n";
        let chunks = split(content, "text", "/notes/readme.txt");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 2);
    }

    #[test]
    fn blank_input_yields_no_chunks() {
        assert!(split("", "rust", "/src/e.rs").is_empty());
        assert!(split("\n\n\n", "python", "/src/e.py").is_empty());
    }

    #[test]
    fn nonblank_input_yields_at_least_one_chunk() {
        for (content, language, file) in [
            ("x", "text", "/a.txt"),
            ("fn f() {}", "rust", "/a.rs"),
            ("{ broken", "rust", "/b.rs"),
            ("y = ", "python", "/c.py"),
        ] {
            let chunks = split(content, language, file);
            assert!(!chunks.is_empty(), "no chunks for {language}: {content:?}");
        }
    }

    #[test]
    fn small_siblings_coalesce() {
        let content = "\
const A: u8 = 1;
const B: u8 = 2;

fn combined() -> u8 {
    A + B
}
";
        // Every declaration here is below the threshold, so they merge.
        let chunks = AstSplitter::with_config(SplitterConfig {
            min_chunk_size: 200,
            ..SplitterConfig::default()
        })
        .split(content, "rust", Path::new("/src/consts.rs"));

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("const A"));
        assert!(chunks[0].content.contains("fn combined"));
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 6);
    }

    #[test]
    fn go_top_level_declarations() {
        let content = "\
package main

import \"fmt\"

func main() {
    fmt.Println(\"hello\")
}
";
        let chunks = split(content, "go", "/cmd/main.go");
        assert!(chunks.iter().any(|c| c.content.contains("func main")));
        assert_covers_all_lines(&chunks, content);
    }
}
