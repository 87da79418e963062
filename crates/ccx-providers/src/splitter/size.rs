//! Size-based fallback splitter
//!
//! Splits text into windows of at most `max_chunk_size` characters with
//! `overlap` characters of trailing context carried into the next window.
//! Window boundaries prefer the nearest preceding line break; only a single
//! line longer than the whole budget is hard-split mid-line.

use super::SplitterConfig;
use ccx_domain::entities::CodeChunk;
use std::path::Path;

/// A window of text with its 1-based inclusive line span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow {
    /// Window text
    pub text: String,
    /// First line, 1-based
    pub start_line: u32,
    /// Last line, 1-based inclusive
    pub end_line: u32,
}

/// Character-window splitter used as the structural splitter's fallback and
/// for oversized structural chunks.
#[derive(Debug, Clone, Copy)]
pub struct SizeSplitter {
    max_chunk_size: usize,
    overlap: usize,
}

impl SizeSplitter {
    /// Create a splitter with explicit window sizing
    pub fn new(max_chunk_size: usize, overlap: usize) -> Self {
        Self {
            // A zero budget would never make progress.
            max_chunk_size: max_chunk_size.max(1),
            overlap: overlap.min(max_chunk_size.saturating_sub(1)),
        }
    }

    /// Create a splitter from shared configuration
    pub fn from_config(config: &SplitterConfig) -> Self {
        Self::new(config.max_chunk_size, config.overlap)
    }

    /// Split text into windows. Blank-only input yields no windows.
    pub fn split_text(&self, content: &str) -> Vec<TextWindow> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let mut windows = Vec::new();
        // Window under construction: (line_number, line_text, char_len)
        let mut current: Vec<(u32, String, usize)> = Vec::new();
        let mut current_chars = 0usize;

        for (idx, line) in content.lines().enumerate() {
            let line_no = (idx + 1) as u32;
            let line_chars = line.chars().count();

            if line_chars > self.max_chunk_size {
                // A single line over budget: flush, then hard-split it.
                self.emit(&mut windows, &mut current, &mut current_chars);
                self.emit_oversized_line(&mut windows, line, line_no);
                continue;
            }

            // +1 accounts for the joining newline.
            let joined = if current.is_empty() {
                line_chars
            } else {
                current_chars + 1 + line_chars
            };
            if joined > self.max_chunk_size && !current.is_empty() {
                let carried = self.emit(&mut windows, &mut current, &mut current_chars);
                current = carried;
                current_chars = window_chars(&current);
            }

            if current.is_empty() {
                current_chars = line_chars;
            } else {
                current_chars += 1 + line_chars;
            }
            current.push((line_no, line.to_string(), line_chars));
        }

        self.emit(&mut windows, &mut current, &mut current_chars);
        windows
    }

    /// Emit the current window and return the overlap lines that seed the
    /// next one.
    fn emit(
        &self,
        windows: &mut Vec<TextWindow>,
        current: &mut Vec<(u32, String, usize)>,
        current_chars: &mut usize,
    ) -> Vec<(u32, String, usize)> {
        if current.is_empty() {
            return Vec::new();
        }
        let lines = std::mem::take(current);
        *current_chars = 0;

        let text = lines
            .iter()
            .map(|(_, line, _)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !text.trim().is_empty() {
            windows.push(TextWindow {
                text,
                start_line: lines[0].0,
                end_line: lines[lines.len() - 1].0,
            });
        }

        // Carry trailing lines into the next window, up to `overlap`
        // characters. Never carry the whole window: the next one must make
        // progress.
        let mut carried = Vec::new();
        let mut carried_chars = 0usize;
        for entry in lines.iter().rev() {
            if carried.len() + 1 >= lines.len() {
                break;
            }
            let cost = if carried.is_empty() {
                entry.2
            } else {
                entry.2 + 1
            };
            if carried_chars + cost > self.overlap {
                break;
            }
            carried_chars += cost;
            carried.push(entry.clone());
        }
        carried.reverse();
        carried
    }

    /// Hard-split one over-budget line into consecutive same-line windows
    fn emit_oversized_line(&self, windows: &mut Vec<TextWindow>, line: &str, line_no: u32) {
        let chars: Vec<char> = line.chars().collect();
        for piece in chars.chunks(self.max_chunk_size) {
            let text: String = piece.iter().collect();
            if !text.trim().is_empty() {
                windows.push(TextWindow {
                    text,
                    start_line: line_no,
                    end_line: line_no,
                });
            }
        }
    }

    /// Split into chunks directly, for use as the standalone fallback
    pub fn split(&self, content: &str, language: &str, file_path: &Path) -> Vec<CodeChunk> {
        self.split_text(content)
            .into_iter()
            .map(|window| {
                CodeChunk::new(
                    window.text,
                    language,
                    file_path,
                    window.start_line,
                    window.end_line,
                )
            })
            .collect()
    }
}

/// Character count of a window under construction, joins included
fn window_chars(lines: &[(u32, String, usize)]) -> usize {
    if lines.is_empty() {
        return 0;
    }
    lines.iter().map(|(_, _, chars)| chars).sum::<usize>() + lines.len() - 1
}
