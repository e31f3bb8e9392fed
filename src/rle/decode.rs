//! RLE decoding.
//!
//! Comment lines are dropped, the header supplies the pattern size, and every
//! remaining line is concatenated into one token stream that is scanned one
//! character at a time.

use super::{Pattern, RleError};

/// Parsed `x = .., y = .., rule = ..` header line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RleHeader {
    /// Pattern width.
    pub x: usize,
    /// Pattern height.
    pub y: usize,
    /// Rule string, captured verbatim.
    pub rule: Option<String>,
}

impl RleHeader {
    /// Parse a header line. Keys and spacing are case/space tolerant.
    ///
    /// Returns `None` if `x` or `y` is missing or not a non-negative integer.
    pub fn parse(line: &str) -> Option<Self> {
        let mut x = None;
        let mut y = None;
        let mut rule = None;

        for field in line.split(',') {
            let Some((key, value)) = field.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "x" => x = Some(value.parse().ok()?),
                "y" => y = Some(value.parse().ok()?),
                "rule" => rule = Some(value.to_string()),
                _ => {}
            }
        }

        Some(Self {
            x: x?,
            y: y?,
            rule,
        })
    }

    /// Whether a line should be treated as a header line.
    fn looks_like_header(line: &str) -> bool {
        let mut chars = line.trim_start().chars();
        matches!(chars.next(), Some('x' | 'X'))
            && matches!(chars.find(|c| !c.is_whitespace()), Some('='))
    }
}

impl std::fmt::Display for RleHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x = {}, y = {}", self.x, self.y)?;
        if let Some(rule) = &self.rule {
            write!(f, ", rule = {}", rule)?;
        }
        Ok(())
    }
}

/// Cursor writing decoded runs into a pattern.
struct BodyScanner {
    pattern: Pattern,
    row: usize,
    col: usize,
    run: usize,
    /// Digits have been read since the last tag.
    pending_digits: bool,
    clipped: usize,
}

impl BodyScanner {
    fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            row: 0,
            col: 0,
            run: 0,
            pending_digits: false,
            clipped: 0,
        }
    }

    /// Current run count, treating an absent or zero count as 1.
    fn take_run(&mut self) -> usize {
        let run = self.run.max(1);
        self.reset_run();
        run
    }

    fn reset_run(&mut self) {
        self.run = 0;
        self.pending_digits = false;
    }

    fn push_digit(&mut self, digit: u32, position: usize) -> Result<(), RleError> {
        self.run = self
            .run
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit as usize))
            .ok_or(RleError::RunCountOverflow { position })?;
        self.pending_digits = true;
        Ok(())
    }

    fn push_cells(&mut self, alive: bool) {
        let run = self.take_run();
        let (rows, cols) = (self.pattern.rows, self.pattern.cols);

        let mut written = 0;
        if self.row < rows {
            let end = self.col.saturating_add(run).min(cols);
            if self.col < end {
                let base = self.row * cols;
                self.pattern.cells[base + self.col..base + end].fill(alive);
                written = end - self.col;
            }
        }
        if alive {
            self.clipped = self.clipped.saturating_add(run - written);
        }

        self.col = self.col.saturating_add(run);
    }

    fn end_row(&mut self) {
        let run = self.take_run();
        self.row = self.row.saturating_add(run);
        self.col = 0;
    }

    fn finish(self) -> Pattern {
        if self.pending_digits {
            log::warn!("RLE body ends with a dangling run count {}", self.run);
        }
        if self.clipped > 0 {
            log::warn!(
                "dropped {} live cells outside the declared {}x{} pattern",
                self.clipped,
                self.pattern.cols(),
                self.pattern.rows()
            );
        }
        self.pattern
    }
}

/// Header and concatenated body of an RLE document.
fn split_document(text: &str) -> (RleHeader, String) {
    let mut header: Option<RleHeader> = None;
    let mut malformed_header = false;
    let mut body = String::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            continue;
        }
        if RleHeader::looks_like_header(trimmed) {
            if header.is_some() || malformed_header {
                log::warn!("ignoring extra RLE header line: {}", trimmed);
                continue;
            }
            match RleHeader::parse(trimmed) {
                Some(h) => header = Some(h),
                None => {
                    log::warn!("malformed RLE header: {}", trimmed);
                    malformed_header = true;
                }
            }
            continue;
        }
        body.push_str(line.trim());
    }

    (header.unwrap_or_default(), body)
}

fn decode_body(header: RleHeader, body: &str) -> Result<Pattern, RleError> {
    log::debug!("decoding RLE body with header {}", header);

    let mut pattern = Pattern::new(header.y, header.x)?;
    pattern.set_rule(header.rule);

    let mut scanner = BodyScanner::new(pattern);
    for (position, ch) in body.chars().enumerate() {
        match ch {
            '0'..='9' => {
                let digit = ch.to_digit(10).unwrap_or_default();
                scanner.push_digit(digit, position)?;
            }
            'b' => scanner.push_cells(false),
            'o' => scanner.push_cells(true),
            '$' => scanner.end_row(),
            '!' => break,
            c if c.is_whitespace() => {}
            other => {
                log::debug!("skipping unsupported RLE tag {:?} at {}", other, position);
                scanner.reset_run();
            }
        }
    }

    Ok(scanner.finish())
}

/// Decode RLE text into a pattern.
///
/// A missing or malformed header yields a 0x0 pattern, which is empty.
/// Live cells written past the declared width or height are dropped.
/// The pattern buffer is sized from the header; use [`decode_for`] when the
/// text is untrusted and the target grid is known.
pub fn decode(text: &str) -> Result<Pattern, RleError> {
    let (header, body) = split_document(text);
    decode_body(header, &body)
}

/// Decode RLE text destined for a `height` x `width` grid.
///
/// The declared size is checked before anything is allocated, so an
/// oversized header fails with [`RleError::PatternTooLarge`].
pub fn decode_for(text: &str, height: usize, width: usize) -> Result<Pattern, RleError> {
    let (header, body) = split_document(text);
    if header.y > height || header.x > width {
        log::warn!(
            "rejecting {}x{} pattern for {}x{} grid",
            header.y,
            header.x,
            height,
            width
        );
        return Err(RleError::PatternTooLarge {
            rows: header.y,
            cols: header.x,
            height,
            width,
        });
    }
    decode_body(header, &body)
}
