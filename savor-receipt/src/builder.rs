//! Fixed-width plain text builder
//!
//! The relay prints whatever text it receives, so receipts are plain UTF-8
//! lines laid out in character columns. No printer control codes.

use crate::encoding::{gbk_width, pad_gbk};

/// Plain text receipt builder
pub struct ReceiptBuilder {
    buf: String,
    width: usize,
}

impl ReceiptBuilder {
    /// Create a builder for a paper width in columns
    ///
    /// Common widths:
    /// - 58mm paper: 32 columns
    /// - 80mm paper: 48 columns
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write raw text
    pub fn write(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    /// Write text followed by newline
    pub fn write_line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    // === Separators ===

    pub fn eq_sep(&mut self) -> &mut Self {
        self.write_line(&"=".repeat(self.width))
    }

    pub fn dash_sep(&mut self) -> &mut Self {
        self.write_line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Center text with leading spaces; wider text is written as is
    pub fn text_center(&mut self, s: &str) -> &mut Self {
        let w = gbk_width(s);
        if w < self.width {
            let indent = (self.width - w) / 2;
            self.write(&" ".repeat(indent));
        }
        self.write_line(s)
    }

    /// Left and right text on the same line
    ///
    /// When both do not fit they are joined by a single space.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = gbk_width(left);
        let rw = gbk_width(right);

        if lw + rw >= self.width {
            self.write_line(&format!("{left} {right}"))
        } else {
            self.write(&pad_gbk(left, self.width - rw));
            self.write_line(right)
        }
    }

    // === Build ===

    /// Finalize and return the accumulated text
    pub fn finalize(self) -> String {
        self.buf
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new(32)
    }
}
