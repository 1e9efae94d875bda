//! Receipt formatting for the Savor Spoon print relay
//!
//! Pure text layout: no I/O, no printer control codes.

pub mod builder;
pub mod encoding;
pub mod renderer;

pub use builder::ReceiptBuilder;
pub use encoding::{gbk_width, pad_gbk, truncate_gbk};
pub use renderer::{ReceiptRenderer, format_money, line_total};
