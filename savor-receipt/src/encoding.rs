//! Display width of receipt text
//!
//! Thermal printers lay text out in GBK byte columns: ASCII takes one column,
//! CJK characters take two. These helpers measure, truncate and pad strings
//! by that width.

/// Column width of a single character
///
/// Characters GBK cannot encode are counted as two columns.
pub fn char_width(c: char) -> usize {
    if c.is_ascii() {
        return 1;
    }
    let mut buf = [0u8; 4];
    let (cow, _, had_errors) = encoding_rs::GBK.encode(c.encode_utf8(&mut buf));
    if had_errors { 2 } else { cow.len() }
}

/// Column width of a string
pub fn gbk_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Longest prefix of `s` that fits in `max_width` columns
///
/// Never splits a wide character.
pub fn truncate_gbk(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (i, c) in s.char_indices() {
        width += char_width(c);
        if width > max_width {
            return &s[..i];
        }
    }
    s
}

/// Right-pad `s` with spaces to `width` columns; wider text is returned as is
pub fn pad_gbk(s: &str, width: usize) -> String {
    let mut padded = String::from(s);
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(gbk_width(s))));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_ascii_and_cjk() {
        assert_eq!(gbk_width("Total:"), 6);
        assert_eq!(gbk_width("謝謝光臨！"), 10);
        assert_eq!(gbk_width("香港美味勺子餐廳"), 16);
        assert_eq!(gbk_width(""), 0);
    }

    #[test]
    fn test_truncate_does_not_split_wide_chars() {
        assert_eq!(truncate_gbk("餐廳ABC", 3), "餐");
        assert_eq!(truncate_gbk("餐廳ABC", 5), "餐廳A");
        assert_eq!(truncate_gbk("ABC", 10), "ABC");
        assert_eq!(truncate_gbk("ABC", 0), "");
    }

    #[test]
    fn test_pad_counts_columns() {
        assert_eq!(pad_gbk("ab", 4), "ab  ");
        assert_eq!(pad_gbk("燒賣", 6), "燒賣  ");
        assert_eq!(pad_gbk("abcdef", 4), "abcdef");
    }
}
