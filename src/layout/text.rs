use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::TextBlock;

/// Final box height for `text`: empty content short-circuits to the minimum,
/// anything else is title row + wrapped body + trailing line, clamped.
pub fn box_height(text: &str, theme: &Theme, config: &LayoutConfig) -> f32 {
    if text.is_empty() {
        return config.min_box_height;
    }
    let body = measure_body(text, config.box_width, theme, config);
    body_box_height(text, &body, config)
}

/// Same as [`box_height`] for a body that was already measured from `text`.
pub(super) fn body_box_height(text: &str, body: &TextBlock, config: &LayoutConfig) -> f32 {
    if text.is_empty() {
        return config.min_box_height;
    }
    config.clamp_height(config.title_height + body.height + config.trailing_padding)
}

/// Pixel height of `text` wrapped inside a box of `box_width`, excluding the
/// title row and trailing padding.
pub fn measure_height(text: &str, box_width: f32, theme: &Theme, config: &LayoutConfig) -> f32 {
    measure_body(text, box_width, theme, config).height
}

pub fn measure_body(text: &str, box_width: f32, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    let font_size = theme.font_size;
    let family = theme.font_family.as_str();
    let fast = config.fast_text_metrics;
    let max_width = (box_width - 2.0 * config.text_padding).max(1.0);

    let mut lines = Vec::new();
    if !text.is_empty() {
        for line in split_lines(text) {
            lines.extend(wrap_line(&line, max_width, font_size, family, fast));
        }
    }

    let height = lines.len() as f32 * line_height(theme, config);
    TextBlock { lines, height }
}

pub fn line_height(theme: &Theme, config: &LayoutConfig) -> f32 {
    theme.font_size * config.label_line_height
}

/// Explicit line breaks are preserved; a blank line still occupies a line.
pub(super) fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| line.replace('\t', "    ").trim_end().to_string())
        .collect()
}

pub(super) fn wrap_line(
    line: &str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
    fast_metrics: bool,
) -> Vec<String> {
    if text_width(line, font_size, font_family, fast_metrics) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size, font_family, fast_metrics) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, font_size, font_family, fast_metrics) <= max_width {
            current.push_str(word);
            continue;
        }
        // Overflowing word: break between characters.
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1
                && text_width(&current, font_size, font_family, fast_metrics) > max_width
            {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Approximate advance per em for a proportional sans-serif face.
pub(super) fn char_width_factor(ch: char) -> f32 {
    match ch {
        '\n' => 0.0,
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.25,
        ' ' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '{' | '}' | '-' | '/' | '\\' => 0.33,
        'm' | 'w' => 0.83,
        'M' | 'W' => 0.88,
        '@' | '%' => 0.9,
        'A'..='Z' => 0.67,
        'a'..='z' => 0.54,
        '0'..='9' => 0.56,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FF60}' => 1.0,
        _ => 0.6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn empty_text_is_minimum_height() {
        let config = fast_config();
        assert_eq!(box_height("", &Theme::classic(), &config), 150.0);
    }

    #[test]
    fn whitespace_only_text_is_measured() {
        let config = fast_config();
        let theme = Theme::classic();
        assert_eq!(measure_height("   ", config.box_width, &theme, &config), 21.0);
        // Nine newlines are ten blank lines: 40 + 10 * 21 + 24.
        assert_eq!(box_height(&"\n".repeat(9), &theme, &config), 274.0);
    }

    #[test]
    fn single_line_is_clamped_to_minimum() {
        let config = fast_config();
        // 40 + 21 + 24 = 85 < 150
        assert_eq!(box_height("Short claim", &Theme::classic(), &config), 150.0);
        assert_eq!(measure_height("Short claim", 300.0, &Theme::classic(), &config), 21.0);
    }

    #[test]
    fn explicit_line_breaks_are_preserved() {
        let config = fast_config();
        let theme = Theme::classic();
        let block = measure_body("one\n\nthree\r\nfour", 300.0, &theme, &config);
        assert_eq!(block.lines, vec!["one", "", "three", "four"]);
        assert_eq!(block.height, 4.0 * 21.0);
    }

    #[test]
    fn height_grows_past_minimum_with_many_lines() {
        let config = fast_config();
        let text = vec!["line"; 10].join("\n");
        // 40 + 10 * 21 + 24
        assert_eq!(box_height(&text, &Theme::classic(), &config), 274.0);
    }

    #[test]
    fn height_is_clamped_to_maximum() {
        let config = fast_config();
        let text = "word ".repeat(5000);
        assert_eq!(box_height(&text, &Theme::classic(), &config), 1000.0);
    }

    #[test]
    fn wrap_line_does_not_wrap_short_text() {
        let result = wrap_line("short", 260.0, 14.0, "sans-serif", true);
        assert_eq!(result, vec!["short"]);
    }

    #[test]
    fn wrap_line_splits_long_text() {
        let result = wrap_line(
            "this is a rather long line of argument text that should be wrapped inside a box",
            260.0,
            14.0,
            "sans-serif",
            true,
        );
        assert!(result.len() > 1, "expected wrapping, got {:?}", result);
        for line in &result {
            assert!(fallback_text_width(line, 14.0) <= 260.0, "{line:?} overflows");
        }
    }

    #[test]
    fn wrap_line_breaks_overlong_words() {
        let word = "x".repeat(200);
        let result = wrap_line(&word, 260.0, 14.0, "sans-serif", true);
        assert!(result.len() > 1);
        assert_eq!(result.concat(), word);
        for line in &result {
            assert!(fallback_text_width(line, 14.0) <= 260.0);
        }
    }

    #[test]
    fn wrap_line_keeps_blank_line() {
        assert_eq!(wrap_line("", 260.0, 14.0, "sans-serif", true), vec![String::new()]);
    }

    #[test]
    fn appending_text_never_shrinks_height() {
        let config = fast_config();
        let theme = Theme::classic();
        let text = "Harry was born in Bermuda. A man born in Bermuda will generally be a British subject.\nSo, presumably, Harry is a British subject unless both his parents were aliens.";
        let mut previous = 0.0;
        for (idx, _) in text.char_indices() {
            let height = measure_height(&text[..idx], 300.0, &theme, &config);
            assert!(height >= previous, "height shrank at byte {idx}");
            previous = height;
        }
    }

    #[test]
    fn char_width_factor_returns_positive_values() {
        for ch in ['a', 'Z', ' ', '0', '@', '\u{4e2d}', '\u{00e9}'] {
            assert!(char_width_factor(ch) > 0.0, "char {:?} has zero width", ch);
        }
    }

    #[test]
    fn fallback_text_width_scales_with_font_size() {
        let w14 = fallback_text_width("Hello", 14.0);
        let w28 = fallback_text_width("Hello", 28.0);
        assert!((w28 - w14 * 2.0).abs() < 0.01);
    }
}
