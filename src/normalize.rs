//! Text clean-up applied to native engine output before it reaches callers.
//!
//! Engines emit one fragment per detected line. We keep their order and
//! join on newlines. Windows additionally separates every CJK glyph with a
//! space, which `collapse_cjk_spacing` undoes.

/// Join line fragments in the order given, trimming each and skipping blanks.
pub fn join_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

/// Returns true for ideographs, kana, hangul and CJK punctuation.
pub fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F   // CJK symbols and punctuation
        | 0x3040..=0x30FF // hiragana, katakana
        | 0x3400..=0x4DBF // extension A
        | 0x4E00..=0x9FFF // unified ideographs
        | 0xAC00..=0xD7AF // hangul syllables
        | 0xF900..=0xFAFF // compatibility ideographs
        | 0xFF00..=0xFFEF // fullwidth forms
        | 0x20000..=0x2FA1F
    )
}

/// Remove whitespace that sits between two CJK characters.
///
/// Spaces next to Latin text are left alone, so `"使用 Rust 编写"` keeps its
/// spaces while `"你 好 世 界"` becomes `"你好世界"`.
pub fn collapse_cjk_spacing(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            let run_end = chars[i..]
                .iter()
                .position(|&ch| ch != ' ')
                .map_or(chars.len(), |offset| i + offset);
            let prev = out.chars().last();
            let next = chars.get(run_end).copied();
            let between_cjk = matches!((prev, next), (Some(p), Some(n)) if is_cjk(p) && is_cjk(n));
            if !between_cjk {
                out.extend(&chars[i..run_end]);
            }
            i = run_end;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_order_and_skips_blank_lines() {
        let text = join_lines(["  first line ", "", "second", "   ", "third"]);
        assert_eq!(text, "first line\nsecond\nthird");
    }

    #[test]
    fn join_of_nothing_is_empty() {
        assert_eq!(join_lines(std::iter::empty()), "");
    }

    #[test]
    fn collapses_spaces_between_ideographs() {
        assert_eq!(collapse_cjk_spacing("你 好 世 界"), "你好世界");
        assert_eq!(collapse_cjk_spacing("こ ん に ち は"), "こんにちは");
    }

    #[test]
    fn keeps_spaces_next_to_latin() {
        assert_eq!(collapse_cjk_spacing("使用 Rust 编写"), "使用 Rust 编写");
        assert_eq!(collapse_cjk_spacing("Hello world"), "Hello world");
    }

    #[test]
    fn leaves_accented_latin_untouched() {
        let fr = "Le cœur a ses raisons que la raison ne connaît point";
        assert_eq!(collapse_cjk_spacing(fr), fr);
    }

    #[test]
    fn collapses_runs_of_spaces_between_cjk() {
        assert_eq!(collapse_cjk_spacing("中   文。 测 试"), "中文。测试");
    }

    #[test]
    fn cjk_detection() {
        assert!(is_cjk('中'));
        assert!(is_cjk('。'));
        assert!(is_cjk('한'));
        assert!(!is_cjk('é'));
        assert!(!is_cjk('∑'));
    }
}
