//! Tag resolution: `<name[,name2]>content</name>` markup.
//!
//! An explicit scanning parser with an open-tag stack. Closing the
//! innermost tag first exposes the enclosing tag, so arbitrary nesting
//! terminates by construction; there is no repeated pattern search over a
//! mutating string.

use strato_config::{ConfigStore, is_format_key};

/// Literal token replaced with a space on the color-disabled path, so
/// templates can end in visible trailing whitespace.
const SPACE_TOKEN: &str = "{space}";

/// Resolve all tag markup in `template` against the config palette.
///
/// With color enabled, each matched pair becomes `codes + content + reset`.
/// Unknown attribute names and pairs combining two or more colors pass
/// through literally. With color disabled, matched pairs are stripped to
/// their content and `{space}` becomes a real space.
pub fn resolve_tags(template: &str, config: &ConfigStore) -> String {
    let color_enabled = config.color_enabled();
    let chars: Vec<char> = template.chars().collect();

    // Bottom buffer plus one buffer per open tag.
    let mut out = String::new();
    let mut stack: Vec<(String, String)> = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '<'
            && let Some(tag) = parse_tag(&chars, i)
        {
            if tag.closing {
                if stack.last().is_some_and(|(attrs, _)| *attrs == tag.attrs) {
                    // `stack.last()` just matched, so the pop cannot fail.
                    if let Some((attrs, inner)) = stack.pop() {
                        let resolved = resolve_pair(&attrs, &inner, config, color_enabled);
                        current_buffer(&mut out, &mut stack).push_str(&resolved);
                    }
                } else {
                    // Stray or mismatched closing tag: keep it literal.
                    let literal = format!("</{}>", tag.attrs);
                    current_buffer(&mut out, &mut stack).push_str(&literal);
                }
            } else {
                stack.push((tag.attrs, String::new()));
            }
            i = tag.next;
        } else {
            current_buffer(&mut out, &mut stack).push(chars[i]);
            i += 1;
        }
    }

    // Unclosed tags unwind as literal text, innermost first.
    while let Some((attrs, buf)) = stack.pop() {
        let literal = format!("<{attrs}>{buf}");
        current_buffer(&mut out, &mut stack).push_str(&literal);
    }

    if color_enabled {
        out
    } else {
        out.replace(SPACE_TOKEN, " ")
    }
}

fn current_buffer<'a>(out: &'a mut String, stack: &'a mut [(String, String)]) -> &'a mut String {
    match stack.last_mut() {
        Some((_, buf)) => buf,
        None => out,
    }
}

struct Tag {
    closing: bool,
    attrs: String,
    next: usize,
}

/// Try to parse a tag at `chars[i]` (which is `<`).
///
/// Attribute lists contain names, commas, and optional spaces. Anything
/// else is not markup and stays literal.
fn parse_tag(chars: &[char], i: usize) -> Option<Tag> {
    let mut j = i + 1;
    let closing = chars.get(j) == Some(&'/');
    if closing {
        j += 1;
    }
    let start = j;
    while j < chars.len() && chars[j] != '>' && chars[j] != '<' {
        j += 1;
    }
    if j >= chars.len() || chars[j] != '>' {
        return None;
    }
    let attrs: String = chars[start..j].iter().collect();
    if attrs.is_empty()
        || !attrs
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ',' || c == ' ')
    {
        return None;
    }
    Some(Tag {
        closing,
        attrs,
        next: j + 1,
    })
}

/// Produce the replacement text for one matched tag pair.
fn resolve_pair(attrs: &str, inner: &str, config: &ConfigStore, color_enabled: bool) -> String {
    if !color_enabled {
        return inner.to_string();
    }

    let names: Vec<&str> = attrs
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return format!("<{attrs}>{inner}</{attrs}>");
    }

    let mut codes = String::new();
    let mut color_count = 0;
    for name in &names {
        match config.palette_code(name) {
            Some(code) => {
                if !is_format_key(name) {
                    color_count += 1;
                }
                codes.push_str(code);
            },
            // Unknown attribute: the whole pair passes through literally.
            None => return format!("<{attrs}>{inner}</{attrs}>"),
        }
    }
    if color_count > 1 {
        // Combining colors is an error in the config-editing path; the
        // render path just declines to resolve it.
        return format!("<{attrs}>{inner}</{attrs}>");
    }

    format!("{codes}{inner}{}", config.reset_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(color: bool) -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let mut config = ConfigStore::open(dir.path());
        config.set("color", json!(color));
        (dir, config)
    }

    #[test]
    fn simple_tag_resolves_to_code_text_reset() {
        let (_dir, config) = store(true);
        let green = config.palette_code("green").unwrap().to_string();
        let reset = config.reset_code().to_string();
        let out = resolve_tags("<green>hi</green>", &config);
        assert_eq!(out, format!("{green}hi{reset}"));
    }

    #[test]
    fn nested_tags_resolve_inner_first() {
        let (_dir, config) = store(true);
        let green = config.palette_code("green").unwrap().to_string();
        let bold = config.palette_code("bold").unwrap().to_string();
        let reset = config.reset_code().to_string();
        let out = resolve_tags("<bold><green>x</green></bold>", &config);
        assert_eq!(out, format!("{bold}{green}x{reset}{reset}"));
    }

    #[test]
    fn combined_attributes_concatenate_codes() {
        let (_dir, config) = store(true);
        let blue = config.palette_code("blue").unwrap().to_string();
        let bold = config.palette_code("bold").unwrap().to_string();
        let reset = config.reset_code().to_string();
        let out = resolve_tags("<blue,bold>x</blue,bold>", &config);
        assert_eq!(out, format!("{blue}{bold}x{reset}"));
    }

    #[test]
    fn unknown_tag_passes_through_literally() {
        let (_dir, config) = store(true);
        let out = resolve_tags("<zorp>x</zorp>", &config);
        assert_eq!(out, "<zorp>x</zorp>");
    }

    #[test]
    fn two_colors_pass_through_literally() {
        let (_dir, config) = store(true);
        let out = resolve_tags("<red,green>x</red,green>", &config);
        assert_eq!(out, "<red,green>x</red,green>");
    }

    #[test]
    fn mismatched_close_stays_literal() {
        let (_dir, config) = store(true);
        let out = resolve_tags("<green>x</blue>", &config);
        assert_eq!(out, "<green>x</blue>");
    }

    #[test]
    fn unclosed_tag_stays_literal() {
        let (_dir, config) = store(true);
        let out = resolve_tags("a <green>b", &config);
        assert_eq!(out, "a <green>b");
    }

    #[test]
    fn closing_tag_must_repeat_full_attribute_string() {
        let (_dir, config) = store(true);
        // `</blue>` does not close `<blue,bold>`.
        let out = resolve_tags("<blue,bold>x</blue>", &config);
        assert_eq!(out, "<blue,bold>x</blue>");
    }

    #[test]
    fn non_tag_angle_brackets_are_literal() {
        let (_dir, config) = store(true);
        let out = resolve_tags("1 < 2 > 0", &config);
        assert_eq!(out, "1 < 2 > 0");
    }

    #[test]
    fn color_disabled_strips_tags() {
        let (_dir, config) = store(false);
        let out = resolve_tags("<green>hi</green> <zorp>x</zorp>", &config);
        assert_eq!(out, "hi x");
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn color_disabled_replaces_space_token() {
        let (_dir, config) = store(false);
        let out = resolve_tags("<green>a</green>{space}b", &config);
        assert_eq!(out, "a b");
    }

    #[test]
    fn deep_nesting_terminates() {
        let (_dir, config) = store(true);
        let mut t = String::from("x");
        for _ in 0..50 {
            t = format!("<green>{t}</green>");
        }
        let out = resolve_tags(&t, &config);
        assert!(out.contains('x'));
        assert!(!out.contains("<green>"));
    }
}
