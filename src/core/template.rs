/// Placeholder scanning and template authoring helpers.
///
/// A placeholder is `[token]` where `token` is one or more category names
/// joined by `/`, and a name is a run of word characters (alphanumerics or
/// `_`). Bracketed text that does not fit this shape is plain text.

use std::ops::Range;

/// A placeholder found in a template, with its byte span including brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub token: String,
    pub span: Range<usize>,
}

impl Placeholder {
    /// The category names this placeholder may draw from.
    pub fn alternatives(&self) -> Vec<&str> {
        self.token.split('/').collect()
    }

    /// Whether the token lists more than one alternative.
    pub fn is_combined(&self) -> bool {
        self.token.contains('/')
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .split('/')
            .all(|name| !name.is_empty() && name.chars().all(is_name_char))
}

/// Find every placeholder in `input`, left to right.
///
/// Repeated tokens are reported once per occurrence. A `[` that does not
/// open a valid placeholder is skipped, so `[a [b/c]` yields `[b/c]`.
pub fn scan_placeholders(input: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(offset) = input[from..].find('[') {
        let start = from + offset;
        let body = start + 1;
        let body_len = input[body..]
            .find(|c: char| !(is_name_char(c) || c == '/'))
            .unwrap_or(input.len() - body);
        let close = body + body_len;
        let token = &input[body..close];

        if input[close..].starts_with(']') && is_valid_token(token) {
            found.push(Placeholder {
                token: token.to_string(),
                span: start..close + 1,
            });
            from = close + 1;
        } else {
            from = body;
        }
    }

    found
}

/// Build a combined placeholder such as `[color/animal]` from selected
/// category names. Returns `None` when nothing is selected.
pub fn combined_token<T: AsRef<str>>(names: &[T]) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let joined: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
    Some(format!("[{}]", joined.join("/")))
}

/// Insert `text` into `template` at character position `cursor`, padding
/// it with a space on either side that is not already next to whitespace.
///
/// Nothing is padded when the template is empty. A cursor past the end
/// appends. Returns the new template and the character position just after
/// the inserted text.
pub fn insert_at_cursor(template: &str, cursor: usize, text: &str) -> (String, usize) {
    let byte_at = template
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(template.len());
    let (before, after) = template.split_at(byte_at);

    let is_gap = |c: Option<char>| matches!(c, Some(' ') | Some('\n'));
    let pad_before = !before.is_empty() && !is_gap(before.chars().next_back());
    let pad_after = !after.is_empty() && !is_gap(after.chars().next());

    let mut inserted = String::with_capacity(text.len() + 2);
    if pad_before {
        inserted.push(' ');
    }
    inserted.push_str(text);
    if pad_after {
        inserted.push(' ');
    }

    let cursor_after = before.chars().count() + inserted.chars().count();
    (format!("{before}{inserted}{after}"), cursor_after)
}

/// Insert `[name]` for a category or category type at `cursor`.
pub fn insert_placeholder(template: &str, cursor: usize, name: &str) -> (String, usize) {
    insert_at_cursor(template, cursor, &format!("[{name}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        scan_placeholders(input)
            .into_iter()
            .map(|p| p.token)
            .collect()
    }

    #[test]
    fn scan_plain_text() {
        assert!(scan_placeholders("Hello, world.").is_empty());
    }

    #[test]
    fn scan_single_and_combined() {
        let found = scan_placeholders("a [color] [cat/dog] b");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].token, "color");
        assert_eq!(found[0].span, 2..9);
        assert!(!found[0].is_combined());
        assert_eq!(found[1].alternatives(), vec!["cat", "dog"]);
        assert!(found[1].is_combined());
        assert_eq!(found[1].span, 10..19);
    }

    #[test]
    fn scan_counts_duplicates() {
        assert_eq!(tokens("[a/b] and [a/b]"), vec!["a/b", "a/b"]);
    }

    #[test]
    fn scan_prefix_sharing_tokens() {
        assert_eq!(tokens("[a/bc][a/b]"), vec!["a/bc", "a/b"]);
    }

    #[test]
    fn scan_skips_malformed() {
        assert!(tokens("[] [/a] [a/] [a//b] [two words] [a-b]").is_empty());
        assert!(tokens("[unclosed").is_empty());
    }

    #[test]
    fn scan_recovers_after_stray_bracket() {
        assert_eq!(tokens("[x [b/c]"), vec!["b/c"]);
        assert_eq!(tokens("[[inner]]"), vec!["inner"]);
    }

    #[test]
    fn scan_unicode_names() {
        let found = scan_placeholders("é [couleur_é/动物] z");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].alternatives(), vec!["couleur_é", "动物"]);
        assert_eq!(&"é [couleur_é/动物] z"[found[0].span.clone()], "[couleur_é/动物]");
    }

    #[test]
    fn combined_token_joins_names() {
        assert_eq!(combined_token(&["color", "animal"]).as_deref(), Some("[color/animal]"));
        assert_eq!(combined_token(&["solo"]).as_deref(), Some("[solo]"));
        let none: [&str; 0] = [];
        assert_eq!(combined_token(&none), None);
    }

    #[test]
    fn insert_pads_between_words() {
        let (out, cursor) = insert_placeholder("a car", 1, "color");
        assert_eq!(out, "a [color] car");
        assert_eq!(cursor, 9);
    }

    #[test]
    fn insert_respects_existing_spaces() {
        let (out, _) = insert_placeholder("a  car", 2, "color");
        assert_eq!(out, "a [color] car");
        let (out, _) = insert_placeholder("line\nnext", 5, "x");
        assert_eq!(out, "line\n[x] next");
    }

    #[test]
    fn insert_into_empty_and_past_end() {
        assert_eq!(insert_placeholder("", 0, "color").0, "[color]");
        assert_eq!(insert_placeholder("the", 99, "noun").0, "the [noun]");
        assert_eq!(insert_at_cursor("go", 0, "[a/b]").0, "[a/b] go");
    }
}
