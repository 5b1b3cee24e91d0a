//! Splitting of `/** ... */` comments into KDoc leaves.

use kstyle_core::NodeKind;

/// Splits a KDoc comment into `(kind, text)` pieces whose texts concatenate
/// back to `text`.
///
/// Each line break inside the comment, with the blanks that follow it,
/// becomes a [`NodeKind::WhiteSpace`] piece so the indentation pass sees it.
/// Returns `None` for anything that is not a KDoc comment.
#[must_use]
pub fn split_kdoc(text: &str) -> Option<Vec<(NodeKind, &str)>> {
    if text.len() < 5 || !text.starts_with("/**") || !text.ends_with("*/") {
        return None;
    }
    let body = &text[3..text.len() - 2];
    let mut pieces = vec![(NodeKind::KDocStart, &text[..3])];

    let (first, mut rest) = split_line(body);
    if !first.is_empty() {
        pieces.push((NodeKind::KDocText, first));
    }
    while rest.starts_with('\n') {
        let after_break = &rest[1..];
        let blanks = after_break.len() - after_break.trim_start_matches([' ', '\t']).len();
        pieces.push((NodeKind::WhiteSpace, &rest[..=blanks]));

        let (mut line, next) = split_line(&after_break[blanks..]);
        if let Some(stripped) = line.strip_prefix('*') {
            pieces.push((NodeKind::KDocLeadingAsterisk, &line[..1]));
            line = stripped;
        }
        if !line.is_empty() {
            pieces.push((NodeKind::KDocText, line));
        }
        rest = next;
    }

    pieces.push((NodeKind::KDocEnd, &text[text.len() - 2..]));
    Some(pieces)
}

/// Splits at the first `'\n'`, keeping the break at the start of the remainder.
fn split_line(text: &str) -> (&str, &str) {
    text.find('\n')
        .map_or((text, ""), |at| (&text[..at], &text[at..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<NodeKind> {
        split_kdoc(text)
            .unwrap()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect()
    }

    #[test]
    fn pieces_concatenate_to_comment() {
        let text = "/**\n     * Doc.\n     *\n     * @param x\n     */";
        let joined: String = split_kdoc(text)
            .unwrap()
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn multiline_comment_layout() {
        use NodeKind::{KDocEnd, KDocLeadingAsterisk, KDocStart, KDocText, WhiteSpace};
        assert_eq!(
            kinds("/**\n * a\n */"),
            vec![
                KDocStart,
                WhiteSpace,
                KDocLeadingAsterisk,
                KDocText,
                WhiteSpace,
                KDocEnd
            ]
        );
    }

    #[test]
    fn line_break_keeps_following_blanks() {
        let pieces = split_kdoc("/**\n\t  * a */").unwrap();
        assert_eq!(pieces[1], (NodeKind::WhiteSpace, "\n\t  "));
        assert_eq!(pieces[3], (NodeKind::KDocText, " a "));
    }

    #[test]
    fn single_line_kdoc_has_no_whitespace() {
        assert_eq!(
            kinds("/** short */"),
            vec![NodeKind::KDocStart, NodeKind::KDocText, NodeKind::KDocEnd]
        );
        assert_eq!(kinds("/***/"), vec![NodeKind::KDocStart, NodeKind::KDocEnd]);
    }

    #[test]
    fn plain_block_comments_are_rejected() {
        assert!(split_kdoc("/* not doc */").is_none());
        assert!(split_kdoc("/**/").is_none());
        assert!(split_kdoc("// line").is_none());
    }
}
