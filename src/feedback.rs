/// Classification of a single target character against the current input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Matched,
    Mismatched,
    Untyped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharMark {
    pub char: char,
    pub mark: Mark,
}

/// Index `i` of the input is compared with index `i` of the target.
pub fn highlight(target: &str, typed: &str) -> Vec<CharMark> {
    let mut typed = typed.chars();

    target
        .chars()
        .map(|expected| {
            let mark = match typed.next() {
                Some(actual) if actual == expected => Mark::Matched,
                Some(_) => Mark::Mismatched,
                None => Mark::Untyped,
            };
            CharMark {
                char: expected,
                mark,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(target: &str, typed: &str) -> Vec<Mark> {
        highlight(target, typed).into_iter().map(|m| m.mark).collect()
    }

    #[test]
    fn test_highlight_nothing_typed() {
        assert_eq!(marks("abc", ""), vec![Mark::Untyped; 3]);
    }

    #[test]
    fn test_highlight_aligns_from_start() {
        assert_eq!(
            marks("abcd", "axc"),
            vec![Mark::Matched, Mark::Mismatched, Mark::Matched, Mark::Untyped]
        );
    }

    #[test]
    fn test_highlight_ignores_extra_input() {
        let result = highlight("ab", "abzzz");

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|m| m.mark == Mark::Matched));
    }

    #[test]
    fn test_highlight_keeps_target_chars() {
        let result = highlight("قلم", "قا");

        let chars: String = result.iter().map(|m| m.char).collect();
        assert_eq!(chars, "قلم");
        assert_eq!(result[0].mark, Mark::Matched);
        assert_eq!(result[1].mark, Mark::Mismatched);
        assert_eq!(result[2].mark, Mark::Untyped);
    }

    #[test]
    fn test_highlight_empty_target() {
        assert!(highlight("", "abc").is_empty());
    }
}
