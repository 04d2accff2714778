/// Longest text Telegram accepts in one message
pub const MESSAGE_LIMIT: usize = 4096;

/// Split `text` into parts of at most `limit` characters.
///
/// Breaks at the last newline inside the window, else at the last space,
/// else mid-word. Break characters are dropped.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut parts = Vec::new();
    let mut rest: Vec<char> = text.chars().collect();

    while rest.len() > limit {
        let window = &rest[..limit];
        let cut = window
            .iter()
            .rposition(|c| *c == '\n')
            .or_else(|| window.iter().rposition(|c| c.is_whitespace()))
            .filter(|pos| *pos > 0);

        let (head, skip) = match cut {
            Some(pos) => (pos, 1),
            None => (limit, 0),
        };
        let part: String = rest[..head].iter().collect();
        if !part.trim().is_empty() {
            parts.push(part);
        }
        rest.drain(..head + skip);
    }

    let tail: String = rest.into_iter().collect();
    if !tail.trim().is_empty() {
        parts.push(tail);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_part() {
        assert_eq!(split_message("Привет", MESSAGE_LIMIT), vec!["Привет"]);
    }

    #[test]
    fn test_blank_text_has_no_parts() {
        assert!(split_message("", MESSAGE_LIMIT).is_empty());
        assert!(split_message(" \n ", MESSAGE_LIMIT).is_empty());
        assert_eq!(split_message("абв\n\n\n\nгде", 4), vec!["абв", "где"]);
    }

    #[test]
    fn test_prefers_newline() {
        let parts = split_message("аааа бб\nвввв", 10);
        assert_eq!(parts, vec!["аааа бб", "вввв"]);
    }

    #[test]
    fn test_falls_back_to_space_then_hard_cut() {
        assert_eq!(split_message("ааа ббб ввв", 8), vec!["ааа ббб", "ввв"]);
        assert_eq!(split_message("абвгдежз", 3), vec!["абв", "где", "жз"]);
    }

    #[test]
    fn test_parts_respect_limit_in_chars() {
        let text = "Стипендии выплачиваются всем. ".repeat(400);
        let parts = split_message(&text, MESSAGE_LIMIT);
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|p| p.chars().count() <= MESSAGE_LIMIT));
        // one break character is dropped per cut
        let rejoined: usize = parts.iter().map(|p| p.chars().count()).sum();
        assert_eq!(rejoined + parts.len() - 1, text.chars().count());
    }
}
