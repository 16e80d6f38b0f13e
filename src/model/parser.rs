// Handles quick text input for new and edited boards
use crate::model::draft::{BoardPatch, NewBoard};
use crate::model::item::{Board, Priority};
use chrono::{Duration, NaiveDate};

/// Parses a date word: ISO `2025-01-31`, `today`, `tomorrow` or an offset like `+3d` / `+2w`.
pub fn parse_date(word: &str, today: NaiveDate) -> Option<NaiveDate> {
    match word.to_lowercase().as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        _ => {}
    }
    if let Some(offset) = word.strip_prefix('+') {
        let days = if let Some(n) = offset.strip_suffix('d') {
            n.parse::<i64>().ok()
        } else if let Some(n) = offset.strip_suffix('w') {
            n.parse::<i64>().ok().and_then(|w| w.checked_mul(7))
        } else if let Some(n) = offset.strip_suffix("mo") {
            n.parse::<i64>().ok().and_then(|mo| mo.checked_mul(30))
        } else {
            None
        };
        // Out-of-range offsets are not dates; the word stays in the title
        return days
            .and_then(Duration::try_days)
            .and_then(|d| today.checked_add_signed(d));
    }
    NaiveDate::parse_from_str(word, "%Y-%m-%d").ok()
}

/// Tokens recognised in a board quick input.
#[derive(Debug, Default)]
struct QuickInput<'a> {
    title_words: Vec<&'a str>,
    priority: Option<Priority>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl<'a> QuickInput<'a> {
    fn scan(input: &'a str, today: NaiveDate) -> Self {
        let mut out = QuickInput::default();
        for word in input.split_whitespace() {
            if let Some(p) = word.strip_prefix('!').and_then(Priority::parse) {
                out.priority = Some(p);
                continue;
            }
            if let Some((start, end)) = word.split_once("..")
                && let (Some(s), Some(e)) = (parse_date(start, today), parse_date(end, today))
            {
                out.start_date = Some(s);
                out.end_date = Some(e);
                continue;
            }
            if let Some(d) = word.strip_prefix('^').and_then(|w| parse_date(w, today)) {
                out.start_date = Some(d);
                continue;
            }
            if let Some(d) = word.strip_prefix('@').and_then(|w| parse_date(w, today)) {
                out.end_date = Some(d);
                continue;
            }
            out.title_words.push(word);
        }
        out
    }

    fn title(&self) -> String {
        self.title_words.join(" ")
    }
}

impl NewBoard {
    /// Builds a draft from `Title words !priority start..end`.
    ///
    /// `^date` sets only the start and `@date` only the end. Unrecognised tokens
    /// stay in the title. The result still has to pass [`NewBoard::validate`].
    pub fn from_quick_input(input: &str, today: NaiveDate) -> Self {
        let scanned = QuickInput::scan(input, today);
        NewBoard {
            title: scanned.title(),
            priority: scanned.priority.unwrap_or_default(),
            start_date: scanned.start_date,
            end_date: scanned.end_date,
        }
    }
}

impl BoardPatch {
    /// Same syntax as [`NewBoard::from_quick_input`], but only what was typed
    /// ends up in the patch.
    pub fn from_quick_input(input: &str, today: NaiveDate) -> Self {
        let scanned = QuickInput::scan(input, today);
        let title = scanned.title();
        BoardPatch {
            title: (!title.is_empty()).then_some(title),
            priority: scanned.priority,
            start_date: scanned.start_date,
            end_date: scanned.end_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == BoardPatch::default()
    }
}

impl Board {
    /// The board written back as quick input, to prefill the edit prompt.
    pub fn quick_input(&self) -> String {
        let mut out = format!("{} !{}", self.title, self.priority.label().to_lowercase());
        match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => out.push_str(&format!(" {}..{}", s, e)),
            (Some(s), None) => out.push_str(&format!(" ^{}", s)),
            (None, Some(e)) => out.push_str(&format!(" @{}", e)),
            (None, None) => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::BoardId;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn test_quick_input_full() {
        let d = NewBoard::from_quick_input("Website relaunch !urgent 2025-05-12..2025-06-30", today());
        assert_eq!(d.title, "Website relaunch");
        assert_eq!(d.priority, Priority::Urgent);
        assert_eq!(d.start_date, NaiveDate::from_ymd_opt(2025, 5, 12));
        assert_eq!(d.end_date, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_quick_input_relative_dates() {
        let d = NewBoard::from_quick_input("Sprint ^today @+2w", today());
        assert_eq!(d.title, "Sprint");
        assert_eq!(d.priority, Priority::Medium);
        assert_eq!(d.start_date, Some(today()));
        assert_eq!(d.end_date, NaiveDate::from_ymd_opt(2025, 5, 24));
    }

    #[test]
    fn test_quick_input_keeps_unknown_tokens() {
        let d = NewBoard::from_quick_input("Fix !!! now @someday", today());
        assert_eq!(d.title, "Fix !!! now @someday");
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_parse_date_words() {
        assert_eq!(parse_date("tomorrow", today()), NaiveDate::from_ymd_opt(2025, 5, 11));
        assert_eq!(parse_date("+3d", today()), NaiveDate::from_ymd_opt(2025, 5, 13));
        assert_eq!(parse_date("31/12/2025", today()), None);
    }

    #[test]
    fn test_huge_offsets_are_not_dates() {
        assert_eq!(parse_date("+999999999d", today()), None);
        assert_eq!(parse_date("+99999999999d", today()), None);
        assert_eq!(parse_date(&format!("+{}w", i64::MAX), today()), None);
        assert_eq!(parse_date(&format!("+{}mo", i64::MAX / 2), today()), None);

        let d = NewBoard::from_quick_input("Sprint ^today @+99999999999d", today());
        assert_eq!(d.title, "Sprint @+99999999999d");
        assert_eq!(d.start_date, Some(today()));
        assert_eq!(d.end_date, None);
    }

    #[test]
    fn test_patch_only_carries_typed_fields() {
        let p = BoardPatch::from_quick_input("!high", today());
        assert_eq!(p.title, None);
        assert_eq!(p.priority, Some(Priority::High));
        assert_eq!(p.start_date, None);
        assert!(!p.is_empty());
        assert!(BoardPatch::from_quick_input("  ", today()).is_empty());

        let p = BoardPatch::from_quick_input("Renamed @+1w", today());
        assert_eq!(p.title.as_deref(), Some("Renamed"));
        assert_eq!(p.priority, None);
        assert_eq!(p.end_date, NaiveDate::from_ymd_opt(2025, 5, 17));
    }

    #[test]
    fn test_board_quick_input_parses_back() {
        let board = Board {
            id: BoardId(1),
            title: "Website relaunch".into(),
            priority: Priority::Urgent,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 12),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            lists: Vec::new(),
        };
        let text = board.quick_input();
        assert_eq!(text, "Website relaunch !urgent 2025-05-12..2025-06-30");
        let draft = NewBoard::from_quick_input(&text, today());
        assert_eq!(draft.title, board.title);
        assert_eq!(draft.priority, board.priority);
        assert_eq!(draft.end_date, board.end_date);
    }
}
