//! Priority-list resolution between two competing field values.

use regex::Regex;

use crate::options::PriorityList;

/// Which of the two candidate values to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// Outcome of [`FieldResolver::choose_preserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The value to keep, or `None` if neither could be chosen.
    pub preserved: Option<Side>,
    /// Both values matched the deciding pattern exactly (or are identical).
    pub both_match: bool,
    /// The preserved value only matched its pattern when ignoring case.
    pub case_insensitive: bool,
}

impl Resolution {
    fn pick(side: Side, both_match: bool, case_insensitive: bool) -> Self {
        Self {
            preserved: Some(side),
            both_match,
            case_insensitive,
        }
    }

    fn neither() -> Self {
        Self {
            preserved: None,
            both_match: false,
            case_insensitive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKind {
    None,
    CaseInsensitive,
    Exact,
}

#[derive(Debug, Clone)]
enum Pattern {
    Literal { text: String, folded: String },
    Regex { exact: Regex, folded: Regex },
}

impl Pattern {
    fn compile(pattern: &str, as_regex: bool) -> Result<Self, regex::Error> {
        if as_regex {
            Ok(Pattern::Regex {
                exact: Regex::new(&format!("^(?:{pattern})$"))?,
                folded: Regex::new(&format!("(?i)^(?:{pattern})$"))?,
            })
        } else {
            Ok(Pattern::Literal {
                text: pattern.to_string(),
                folded: pattern.to_lowercase(),
            })
        }
    }

    fn match_kind(&self, value: &str) -> MatchKind {
        let (exact, folded) = match self {
            Pattern::Literal { text, folded } => {
                (value == text.as_str(), value.to_lowercase() == *folded)
            }
            Pattern::Regex { exact, folded } => (exact.is_match(value), folded.is_match(value)),
        };
        if exact {
            MatchKind::Exact
        } else if folded {
            MatchKind::CaseInsensitive
        } else {
            MatchKind::None
        }
    }
}

/// Decides which of two field values a merge result keeps.
///
/// Patterns are tried in priority order. A case-exact match wins immediately,
/// the first value being tested before the second. A match that only holds
/// when ignoring case is remembered but may still be overridden by a
/// case-exact match of either value on the same or a later pattern.
///
/// Without any pattern match, identical values (ignoring case) keep the
/// first; if only one value is non-empty it is kept; otherwise nothing is.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    patterns: Vec<Pattern>,
}

impl FieldResolver {
    /// Compile the patterns of `list`.
    pub fn new(list: &PriorityList) -> Result<Self, regex::Error> {
        let patterns = list
            .patterns
            .iter()
            .map(|p| Pattern::compile(p, list.as_regex))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether `value` matches any pattern, with or without case.
    pub fn is_prioritized(&self, value: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.match_kind(value) != MatchKind::None)
    }

    pub fn choose_preserved(&self, first: &str, second: &str) -> Resolution {
        let mut tentative: Option<Resolution> = None;

        for pattern in &self.patterns {
            let m1 = pattern.match_kind(first);
            let m2 = pattern.match_kind(second);

            if m1 == MatchKind::Exact {
                return Resolution::pick(Side::First, m2 == MatchKind::Exact, false);
            }
            if m2 == MatchKind::Exact {
                return Resolution::pick(Side::Second, false, false);
            }
            if tentative.is_none() {
                if m1 == MatchKind::CaseInsensitive {
                    tentative = Some(Resolution::pick(Side::First, false, true));
                } else if m2 == MatchKind::CaseInsensitive {
                    tentative = Some(Resolution::pick(Side::Second, false, true));
                }
            }
        }

        if let Some(resolution) = tentative {
            return resolution;
        }

        match (first.is_empty(), second.is_empty()) {
            (true, true) => Resolution::neither(),
            (false, true) => Resolution::pick(Side::First, false, false),
            (true, false) => Resolution::pick(Side::Second, false, false),
            (false, false) if first.to_lowercase() == second.to_lowercase() => {
                Resolution::pick(Side::First, first == second, false)
            }
            (false, false) => Resolution::neither(),
        }
    }
}
