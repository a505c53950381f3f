//! Line-level pattern matching: question starts, marks and totals.

use regex::{Regex, RegexBuilder};

use crate::model::QuestionLabel;

/// A question-start token found at the beginning of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartToken {
    /// `3.`, `3)`, `3b.`, `3(b)`, `Q3.`
    Question(QuestionLabel),
    /// `(b)`, `b)`, `b.`: a part of whatever question is current
    SubPart(char),
}

/// Finds question-start tokens.
pub struct TokenScanner {
    question_regex: Regex,
    sub_part_regex: Option<Regex>,
}

impl TokenScanner {
    /// Create a scanner.
    ///
    /// * `allow_prefix` - accept `Q3.` and `Question 3.`
    /// * `sub_parts` - accept bare lettered parts such as `(a)`
    pub fn new(allow_prefix: bool, sub_parts: bool) -> Self {
        let prefix = if allow_prefix {
            r"(?:(?i:q(?:uestion)?)\s*)?"
        } else {
            ""
        };
        let question = format!(
            r"^{}(\d{{1,3}})(?:\s*\(([A-Za-z])\)|([A-Za-z])?[.)])(?:\s+|$)",
            prefix
        );

        Self {
            question_regex: Regex::new(&question).unwrap(),
            sub_part_regex: sub_parts
                .then(|| Regex::new(r"^(?:\(([a-z])\)|([a-z])[.)])(?:\s+|$)").unwrap()),
        }
    }

    /// Match a token at the start of a cleaned line.
    ///
    /// Returns the token and the rest of the line after it.
    pub fn scan<'a>(&self, line: &'a str) -> Option<(StartToken, &'a str)> {
        if let Some(caps) = self.question_regex.captures(line) {
            let whole = caps.get(0)?;
            let number: u32 = caps[1].parse().ok()?;
            let part = caps
                .get(2)
                .or_else(|| caps.get(3))
                .and_then(|m| m.as_str().chars().next());
            let label = match part {
                Some(p) => QuestionLabel::sub_part(number, p),
                None => QuestionLabel::question(number),
            };
            return Some((StartToken::Question(label), &line[whole.end()..]));
        }

        let caps = self.sub_part_regex.as_ref()?.captures(line)?;
        let whole = caps.get(0)?;
        let part = caps
            .get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().chars().next())?;
        Some((StartToken::SubPart(part), &line[whole.end()..]))
    }
}

impl Default for TokenScanner {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Which trailing mark notations are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkStyles {
    /// `[5]`
    pub square_brackets: bool,
    /// `[5 marks]`, `(5 marks)`, `(1 mark)`
    pub with_suffix: bool,
    /// `(5)`, as printed in the right margin of Pearson papers
    pub bare_parentheses: bool,
}

impl Default for MarkStyles {
    fn default() -> Self {
        Self {
            square_brackets: true,
            with_suffix: true,
            bare_parentheses: false,
        }
    }
}

/// Result of looking for a trailing mark on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkMatch<'a> {
    /// Line text with any recognized mark removed
    pub text: &'a str,
    /// Parsed mark value
    pub marks: Option<u32>,
    /// A trailing bracket was present but held no integer
    pub malformed: bool,
}

/// Extracts trailing mark values.
pub struct MarkExtractor {
    styles: MarkStyles,
    bracket_regex: Regex,
    suffix_regex: Regex,
    paren_suffix_regex: Regex,
    bare_paren_regex: Regex,
}

impl MarkExtractor {
    pub fn new(styles: MarkStyles) -> Self {
        Self {
            styles,
            bracket_regex: Regex::new(r"\[([^\[\]]*)\]\s*$").unwrap(),
            suffix_regex: RegexBuilder::new(r"^(\d+)\s*marks?$")
                .case_insensitive(true)
                .build()
                .unwrap(),
            paren_suffix_regex: RegexBuilder::new(r"\(\s*(\d+)\s*marks?\s*\)\s*$")
                .case_insensitive(true)
                .build()
                .unwrap(),
            // Wider numbers in bare parentheses are years and quantities, not marks
            bare_paren_regex: Regex::new(r"\(\s*(\d{1,2})\s*\)\s*$").unwrap(),
        }
    }

    /// Find and strip a trailing mark on a line.
    ///
    /// Any value that fits a `u32` is accepted in brackets; larger numbers
    /// count as malformed.
    pub fn extract<'a>(&self, line: &'a str) -> MarkMatch<'a> {
        if self.styles.square_brackets || self.styles.with_suffix {
            if let Some(caps) = self.bracket_regex.captures(line) {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(line.len());
                let content = caps[1].trim();

                let value = if self.styles.square_brackets && is_integer(content) {
                    content.parse().ok()
                } else if self.styles.with_suffix {
                    self.suffix_regex
                        .captures(content)
                        .and_then(|c| c[1].parse().ok())
                } else {
                    None
                };

                return match value {
                    Some(marks) => MarkMatch {
                        text: line[..start].trim_end(),
                        marks: Some(marks),
                        malformed: false,
                    },
                    None => MarkMatch {
                        text: line,
                        marks: None,
                        malformed: true,
                    },
                };
            }
        }

        let mut paren = None;
        if self.styles.with_suffix {
            paren = self.paren_suffix_regex.captures(line);
        }
        if paren.is_none() && self.styles.bare_parentheses {
            paren = self.bare_paren_regex.captures(line);
        }

        if let Some(caps) = paren {
            if let (Some(whole), Ok(marks)) = (caps.get(0), caps[1].parse()) {
                return MarkMatch {
                    text: line[..whole.start()].trim_end(),
                    marks: Some(marks),
                    malformed: false,
                };
            }
        }

        MarkMatch {
            text: line,
            marks: None,
            malformed: false,
        }
    }
}

impl Default for MarkExtractor {
    fn default() -> Self {
        Self::new(MarkStyles::default())
    }
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A declared total line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalLine {
    /// `(Total for Question 3 = 6 marks)`
    Question { number: u32, marks: u32 },
    /// `TOTAL FOR PAPER = 100 MARKS`
    Paper { marks: u32 },
}

/// Recognizes "Total for ..." lines.
pub struct TotalMatcher {
    question_regex: Regex,
    paper_regex: Regex,
}

impl TotalMatcher {
    pub fn new() -> Self {
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap()
        };
        Self {
            question_regex: build(
                r"^\(?\s*total\s+for\s+question\s+(\d{1,3})\s*(?:=|is|:)\s*(\d{1,3})\s*marks?\s*\)?$",
            ),
            paper_regex: build(
                r"^\(?\s*total\s+for\s+(?:the\s+)?paper\s*(?:=|is|:)\s*(\d{1,4})\s*marks?\s*\)?$",
            ),
        }
    }

    /// Match a whole cleaned line.
    pub fn match_line(&self, line: &str) -> Option<TotalLine> {
        if let Some(caps) = self.question_regex.captures(line) {
            return Some(TotalLine::Question {
                number: caps[1].parse().ok()?,
                marks: caps[2].parse().ok()?,
            });
        }
        self.paper_regex
            .captures(line)
            .and_then(|caps| caps[1].parse().ok())
            .map(|marks| TotalLine::Paper { marks })
    }
}

impl Default for TotalMatcher {
    fn default() -> Self {
        Self::new()
    }
}
