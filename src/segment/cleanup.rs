//! Per-line text cleanup and page-furniture filtering.

use regex::{Regex, RegexBuilder};
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Minimal cleanup: Unicode NFC normalization and whitespace only
    Minimal,
    /// Standard cleanup: minimal + ligatures, hyphenation, page furniture
    #[default]
    Standard,
    /// Aggressive cleanup: standard + PUA removal and rotated margin text
    Aggressive,
}

/// Options for line cleanup.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Join words hyphenated across line breaks
    pub fix_hyphenation: bool,

    /// Drop lines that are only a page number
    pub remove_page_numbers: bool,

    /// Drop page furniture ("Turn over", "BLANK PAGE", margin warnings)
    pub remove_furniture: bool,

    /// Drop exam-board barcodes such as `*P12345A0124*`
    pub remove_barcodes: bool,

    /// Drop margin text extracted in reverse (rotated "DO NOT WRITE IN THIS AREA")
    pub remove_rotated_margins: bool,

    /// Extra whole-line patterns to drop (case-insensitive)
    pub noise_patterns: Vec<String>,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options. No line is ever dropped.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_pua: false,
            fix_hyphenation: false,
            remove_page_numbers: false,
            remove_furniture: false,
            remove_barcodes: false,
            remove_rotated_margins: false,
            noise_patterns: Vec::new(),
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            remove_pua: false,
            fix_hyphenation: true,
            remove_page_numbers: true,
            remove_furniture: true,
            remove_barcodes: true,
            remove_rotated_margins: false,
            noise_patterns: Vec::new(),
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            remove_rotated_margins: true,
            ..Self::standard()
        }
    }

    /// Add a whole-line pattern to drop.
    pub fn with_noise_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.noise_patterns.push(pattern.into());
        self
    }

    /// Whether any rule can drop a line.
    pub fn drops_lines(&self) -> bool {
        self.remove_page_numbers
            || self.remove_furniture
            || self.remove_barcodes
            || self.remove_rotated_margins
            || !self.noise_patterns.is_empty()
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// What cleanup made of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanLine {
    /// Nothing visible remained
    Blank,
    /// Page furniture to drop
    Noise,
    /// Normalized text
    Text(String),
}

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

const PAGE_NUMBER: &str = r"^(?:[-–—]?\s*\d{1,3}\s*[-–—]?|page\s+\d{1,3}(?:\s+of\s+\d{1,3})?)$";
const FURNITURE: &str = r"^(?:turn\s+over(?:\s+for\s+.*)?|blank\s+page|do\s+not\s+write\s+in\s+th(?:is|e)\s+(?:area|space|margin)|end\s+of\s+(?:questions|paper|examination)|(?:©|\(c\)|copyright)\s*.*\d{4}.*)$";
const BARCODE: &str = r"^\*[a-z]?\d{4,}[a-z0-9]*\*$";
const ROTATED_MARGIN: &str = r"^aera\s+siht\s+ni\s+etirw\s+ton\s+od$";

/// Line cleanup pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
    noise: Vec<Regex>,
    whitespace_regex: Regex,
    hyphen_regex: Regex,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    ///
    /// Invalid user patterns are skipped with a warning.
    pub fn new(options: CleanupOptions) -> Self {
        let mut sources: Vec<&str> = Vec::new();
        if options.remove_page_numbers {
            sources.push(PAGE_NUMBER);
        }
        if options.remove_furniture {
            sources.push(FURNITURE);
        }
        if options.remove_barcodes {
            sources.push(BARCODE);
        }
        if options.remove_rotated_margins {
            sources.push(ROTATED_MARGIN);
        }

        let mut noise: Vec<Regex> = sources.into_iter().filter_map(compile_line_pattern).collect();
        for pattern in &options.noise_patterns {
            match compile_line_pattern(pattern) {
                Some(re) => noise.push(re),
                None => log::warn!("Ignoring invalid noise pattern: {}", pattern),
            }
        }

        Self {
            options,
            noise,
            whitespace_regex: Regex::new(r"\s+").unwrap(),
            hyphen_regex: Regex::new(r"[A-Za-z]-$").unwrap(),
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Options this pipeline was built with.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Normalize one line and classify it.
    pub fn process(&self, text: &str) -> CleanLine {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.remove_pua {
            result = result.chars().filter(|c| !is_pua(*c)).collect();
        }

        let result = self.whitespace_regex.replace_all(result.trim(), " ");
        if result.is_empty() {
            return CleanLine::Blank;
        }

        if self.noise.iter().any(|re| re.is_match(&result)) {
            return CleanLine::Noise;
        }

        CleanLine::Text(result.into_owned())
    }

    /// Append a cleaned fragment to a record body.
    pub fn join(&self, body: &mut String, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if body.is_empty() {
            body.push_str(fragment);
            return;
        }

        let starts_lowercase = fragment.chars().next().is_some_and(|c| c.is_lowercase());
        if self.options.fix_hyphenation && starts_lowercase && self.hyphen_regex.is_match(body) {
            body.pop();
            body.push_str(fragment);
        } else {
            body.push(' ');
            body.push_str(fragment);
        }
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn compile_line_pattern(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

fn is_pua(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}
