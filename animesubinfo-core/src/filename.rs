//! Anime release file name parsing.
//!
//! Release names follow loose community conventions, for example
//! `[Group] Title - 05 (1080p) [ABCD1234].mkv` or `Title.S02E05.1080p.WEB-DL.mkv`.
//! [`ParsedFilename::parse`] recovers the fields used for subtitle matching.
//! It is heuristic: unknown shapes degrade to a title without episode rather
//! than failing.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{collapse_whitespace, compile_static_regex};

/// Extensions stripped before analysis.
const KNOWN_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "webm", "wmv", "flv", "mov", "ogm", "ogv", "ts", "m2ts", "rmvb",
    "rm", "mpg", "mpeg", "srt", "ass", "ssa", "sub", "txt", "vtt", "idx", "sup", "smi", "zip",
];

const VIDEO_TERMS: &[&str] = &[
    "x264", "x265", "h264", "h265", "h.264", "h.265", "hevc", "avc", "xvid", "divx", "av1", "vp9",
    "10bit", "10-bit", "8bit", "8-bit", "hi10", "hi10p", "hdr", "60fps",
];

const AUDIO_TERMS: &[&str] = &[
    "aac", "flac", "ac3", "eac3", "e-ac3", "dts", "dts-hd", "truehd", "mp3", "opus", "vorbis",
    "lpcm", "pcm", "2ch", "6ch", "dual audio", "dualaudio", "multi audio",
];

const SOURCES: &[&str] = &[
    "bd", "bdrip", "bdremux", "bluray", "blu-ray", "brrip", "dvd", "dvd5", "dvd9", "dvdrip",
    "dvd-rip", "r1dvd", "r2dvd", "hdtv", "hdtvrip", "tvrip", "tv-rip", "web", "webrip",
    "web-rip", "web-dl", "webdl", "hdrip", "laserdisc",
];

const TYPES: &[&str] = &[
    "tv", "movie", "gekijouban", "ova", "oav", "oad", "ona", "special", "specials", "sp",
];

static BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\[([^\[\]]*)\]|\(([^()]*)\)"));
static BRACKET_TOKEN_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"[\s,_+]+"));
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"\S+"));
static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)^(?:\d{3,4}[pi]|\d{3,4}[x×]\d{3,4})$"));
static CHECKSUM_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^[0-9A-Fa-f]{8}$"));
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"^(?:19|20)\d{2}$"));
static SXXEYY_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)\bS(\d{1,2})[ ._-]?E(\d{1,4})(?:v\d+)?\b")
});
static EPISODE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"(?i)\b(?:EP|Episode)[ ._]?(\d{1,4})(?:v\d+)?\b")
});
static DASH_EPISODE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?:^|\s)-\s*(\d{1,4})(?:v\d+)?(?:\s|$)"));
static TRAILING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\s(\d{1,4})(?:v\d+)?$"));
static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"(?i)\bS(\d{1,2})\b|\bSeason[ ._]?(\d{1,2})\b|\b(\d{1,2})(?:st|nd|rd|th)[ ._]Season\b",
    )
});

/// Fields recovered from an anime release file name.
///
/// All fields are public so callers that already know the metadata can build
/// a value by hand instead of parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    /// The input name, verbatim.
    pub file_name: Option<String>,
    pub anime_title: Option<String>,
    /// Episode number as written (`"05"`).
    pub episode_number: Option<String>,
    pub anime_season: Option<String>,
    pub anime_year: Option<String>,
    pub anime_type: Option<String>,
    pub video_resolution: Option<String>,
    pub release_group: Vec<String>,
    pub file_checksum: Vec<String>,
    pub source: Vec<String>,
    pub video_term: Vec<String>,
    pub audio_term: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Inside `[...]` or `(...)`.
    Bracket,
    /// Free text after the title.
    Loose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Resolution,
    VideoTerm,
    AudioTerm,
    Source,
    Type,
    Year,
    Checksum,
}

fn token_kind(token: &str, scope: Scope) -> Option<TokenKind> {
    let lower = token.to_lowercase();
    let lower = lower.as_str();
    if RESOLUTION_RE.is_match(token) {
        return Some(TokenKind::Resolution);
    }
    if VIDEO_TERMS.contains(&lower) {
        return Some(TokenKind::VideoTerm);
    }
    if AUDIO_TERMS.contains(&lower) {
        return Some(TokenKind::AudioTerm);
    }
    if SOURCES.contains(&lower) {
        return Some(TokenKind::Source);
    }
    if scope == Scope::Loose {
        return None;
    }
    if TYPES.contains(&lower) {
        return Some(TokenKind::Type);
    }
    if YEAR_RE.is_match(token) {
        return Some(TokenKind::Year);
    }
    if CHECKSUM_RE.is_match(token) {
        return Some(TokenKind::Checksum);
    }
    None
}

fn strip_known_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) =>
        {
            stem
        }
        _ => name,
    }
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.' | '~' | ','))
}

impl ParsedFilename {
    /// Parses a release file name (with or without directory and extension).
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let mut parsed = Self::default();
        let name = name.trim();
        if name.is_empty() {
            return parsed;
        }
        parsed.file_name = Some(name.to_string());

        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let stem = strip_known_extension(base);

        let mut loose = String::with_capacity(stem.len());
        let mut last = 0;
        for caps in BRACKET_RE.captures_iter(stem) {
            let Some(whole) = caps.get(0) else { continue };
            loose.push_str(&stem[last..whole.start()]);
            loose.push(' ');
            last = whole.end();

            let (content, square) = match (caps.get(1), caps.get(2)) {
                (Some(inner), _) => (inner.as_str(), true),
                (None, Some(inner)) => (inner.as_str(), false),
                (None, None) => continue,
            };
            parsed.absorb_bracket(content, square);
        }
        loose.push_str(&stem[last..]);

        let mut text = collapse_whitespace(&loose);
        if !stem.contains(' ') {
            text = collapse_whitespace(&text.replace(['_', '.'], " "));
        }
        parsed.absorb_loose_text(&text);
        parsed
    }

    /// True when a non-empty title was recovered.
    #[must_use]
    pub fn has_title(&self) -> bool {
        self.anime_title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn absorb_bracket(&mut self, content: &str, square: bool) {
        let content = content.trim();
        if content.is_empty() {
            return;
        }
        if let Some(kind) = token_kind(content, Scope::Bracket) {
            self.apply(kind, content);
            return;
        }

        let tokens: Vec<(&str, Option<TokenKind>)> = BRACKET_TOKEN_SPLIT_RE
            .split(content)
            .filter(|t| !t.is_empty())
            .map(|t| (t, token_kind(t, Scope::Bracket)))
            .collect();
        let all_known = tokens.iter().all(|(_, kind)| kind.is_some());

        if !all_known && square && self.release_group.is_empty() {
            self.release_group.push(content.to_string());
            return;
        }
        for (token, kind) in tokens {
            if let Some(kind) = kind {
                self.apply(kind, token);
            }
        }
    }

    fn absorb_loose_text(&mut self, text: &str) {
        let mut cutoff = text.len();

        if let Some(caps) = SXXEYY_RE.captures(text) {
            self.anime_season = caps.get(1).map(|m| m.as_str().to_string());
            self.episode_number = caps.get(2).map(|m| m.as_str().to_string());
            cutoff = cutoff.min(caps.get(0).map_or(cutoff, |m| m.start()));
        } else if let Some(caps) = EPISODE_WORD_RE
            .captures(text)
            .or_else(|| DASH_EPISODE_RE.captures(text))
        {
            self.episode_number = caps.get(1).map(|m| m.as_str().to_string());
            cutoff = cutoff.min(caps.get(0).map_or(cutoff, |m| m.start()));
        }

        if self.anime_season.is_none() {
            if let Some(caps) = SEASON_RE.captures(text) {
                self.anime_season = (1..=3)
                    .find_map(|i| caps.get(i))
                    .map(|m| m.as_str().to_string());
                cutoff = cutoff.min(caps.get(0).map_or(cutoff, |m| m.start()));
            }
        }

        if self.episode_number.is_none() {
            if let Some(caps) = TRAILING_NUMBER_RE.captures(&text[..cutoff]) {
                if let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) {
                    if YEAR_RE.is_match(number.as_str()) {
                        self.anime_year.get_or_insert_with(|| number.as_str().to_string());
                    } else {
                        self.episode_number = Some(number.as_str().to_string());
                    }
                    cutoff = whole.start();
                }
            }
        }

        let has_marker = cutoff < text.len();
        for (index, token) in TOKEN_RE.find_iter(text).enumerate() {
            let Some(kind) = token_kind(token.as_str(), Scope::Loose) else {
                continue;
            };
            if token.start() >= cutoff || (!has_marker && index > 0) {
                cutoff = cutoff.min(token.start());
                self.apply(kind, token.as_str());
            }
        }

        let mut title = trim_separators(&text[..cutoff]).to_string();
        // "Title 2019 - 01": a year right before the episode belongs to the show.
        if let Some((head, tail)) = title.rsplit_once(' ') {
            if YEAR_RE.is_match(tail) && !trim_separators(head).is_empty() {
                self.anime_year.get_or_insert_with(|| tail.to_string());
                title = trim_separators(head).to_string();
            }
        }
        self.anime_title = (!title.is_empty()).then_some(title);
    }

    fn apply(&mut self, kind: TokenKind, token: &str) {
        let token = token.to_string();
        match kind {
            TokenKind::Resolution => {
                self.video_resolution.get_or_insert(token);
            }
            TokenKind::VideoTerm => self.video_term.push(token),
            TokenKind::AudioTerm => self.audio_term.push(token),
            TokenKind::Source => self.source.push(token),
            TokenKind::Type => {
                self.anime_type.get_or_insert(token);
            }
            TokenKind::Year => {
                self.anime_year.get_or_insert(token);
            }
            TokenKind::Checksum => self.file_checksum.push(token),
        }
    }
}

impl From<&str> for ParsedFilename {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for ParsedFilename {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&String> for ParsedFilename {
    fn from(name: &String) -> Self {
        Self::parse(name)
    }
}
