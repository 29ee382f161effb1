//! Lyrics-to-speech-prompt transformation
//!
//! Lyrics may carry bracketed section tags such as `[Verse]` or
//! `[Chorus]`. When any tag is present the lyrics are rewritten as a
//! two-speaker script: chorus-like sections go to a secondary
//! synthetic voice, everything else stays with the primary voice.
//! Untagged lyrics pass through untouched as a single-voice prompt.

/// Speaker label for the primary synthetic voice
pub const PRIMARY_SPEAKER: &str = "Speaker1";
/// Speaker label for the secondary synthetic voice
pub const SECONDARY_SPEAKER: &str = "Speaker2";

/// Section names routed to the secondary speaker (lower-cased match)
const SECONDARY_SECTIONS: [&str; 2] = ["chorus", "bridge"];

/// Finalized prompt text for the speech model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSynthesisPrompt {
    /// Prompt text; speaker-labelled lines when `multi_speaker`
    pub text: String,
    /// Whether the text is a two-speaker script
    pub multi_speaker: bool,
}

impl SpeechSynthesisPrompt {
    /// Single-voice prompt passing the text through unchanged
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            multi_speaker: false,
        }
    }
}

/// One parsed lyric section: optional tag name plus its content
#[derive(Debug)]
struct Section {
    /// Lower-cased tag name, `None` for text before the first tag
    tag: Option<String>,
    content: String,
}

/// Transform lyrics into a speech prompt.
///
/// Returns the original text with `multi_speaker = false` when no
/// bracketed tag exists. Otherwise every non-empty lyric line is
/// prefixed with its speaker label, newline-separated; the prompt is
/// marked multi-speaker even when no section actually routes to the
/// secondary voice. Empty or whitespace-only sections are dropped.
pub fn transform(lyrics: &str) -> SpeechSynthesisPrompt {
    if !lyrics.contains('[') {
        return SpeechSynthesisPrompt::single(lyrics);
    }

    let sections = parse_sections(lyrics);
    let mut lines = Vec::new();

    for section in &sections {
        let speaker = match &section.tag {
            Some(tag) if SECONDARY_SECTIONS.contains(&tag.as_str()) => SECONDARY_SPEAKER,
            _ => PRIMARY_SPEAKER,
        };
        for line in section.content.lines() {
            let line = line.trim();
            if !line.is_empty() {
                lines.push(format!("{speaker}: {line}"));
            }
        }
    }

    SpeechSynthesisPrompt {
        text: lines.join("\n"),
        multi_speaker: true,
    }
}

/// Split lyrics into sections at `[Tag]` markers.
///
/// Text before the first tag becomes an untagged section. A `[`
/// without a closing `]` is treated as ordinary content.
fn parse_sections(lyrics: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut rest = lyrics;
    let mut current_tag: Option<String> = None;

    loop {
        match find_tag(rest) {
            Some((start, end, tag)) => {
                push_section(&mut sections, current_tag.take(), &rest[..start]);
                current_tag = Some(tag);
                rest = &rest[end..];
            }
            None => {
                push_section(&mut sections, current_tag.take(), rest);
                break;
            }
        }
    }

    sections
}

/// Locate the next complete `[Tag]` marker; returns the byte range of
/// the marker and the lower-cased tag name.
fn find_tag(text: &str) -> Option<(usize, usize, String)> {
    let open = text.find('[')?;
    let close_rel = text[open..].find(']')?;
    let close = open + close_rel;
    let tag = text[open + 1..close].trim().to_lowercase();
    Some((open, close + 1, tag))
}

fn push_section(sections: &mut Vec<Section>, tag: Option<String>, content: &str) {
    if content.trim().is_empty() {
        return;
    }
    sections.push(Section {
        tag,
        content: content.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_lyrics_pass_through() {
        let prompt = transform("Just a simple song\nwith two lines");
        assert!(!prompt.multi_speaker);
        assert_eq!(prompt.text, "Just a simple song\nwith two lines");
    }

    #[test]
    fn chorus_routes_to_secondary_speaker() {
        let prompt = transform("[Verse] Hello [Chorus] World");
        assert!(prompt.multi_speaker);
        assert_eq!(prompt.text, "Speaker1: Hello\nSpeaker2: World");
    }

    #[test]
    fn bridge_routes_to_secondary_speaker() {
        let prompt = transform("[Verse]\nfirst line\n[Bridge]\ncrossing over");
        assert_eq!(
            prompt.text,
            "Speaker1: first line\nSpeaker2: crossing over"
        );
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let prompt = transform("[CHORUS] shout it out");
        assert!(prompt.multi_speaker);
        assert_eq!(prompt.text, "Speaker2: shout it out");
    }

    #[test]
    fn tags_without_secondary_sections_still_mark_multi_speaker() {
        // A bracket was found, so the script form is emitted even
        // though every line stays with the primary speaker.
        let prompt = transform("[Verse] only verses here [Verse 2] more verses");
        assert!(prompt.multi_speaker);
        assert_eq!(
            prompt.text,
            "Speaker1: only verses here\nSpeaker1: more verses"
        );
    }

    #[test]
    fn text_before_first_tag_goes_to_primary() {
        let prompt = transform("intro line [Chorus] refrain");
        assert_eq!(prompt.text, "Speaker1: intro line\nSpeaker2: refrain");
    }

    #[test]
    fn empty_sections_are_dropped() {
        let prompt = transform("[Verse]   \n[Chorus] the hook");
        assert_eq!(prompt.text, "Speaker2: the hook");
    }

    #[test]
    fn unterminated_bracket_is_ordinary_content() {
        let prompt = transform("[Verse] la la [unfinished");
        assert!(prompt.multi_speaker);
        assert_eq!(prompt.text, "Speaker1: la la [unfinished");
    }

    #[test]
    fn multi_line_sections_prefix_every_line() {
        let prompt = transform("[Verse]\none\ntwo\n[Chorus]\nthree");
        assert_eq!(
            prompt.text,
            "Speaker1: one\nSpeaker1: two\nSpeaker2: three"
        );
    }
}
