use itertools::Itertools;

use crate::metrics::split_words;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentClass {
    /// A whole reference word typed exactly
    CorrectWord,
    /// The letter sitting under the mistake marker
    IncorrectLetter,
    Plain,
}

impl SegmentClass {
    fn css_class(&self) -> Option<&'static str> {
        match self {
            SegmentClass::CorrectWord => Some("correct-word"),
            SegmentClass::IncorrectLetter => Some("incorrect-letter"),
            SegmentClass::Plain => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub class: SegmentClass,
}

impl Segment {
    fn new(text: impl Into<String>, class: SegmentClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// Reference text annotated against what has been typed so far
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feedback {
    pub segments: Vec<Segment>,
}

impl Feedback {
    /// Builds the annotated reference.
    ///
    /// Words typed exactly become a single `CorrectWord` segment. Every other
    /// word is emitted one letter at a time, and only the letter whose absolute
    /// offset equals `mistake_marker` can be flagged, and only when the typed
    /// word holds a different character at that position.
    pub fn render(reference: &str, buffer: &str, mistake_marker: Option<usize>) -> Self {
        let reference_words = split_words(reference.trim());
        let typed_words = split_words(buffer);
        let last = reference_words.len().saturating_sub(1);

        let mut segments = Vec::new();
        let mut offset = 0;

        for (w, word) in reference_words.iter().enumerate() {
            let typed = typed_words.get(w).copied().unwrap_or("");

            if typed == *word {
                segments.push(Segment::new(*word, SegmentClass::CorrectWord));
                offset += word.chars().count();
            } else {
                for (l, expected) in word.chars().enumerate() {
                    let differs = typed.chars().nth(l).is_some_and(|c| c != expected);
                    let class = if mistake_marker == Some(offset) && differs {
                        SegmentClass::IncorrectLetter
                    } else {
                        SegmentClass::Plain
                    };
                    segments.push(Segment::new(expected, class));
                    offset += 1;
                }
            }

            if w < last {
                segments.push(Segment::new(" ", SegmentClass::Plain));
                offset += 1;
            }
        }

        Self { segments }
    }

    /// Markup with one tagged span per segment
    pub fn to_markup(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment.class.css_class() {
                Some(class) => format!(
                    "<span class=\"{class}\">{}</span>",
                    escape(&segment.text)
                ),
                None => format!("<span>{}</span>", escape(&segment.text)),
            })
            .join("")
    }

    /// The reference text with all annotation stripped
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn correct_words(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.class == SegmentClass::CorrectWord)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Absolute character offsets of flagged letters
    pub fn incorrect_offsets(&self) -> Vec<usize> {
        let mut offset = 0;
        let mut flagged = Vec::new();
        for segment in &self.segments {
            if segment.class == SegmentClass::IncorrectLetter {
                flagged.push(offset);
            }
            offset += segment.text.chars().count();
        }
        flagged
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
