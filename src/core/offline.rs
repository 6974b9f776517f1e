//! Offline text processor.
//!
//! Deterministic, dependency-free approximation of each writing action, used
//! whenever a live dispatch is impossible or fails. Variety between inputs
//! comes from a stable hash of the text rather than an RNG, so the same
//! input always yields the same output. A simulated delay keeps perceived
//! latency consistent with real calls; tests construct the processor with no
//! delay.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::core::prompt::Action;

// =============================================================================
// Simulated latency
// =============================================================================

/// Bounds for the simulated processing delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingDelay {
    min: Duration,
    max: Duration,
}

impl ProcessingDelay {
    /// The 1-3s band live calls tend to land in.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }

    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Custom bounds; `max` below `min` is clamped up to `min`.
    #[must_use]
    pub fn bounded(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Pick a delay inside the bounds, stable for a given seed.
    fn pick(&self, seed: u64) -> Duration {
        let span = self.max.saturating_sub(self.min);
        if span.is_zero() {
            return self.min;
        }
        let offset_ms = seed % u64::try_from(span.as_millis()).unwrap_or(u64::MAX).max(1);
        self.min + Duration::from_millis(offset_ms)
    }
}

impl Default for ProcessingDelay {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Offline processor
// =============================================================================

static WORDS_UPBEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(good|nice|okay)\b").unwrap());
static WORDS_DOWNBEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(bad|poor)\b").unwrap());
static LONE_I: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bi\b").unwrap());
static SENTENCE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s*([a-z])").unwrap());

const CONTINUATIONS: &[&str] = &[
    " The shadows lengthened as evening approached, casting everything in a golden hue.",
    " She paused, listening to the distant sound of footsteps echoing down the corridor.",
    " The weight of the decision pressed heavily on his shoulders as he considered his options.",
    " Time seemed to slow as the moment stretched between them, heavy with unspoken words.",
    " The old house creaked softly, as if sharing its secrets with those who would listen.",
];

const TONE_LABELS: &[&str] = &[
    "contemplative",
    "urgent",
    "wistful",
    "measured",
    "playful",
];

const PLOT_ELEMENTS: &[&str] = &[
    "A secondary character discovers something that reframes the opening scene",
    "An external deadline forces the protagonist to act before they feel ready",
    "A place described earlier returns under very different circumstances",
    "A small lie told in passing grows consequences of its own",
    "The antagonist is shown being right about one important thing",
    "An object changes hands and carries meaning neither party states aloud",
];

const SUGGESTION_POOL: &[&str] = &[
    "Consider adding more sensory details to enhance immersion",
    "This character could benefit from deeper emotional development",
    "The pacing might be improved with shorter, punchier sentences",
    "Try adding dialogue to break up narrative sections",
    "Consider the emotional arc of this scene",
    "This moment could use more specific, concrete details",
];

const PROMPT_SEEDS: &[(&str, &str)] = &[
    (
        "The Unsent Letter",
        "Write a scene in which a character rereads a letter they never sent, then \
         encounters its intended recipient. Include one concrete object that anchors \
         the memory and end on a decision.",
    ),
    (
        "Low Tide",
        "Write about a town where something long submerged becomes visible once a \
         year. Follow a character who has been waiting for this day, and let the \
         weather mirror what they find.",
    ),
    (
        "Borrowed Voice",
        "Write a passage narrated by someone imitating another person's way of \
         speaking. Let the imitation slip at a crucial moment and show what the \
         slip reveals.",
    ),
    (
        "The Late Train",
        "Two strangers miss the last train for different reasons. Write their \
         conversation on the platform, keeping each one's real errand hidden until \
         the final lines.",
    ),
];

/// Deterministic offline approximation of each action.
#[derive(Debug, Clone)]
pub struct OfflineProcessor {
    delay: ProcessingDelay,
}

impl OfflineProcessor {
    #[must_use]
    pub const fn new(delay: ProcessingDelay) -> Self {
        Self { delay }
    }

    /// Processor with no simulated latency, for tests and benchmarks.
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(ProcessingDelay::none())
    }

    /// Apply the offline transformation for `action` to `text`.
    ///
    /// Always returns a usable result; never fails, never performs I/O. The
    /// model label only feeds the log line, mirroring what a live call would
    /// have recorded.
    pub async fn process(&self, text: &str, action: Action, model_label: &str) -> String {
        let seed = stable_seed(text);
        let delay = self.delay.pick(seed);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = transform(text, action, seed);
        tracing::debug!(
            action = %action,
            model = model_label,
            delay_ms = delay.as_millis() as u64,
            chars = result.len(),
            "offline processing complete"
        );
        result
    }
}

impl Default for OfflineProcessor {
    fn default() -> Self {
        Self::new(ProcessingDelay::standard())
    }
}

/// Stable 64-bit seed for an input text.
fn stable_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

fn transform(text: &str, action: Action, seed: u64) -> String {
    match action {
        Action::Improve => improve(text),
        Action::Shorten => shorten(text),
        Action::Expand => expand(text),
        Action::FixGrammar => fix_grammar(text),
        Action::AnalyzeTone => analyze_tone(text, seed),
        Action::GeneratePlot => pick_list(PLOT_ELEMENTS, 4, seed),
        Action::ContinueStory => pick_one(CONTINUATIONS, seed).trim_start().to_string(),
        Action::WritingPrompt => writing_prompt(seed),
        Action::ContextSuggestion => {
            let count = 3 + usize::try_from(seed % 2).unwrap_or(0);
            pick_list(SUGGESTION_POOL, count, seed)
        }
    }
}

fn improve(text: &str) -> String {
    let swapped = WORDS_UPBEAT.replace_all(text, "excellent");
    let swapped = WORDS_DOWNBEAT.replace_all(&swapped, "challenging");
    let mut result = swapped.trim_end().to_string();
    if !result.is_empty() {
        result.push_str(" The narrative flows beautifully here.");
    }
    result
}

fn shorten(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let keep = ((words.len() as f64) * 0.7).floor() as usize;
    let keep = keep.max(1).min(words.len());
    let mut result = words[..keep].join(" ");
    if keep < words.len() {
        result.push_str("...");
    }
    result
}

fn expand(text: &str) -> String {
    format!(
        "{} This moment held deeper significance, revealing layers of meaning \
         that had previously remained hidden beneath the surface.",
        text.trim_end()
    )
}

fn fix_grammar(text: &str) -> String {
    let capitalized = LONE_I.replace_all(text, "I");
    let spaced = SENTENCE_START.replace_all(&capitalized, |caps: &regex::Captures<'_>| {
        format!("{} {}", &caps[1], caps[2].to_uppercase())
    });
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            format!("{}{}", first.to_uppercase(), chars.as_str())
        }
        _ => spaced.into_owned(),
    }
}

fn analyze_tone(text: &str, seed: u64) -> String {
    let label = pick_one(TONE_LABELS, seed);
    let sentences = text.split(['.', '!', '?']).filter(|s| !s.trim().is_empty()).count();
    let words = text.split_whitespace().count();
    let rhythm = if sentences > 0 && words / sentences.max(1) > 18 {
        "long, flowing sentences"
    } else {
        "short, direct sentences"
    };
    format!(
        "The tone reads as {} with a consistent narrative voice. The passage \
         favors {} across roughly {} words, and the word choice keeps the \
         register steady from start to finish.",
        label, rhythm, words
    )
}

fn writing_prompt(seed: u64) -> String {
    let idx = usize::try_from(seed % PROMPT_SEEDS.len() as u64).unwrap_or(0);
    let (title, prompt) = PROMPT_SEEDS[idx];
    format!("Title: {}\nPrompt: {}", title, prompt)
}

fn pick_one<'a>(pool: &[&'a str], seed: u64) -> &'a str {
    let idx = usize::try_from(seed % pool.len() as u64).unwrap_or(0);
    pool[idx]
}

/// Bulleted list of `count` pool entries starting at a seeded offset.
fn pick_list(pool: &[&str], count: usize, seed: u64) -> String {
    let start = usize::try_from(seed % pool.len() as u64).unwrap_or(0);
    (0..count.min(pool.len()))
        .map(|i| format!("- {}", pool[(start + i) % pool.len()]))
        .collect::<Vec<_>>()
        .join("\n")
}
