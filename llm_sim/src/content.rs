//! Canned replies and the prompt-to-reply lookup.

/// Short reply returned for greeting prompts.
pub const GREETING_TEXT: &str = "Hello! I am a simulated assistant. How can I help you today?";

/// Longer passage returned for every other prompt.
pub const FILLER_TEXT: &str = "Once upon a time, in a quiet valley surrounded by tall mountains, \
there lived a curious fox who spent her days exploring the forest. Every morning she would \
follow the river to the old stone bridge, where travellers stopped to rest and share stories \
of distant lands. She listened carefully to every tale, dreaming of the day she would cross \
the mountains herself. One autumn evening, a wandering owl told her of a hidden meadow where \
the stars shone brighter than anywhere else in the world. The fox decided that the time had \
come to begin her own adventure, and at first light she set off along the winding path, \
carrying nothing but her courage and the stories she had gathered over the years.";

const GREETING_MARKERS: [&str; 2] = ["hi", "hello"];

/// Pick the canned reply for `query`.
///
/// Matching is a case-insensitive substring test, so "this" or "chill" count
/// as greetings too.
pub fn select(query: &str) -> &'static str {
    tracing::debug!(query, "Selecting canned reply");

    let lowered = query.to_lowercase();
    if GREETING_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        GREETING_TEXT
    } else {
        FILLER_TEXT
    }
}
