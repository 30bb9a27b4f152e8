pub mod learnings;
pub mod scanner;
pub mod transcript;

pub use learnings::{is_no_learnings, normalize_learnings};
pub use scanner::{Rule, hint_for, rules, scan};
pub use transcript::{RenderedTranscript, render_transcript};
