use lorekeep_types::ConversationTurn;

const TURN_SEPARATOR: &str = "\n\n";

/// Plain-text transcript handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTranscript {
    pub text: String,
    pub turns_included: usize,
    pub turns_omitted: usize,
}

/// Render turns as `User: ...` / `Assistant: ...` blocks separated by blank lines.
///
/// When the result would exceed `max_chars` characters the oldest turns are
/// dropped and a marker line records how many. The newest turn is always
/// kept, cut from the front if it alone is too long. `max_chars == 0`
/// disables the limit.
pub fn render_transcript(turns: &[ConversationTurn], max_chars: usize) -> RenderedTranscript {
    let blocks: Vec<String> = turns.iter().map(render_turn).collect();

    let limit = if max_chars == 0 { usize::MAX } else { max_chars };

    let mut kept: Vec<String> = Vec::new();
    let mut used = 0usize;
    for block in blocks.iter().rev() {
        let separator = if kept.is_empty() {
            0
        } else {
            TURN_SEPARATOR.len()
        };
        let cost = block.chars().count() + separator;
        if used.saturating_add(cost) > limit {
            break;
        }
        used += cost;
        kept.push(block.clone());
    }

    if kept.is_empty()
        && let Some(last) = turns.last()
    {
        kept.push(render_cut_turn(last, limit));
    }
    kept.reverse();

    let omitted = blocks.len() - kept.len();
    let mut text = String::new();
    if omitted > 0 {
        text.push_str(&format!("[{} earlier turns omitted]{}", omitted, TURN_SEPARATOR));
    }
    text.push_str(&kept.join(TURN_SEPARATOR));

    RenderedTranscript {
        text,
        turns_included: kept.len(),
        turns_omitted: omitted,
    }
}

fn label_prefix(turn: &ConversationTurn) -> String {
    format!("{}: ", turn.role.label())
}

fn render_turn(turn: &ConversationTurn) -> String {
    format!("{}{}", label_prefix(turn), turn.text.trim())
}

/// Keep the end of the turn's text within `limit` chars, label included.
///
/// The label is kept even when it alone exceeds `limit`.
fn render_cut_turn(turn: &ConversationTurn, limit: usize) -> String {
    let prefix = label_prefix(turn);
    let room = limit.saturating_sub(prefix.chars().count());
    format!("{}{}", prefix, tail_chars(turn.text.trim(), room).trim_start())
}

fn tail_chars(text: &str, n: usize) -> String {
    let skip = text.chars().count().saturating_sub(n);
    text.chars().skip(skip).collect()
}
