use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reply the generator gives when a transcript holds nothing worth keeping
pub const NO_LEARNINGS_SENTINEL: &str = "NO_NEW_LEARNINGS";

/// A dated, attributed block appended to the knowledge file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningsEntry {
    pub date: NaiveDate,
    pub machine: String,
    pub body: String,
}

impl LearningsEntry {
    pub fn new(date: NaiveDate, machine: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            date,
            machine: machine.into(),
            body: body.into(),
        }
    }

    /// `## YYYY-MM-DD (machine)`
    pub fn heading(&self) -> String {
        format!("## {} ({})", self.date.format("%Y-%m-%d"), self.machine)
    }

    /// Text appended to the knowledge file: a blank line, the heading, the body.
    ///
    /// The block always ends with exactly one newline so that the next
    /// appended block is separated from it by a single blank line.
    pub fn render_block(&self) -> String {
        format!("\n{}\n{}\n", self.heading(), self.body.trim_end())
    }
}
