use super::Painter;
use lorekeep_engine::hint_for;
use lorekeep_types::ScanVerdict;
use std::fmt::Write;

pub fn render_verdict(source: &str, verdict: &ScanVerdict, p: &Painter) -> String {
    match verdict {
        ScanVerdict::Clean => format!("{} {}: no secrets found", p.ok("✓"), source),
        ScanVerdict::Flagged(rules) => {
            let mut out = format!("{} {}: possible secrets found", p.error("✗"), source);
            for rule in rules {
                let _ = write!(out, "\n  - {}: {}", rule, hint_for(*rule));
            }
            out
        }
    }
}
