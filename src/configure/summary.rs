use std::fmt;

/// Result of one reconcile step for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Created,
    Updated,
    Unchanged,
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    fn symbol(&self) -> &'static str {
        match self {
            Outcome::Passed | Outcome::Created | Outcome::Updated | Outcome::Unchanged => "✓",
            Outcome::Skipped(_) => "-",
            Outcome::Failed(_) => "✗",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => f.write_str("ok"),
            Outcome::Created => f.write_str("created"),
            Outcome::Updated => f.write_str("updated"),
            Outcome::Unchanged => f.write_str("already configured"),
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Credentials,
    Probe,
    Peer,
    DownloadClient,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Credentials => "credentials",
            Phase::Probe => "connectivity",
            Phase::Peer => "prowlarr application",
            Phase::DownloadClient => "download client",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SummaryEntry {
    pub phase: Phase,
    pub app: String,
    pub outcome: Outcome,
}

/// Per-application record of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub entries: Vec<SummaryEntry>,
}

impl RunSummary {
    pub fn record(&mut self, phase: Phase, app: &str, outcome: Outcome) {
        self.entries.push(SummaryEntry {
            phase,
            app: app.to_string(),
            outcome,
        });
    }

    pub fn outcome(&self, phase: Phase, app: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.phase == phase && e.app == app)
            .map(|e| &e.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.outcome.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failure()).count()
    }

    /// Human-readable report, one line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "{} {:<14} {:<22} {}\n",
                entry.outcome.symbol(),
                entry.app,
                entry.phase,
                entry.outcome
            ));
        }
        out.push_str(&format!(
            "\n{} steps, {} failed\n",
            self.entries.len(),
            self.failure_count()
        ));
        out
    }
}
