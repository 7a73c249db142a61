use std::path::PathBuf;

use serde::Serialize;
use steamclean_steam::CandidateMap;

/// One cleanup candidate as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub path: PathBuf,
    pub size_mb: f64,
}

/// Candidates in path order with their combined size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub candidates: Vec<Candidate>,
    pub total_mb: f64,
}

impl Report {
    pub fn from_candidates(candidates: &CandidateMap) -> Self {
        let candidates: Vec<Candidate> = candidates
            .iter()
            .map(|(path, size_mb)| Candidate {
                path: path.clone(),
                size_mb: *size_mb,
            })
            .collect();
        let total_mb = candidates.iter().fold(0.0, |acc, c| acc + c.size_mb);
        Self {
            candidates,
            total_mb,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, crate::FileOpsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable listing, one candidate per line plus a total.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for c in &self.candidates {
            out.push_str(&format!("{:>10.2} MB  {}\n", c.size_mb, c.path.display()));
        }
        out.push_str(&format!(
            "{} file(s), {:.2} MB total\n",
            self.candidates.len(),
            self.total_mb
        ));
        out
    }
}
