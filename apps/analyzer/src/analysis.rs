//! Analysis result: the structured tech-stack breakdown and learning roadmap
//! every provider must return.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AdapterError;

/// How strongly the job description asks for a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    /// "required", "must have", "essential"
    Required,
    /// "preferred", "nice to have", "plus"
    Preferred,
    /// "bonus", "good to have"
    NiceToHave,
}

impl Importance {
    pub fn label(&self) -> &'static str {
        match self {
            Importance::Required => "Required",
            Importance::Preferred => "Preferred",
            Importance::NiceToHave => "Nice to have",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: String,
    pub importance: Importance,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: String,
    pub duration: String,
    pub topics: Vec<String>,
    pub resources: Vec<String>,
}

/// Full structured output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub technologies: Vec<Technology>,
    pub roadmap: Vec<RoadmapPhase>,
}

const REQUIRED_FIELDS: [&str; 3] = ["summary", "technologies", "roadmap"];

impl AnalysisResult {
    /// Builds a result from the JSON object a model returned.
    ///
    /// A top-level field that is absent, null, or (for `summary`) empty is an
    /// invalid response. Fields that are present but mistyped are a parse error.
    pub fn from_value(value: Value) -> Result<Self, AdapterError> {
        for field in REQUIRED_FIELDS {
            match value.get(field) {
                None | Some(Value::Null) => return Err(AdapterError::InvalidResponse(field)),
                Some(Value::String(s)) if s.is_empty() => {
                    return Err(AdapterError::InvalidResponse(field))
                }
                Some(_) => {}
            }
        }

        serde_json::from_value(value).map_err(AdapterError::Parse)
    }

    /// Technologies grouped by category, categories in first-seen order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&Technology>)> {
        let mut groups: Vec<(&str, Vec<&Technology>)> = Vec::new();
        for tech in &self.technologies {
            match groups.iter_mut().find(|(c, _)| *c == tech.category) {
                Some((_, techs)) => techs.push(tech),
                None => groups.push((tech.category.as_str(), vec![tech])),
            }
        }
        groups
    }
}
