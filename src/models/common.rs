use std::fmt;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

/// Formal proof languages the refinement loop can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProofLanguage {
    #[default]
    Lean4,
    Coq,
    Dafny,
    FStar,
}

impl ProofLanguage {
    /// Human readable name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            ProofLanguage::Lean4 => "Lean 4",
            ProofLanguage::Coq => "Coq",
            ProofLanguage::Dafny => "Dafny",
            ProofLanguage::FStar => "F*",
        }
    }

    /// Info-string tags that open a fenced block of this language.
    pub fn fence_tags(&self) -> &'static [&'static str] {
        match self {
            ProofLanguage::Lean4 => &["lean4", "lean"],
            ProofLanguage::Coq => &["coq", "rocq"],
            ProofLanguage::Dafny => &["dafny"],
            ProofLanguage::FStar => &["fstar", "fst"],
        }
    }

    /// File extension (without the dot) of a proof source file
    pub fn file_extension(&self) -> &'static str {
        match self {
            ProofLanguage::Lean4 => "lean",
            ProofLanguage::Coq => "v",
            ProofLanguage::Dafny => "dfy",
            ProofLanguage::FStar => "fst",
        }
    }

    /// Checker program and mode arguments placed before the proof file path
    pub fn default_verifier(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            ProofLanguage::Lean4 => ("lean", &["--run"]),
            ProofLanguage::Coq => ("coqc", &[]),
            ProofLanguage::Dafny => ("dafny", &["verify"]),
            ProofLanguage::FStar => ("fstar.exe", &[]),
        }
    }
}

impl fmt::Display for ProofLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProofLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lean" | "lean4" => Ok(ProofLanguage::Lean4),
            "coq" | "rocq" => Ok(ProofLanguage::Coq),
            "dafny" => Ok(ProofLanguage::Dafny),
            "fstar" | "f*" => Ok(ProofLanguage::FStar),
            _ => Err(format!("Unsupported proof language: {}", s)),
        }
    }
}

/// Whether the prompt quotes only the latest diagnostic or every one seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStrategy {
    #[default]
    LastOnly,
    Cumulative,
}

impl FromStr for FeedbackStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last" | "lastonly" | "last-only" => Ok(FeedbackStrategy::LastOnly),
            "cumulative" | "all" => Ok(FeedbackStrategy::Cumulative),
            _ => Err(format!("Unsupported feedback strategy: {}", s)),
        }
    }
}
