//! Composes generation requests from a problem statement and verifier feedback.
//!
//! Every function here is pure: the same statement, language and diagnostics
//! always produce the same prompt.

use crate::models::common::ProofLanguage;
use crate::models::problem::ProblemStatement;
use crate::models::prompt::Prompt;

/// A diagnostic quoted back to the generator, tagged with the attempt that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub attempt: u32,
    pub diagnostic: &'a str,
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_prompt(language: ProofLanguage) -> String {
        format!("You are a helpful assistant that generates {} code.", language)
    }

    /// Build the request for the next attempt.
    ///
    /// `feedback` is empty on the first attempt. With one entry the diagnostic
    /// is quoted as the reason the previous attempt failed; with several, each
    /// is listed under the attempt that produced it.
    pub fn build(
        problem: &ProblemStatement,
        language: ProofLanguage,
        feedback: &[Feedback<'_>]
    ) -> Prompt {
        let mut user = format!(
            "You are a mathematical proof assistant. \
             Generate a formal proof in {lang} for the following conjecture/problem:\n\n\
             {problem}\n\n\
             The proof must be complete and syntactically valid in {lang}. \
             Include the necessary imports and use appropriate tactics. \
             Generate only the {lang} code, without additional explanation.\n\n",
            lang = language,
            problem = problem.as_str()
        );

        match feedback {
            [] => {}
            [single] => {
                user.push_str(
                    &format!(
                        "Previous attempts failed with the following {} errors:\n```\n{}\n```\n\
                         Please fix these errors and provide a valid proof.",
                        language,
                        single.diagnostic
                    )
                );
            }
            many => {
                user.push_str(
                    &format!("Previous attempts failed with the following {} errors:\n", language)
                );
                for entry in many {
                    user.push_str(
                        &format!("\nAttempt {}:\n```\n{}\n```\n", entry.attempt, entry.diagnostic)
                    );
                }
                user.push_str("\nPlease fix these errors and provide a valid proof.");
            }
        }

        Prompt {
            system: Self::system_prompt(language),
            user,
        }
    }
}
