use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Input };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use proofsmith::{ Attempt, Phase, ProofLanguage, RecoverableError, Run, RunObserver, RunStatus, Verdict };

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn term_width() -> usize {
    let width = Term::stdout().size().1 as usize;
    if width == 0 { 80 } else { width }
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = term_width().saturating_sub(4).max(20);
    for line in text.lines() {
        for wrapped_line in wrap(line, width) {
            println!("  {}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Print an error together with its remediation hint, if any
pub fn print_error_with_hint<E: RecoverableError + std::fmt::Display>(err: &E) {
    print_error(&err.to_string());
    if let Some(hint) = err.recovery_strategy() {
        println!("{} {}", "HINT:".cyan().bold(), hint);
    }
}

/// Print a verdict with color
pub fn print_verdict(verdict: Verdict) {
    match verdict {
        Verdict::Valid => println!("{}", "✓ Valid".green().bold()),
        Verdict::Invalid => println!("{}", "✗ Invalid".red().bold()),
    }
}

/// Print the terminal status of a run
pub fn print_run_status(run: &Run) {
    match &run.status {
        RunStatus::Succeeded => {
            print_success(
                &format!("Proof verified after {} of {} attempt(s)", run.attempts.len(), run.max_attempts)
            );
        }
        RunStatus::Failed(_) => {
            match run.fatal_error() {
                Some(err) => print_error_with_hint(err),
                None =>
                    print_error(
                        &format!("No valid proof found after {} attempt(s)", run.attempts.len())
                    ),
            }
        }
    }
    print_result("Duration", &format!("{:.1}s", run.duration.as_secs_f64()));
}

/// Ask for a problem statement on the terminal
pub fn prompt_statement() -> std::io::Result<String> {
    Input::<String>::with_theme(&get_theme())
        .with_prompt("Problem statement to prove")
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Display proof source under its language name
pub fn display_proof(language: ProofLanguage, code: &str) {
    println!("Language: {}", language.display_name().cyan());
    println!("\n{}\n", code);
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Renders a run on the terminal as it progresses
pub struct ConsoleObserver {
    language: ProofLanguage,
    model: String,
    tool: String,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new(language: ProofLanguage, model: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            language,
            model: model.into(),
            tool: tool.into(),
            spinner: None,
        }
    }

    fn spin(&mut self, message: String) {
        match &self.spinner {
            Some(spinner) => spinner.set_message(message),
            None => {
                self.spinner = Some(spinner_with_message(&message));
            }
        }
    }

    fn stop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn on_attempt_started(&mut self, attempt: u32, max_attempts: u32) {
        print_header(&format!("Attempt {}/{}", attempt, max_attempts));
    }

    fn on_phase(&mut self, attempt: u32, phase: Phase) {
        match phase {
            Phase::Generating => {
                self.spin(format!("Attempt {}: asking {} for a proof...", attempt, self.model));
            }
            Phase::Verifying => {
                self.spin(format!("Attempt {}: checking the proof with {}...", attempt, self.tool));
            }
            _ => {}
        }
    }

    fn on_proof_extracted(&mut self, _attempt: u32, proof: &str, malformed: bool) {
        self.stop();
        if malformed {
            print_warning("The response has an unterminated code block; checking it as-is");
        }
        display_proof(self.language, proof);
    }

    fn on_attempt_finished(&mut self, attempt: &Attempt) {
        self.stop();
        if let Some(verdict) = attempt.verdict {
            print_verdict(verdict);
        }
        if let Some(output) = attempt.output.as_deref().filter(|o| !o.trim().is_empty()) {
            print_text(output.trim_end());
        }
    }

    fn on_run_finished(&mut self, run: &Run) {
        self.stop();
        print_header("Result");
        print_run_status(run);
    }
}
