//! Application entry point — `autocorrect` terminal front end.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run) and apply
//!    command-line overrides.
//! 3. Read the input text (file, `--text` or stdin).
//! 4. Build the preserve-term set (custom terms, dictionaries, glossary).
//! 5. Build the provider ([`ApiCorrector`]) and the [`CorrectionRunner`].
//! 6. Either run a batch correction, or show suggestions and walk the user
//!    through accepting/rejecting each edit.
//! 7. Write the result to `--output` or stdout.

use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use autocorrect::{
    capability::Capability,
    config::{AppConfig, AppPaths, DomainMode, StyleMode},
    document::{self, DocumentFormat},
    llm::{ApiCorrector, CorrectionRequest, Dictionary, LlmCorrector, PromptBuilder, Suggestion},
    session::{prepare_text, CorrectionRunner, Review, Session},
    text::{Aligner, HighlightStyle, Theme},
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "autocorrect",
    version,
    about = "Grammar and style suggestions from an LLM, reviewed edit by edit"
)]
struct Args {
    /// Input document (.txt or .docx); reads stdin when omitted
    input: Option<PathBuf>,

    /// Text to correct, instead of a file
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// Settings file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language of the input, or "Auto"
    #[arg(short, long)]
    language: Option<String>,

    #[arg(long, value_enum)]
    domain: Option<DomainMode>,

    #[arg(long, value_enum)]
    style: Option<StyleMode>,

    /// Built-in dictionary to respect (repeatable)
    #[arg(short, long = "dictionary", value_enum)]
    dictionaries: Vec<Dictionary>,

    /// Comma-separated terms to preserve exactly
    #[arg(long)]
    terms: Option<String>,

    /// Newline-delimited glossary of terms to preserve
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Number of suggestions to request (1-3)
    #[arg(short = 'n', long)]
    suggestions: Option<u8>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long)]
    temperature: Option<f32>,

    /// Model to use (repeatable, tried in order)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// OpenAI-compatible API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Do not ask for explanations
    #[arg(long)]
    no_explain: bool,

    /// Do not ask for an English translation
    #[arg(long)]
    no_translate: bool,

    /// Correct every blank-line separated segment and write the document
    #[arg(short, long)]
    batch: bool,

    /// Accept the first suggestion as is, without prompting
    #[arg(short, long)]
    yes: bool,

    /// Write the result here (.txt or .docx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format, overriding the extension of --output
    #[arg(long, value_enum)]
    format: Option<DocumentFormat>,

    #[arg(long, value_enum)]
    highlight: Option<HighlightStyle>,

    /// Colour theme for --highlight html
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    #[arg(long, value_enum)]
    aligner: Option<Aligner>,

    /// Print the prompt that would be sent and exit
    #[arg(long)]
    show_prompt: bool,

    /// Ask the provider for the input's language and exit
    #[arg(long)]
    detect_language: bool,

    /// List optional capabilities of this build and exit
    #[arg(long)]
    capabilities: bool,

    /// Save the effective settings to the settings file and exit
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn apply_to(&self, config: &mut AppConfig) {
        let prefs = &mut config.correction;
        if let Some(language) = &self.language {
            prefs.language = language.clone();
        }
        if let Some(domain) = self.domain {
            prefs.domain_mode = domain;
        }
        if let Some(style) = self.style {
            prefs.style = style;
        }
        if !self.dictionaries.is_empty() {
            prefs.dictionaries = self.dictionaries.clone();
        }
        if let Some(terms) = &self.terms {
            prefs.custom_terms = terms.clone();
        }
        if let Some(glossary) = &self.glossary {
            prefs.glossary_file = Some(glossary.clone());
        }
        if let Some(n) = self.suggestions {
            prefs.suggestions = n;
        }
        if let Some(t) = self.temperature {
            prefs.temperature = t;
        }
        if self.no_explain {
            prefs.explain = false;
        }
        if self.no_translate {
            prefs.translate = false;
        }

        if !self.models.is_empty() {
            config.llm.models = self.models.clone();
        }
        if let Some(url) = &self.base_url {
            config.llm.base_url = url.clone();
        }

        if let Some(style) = self.highlight {
            config.display.highlight = style;
        }
        if let Some(theme) = self.theme {
            config.display.theme = theme;
        }
        if let Some(aligner) = self.aligner {
            config.display.aligner = aligner;
        }
    }
}

// ---------------------------------------------------------------------------
// Input / prompting helpers
// ---------------------------------------------------------------------------

fn read_input(args: &Args) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    match &args.input {
        Some(path) if path.as_os_str() != "-" => document::import(path)
            .with_context(|| format!("could not read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("could not read stdin")?;
            Ok(buf)
        }
    }
}

fn load_glossary(config: &AppConfig) -> Result<Vec<String>> {
    match config.glossary_path() {
        Some(path) => document::read_glossary(&path)
            .with_context(|| format!("could not read glossary {}", path.display())),
        None => Ok(Vec::new()),
    }
}

/// Ask on stderr, read one line from the terminal.  `None` on EOF or when
/// stdin is not interactive.
fn ask(question: &str) -> Option<String> {
    if !io::stdin().is_terminal() {
        return None;
    }
    eprint!("{question} ");
    io::stderr().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_lowercase()),
    }
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn print_suggestion(index: usize, suggestion: &Suggestion, review: &Review<'_>, config: &AppConfig) {
    let display = &config.display;

    eprintln!();
    eprintln!(
        "{} {}",
        format!("Suggestion {}", index + 1).bold(),
        format!("(confidence {}%)", suggestion.confidence_percent()).dimmed()
    );

    let highlighted = review.highlighted(display.highlight);
    if display.show_diff {
        eprintln!("  {} {}", "Original: ".dimmed(), review.script().original_tokens().join(" "));
        eprintln!("  {} {}", "Corrected:".dimmed(), highlighted);
    } else {
        eprintln!("  {highlighted}");
    }

    if display.show_explanations && !suggestion.explanations.is_empty() {
        eprintln!("  {}", "Why these corrections?".italic());
        for ex in &suggestion.explanations {
            eprintln!("    - `{}` → `{}`: {}", ex.before, ex.after, ex.reason);
        }
    }

    eprintln!("  {}", format!("Detected language: {}", suggestion.language).dimmed());
    if display.show_translation {
        if let Some(translation) = &suggestion.translation {
            eprintln!("  {} {translation}", "English:".green());
        }
    }
}

/// Walk through every edit of `review`, asking for a decision.
fn review_edits(review: &mut Review<'_>) {
    let edits = review.edits();
    if edits.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("{}", "Accept or reject each change [Y/n, a = accept rest, r = reject rest]".bold());

    for (i, edit) in edits.iter().enumerate() {
        let before = edit.before_text();
        let after = edit.after_text();
        let question = format!(
            "  [{}/{}] {} {} {} ?",
            i + 1,
            edits.len(),
            if before.is_empty() { "∅".to_string() } else { before.red().to_string() },
            "→".dimmed(),
            if after.is_empty() { "∅".to_string() } else { after.green().to_string() },
        );
        match ask(&question).as_deref() {
            Some("n") | Some("no") => {
                review.set(i, false);
            }
            Some("a") => {
                for j in i..edits.len() {
                    review.set(j, true);
                }
                break;
            }
            Some("r") => {
                for j in i..edits.len() {
                    review.set(j, false);
                }
                break;
            }
            _ => {
                review.set(i, true);
            }
        }
    }
}

fn print_history(session: &Session) {
    let recent = session.recent_history();
    if recent.is_empty() {
        eprintln!("No history yet.");
        return;
    }
    for entry in recent {
        eprintln!("{}", format!("Version {}:", entry.version).bold());
        eprintln!("  {}", entry.text);
    }
}

fn write_result(text: &str, args: &Args) -> Result<()> {
    match &args.output {
        Some(path) => document::write_export(path, text, args.format)
            .with_context(|| format!("could not write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

async fn run_batch(runner: &CorrectionRunner, session: &Session, config: &AppConfig, args: &Args) -> Result<()> {
    let outcome = runner
        .correct_batch(session.text(), &config.correction, session.preserve_terms())
        .await?;

    let kept = outcome.fallback_count();
    if kept > 0 {
        log::warn!("{kept} of {} segment(s) kept unchanged", outcome.segments.len());
    }
    write_result(&outcome.document(), args)
}

async fn run_interactive(
    runner: &CorrectionRunner,
    session: &mut Session,
    config: &AppConfig,
    args: &Args,
) -> Result<()> {
    if let Some(css) = config.display.stylesheet() {
        eprint!("{css}");
    }

    loop {
        let suggestions = runner
            .run_analysis(session, &config.correction)
            .await?
            .to_vec();

        if suggestions.is_empty() {
            eprintln!("{}", "No suggestions; keeping the text as it is.".yellow());
            break;
        }

        for (i, suggestion) in suggestions.iter().enumerate() {
            if let Some(review) = session.review_with(i, config.display.aligner) {
                print_suggestion(i, suggestion, &review, config);
            }
        }

        let choice = if args.yes || suggestions.len() == 1 {
            0
        } else {
            let answer = ask(&format!("Use which suggestion? [1-{}, q = quit]", suggestions.len()));
            match answer.as_deref() {
                Some("q") => break,
                Some(n) => n
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=suggestions.len()).contains(n))
                    .map_or(0, |n| n - 1),
                None => 0,
            }
        };

        let Some(mut review) = session.review_with(choice, config.display.aligner) else {
            break;
        };
        if !args.yes {
            review_edits(&mut review);
        }
        let revised = review.merged();
        let accepted = review.accepted_count();
        let total = review.len();

        let version = session.apply(revised);
        eprintln!(
            "{}",
            format!("Applied {accepted} of {total} change(s) as version {version}.").green()
        );

        if args.yes {
            break;
        }
        match ask("Another pass? [y/N, h = history]").as_deref() {
            Some("y") => continue,
            Some("h") => {
                print_history(session);
                let answer = ask("Restore which version? [number, Enter = keep current]");
                if let Some(version) = answer.and_then(|a| a.parse::<usize>().ok()) {
                    if !session.restore(version) {
                        eprintln!("No version {version}.");
                    }
                }
                break;
            }
            _ => break,
        }
    }

    write_result(session.text(), args)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.capabilities {
        for capability in Capability::ALL {
            match capability.unavailable_reason() {
                None => println!("{:<24} available", capability.label()),
                Some(reason) => println!("{:<24} unavailable ({reason})", capability.label()),
            }
        }
        return Ok(());
    }

    // 2. Configuration
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("could not load {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    args.apply_to(&mut config);

    if args.save_config {
        let path = args.config.clone().unwrap_or_else(|| AppPaths::new().settings_file);
        config.save_to(&path)?;
        log::info!("Settings saved to {}", path.display());
        return Ok(());
    }

    let config = config.with_resolved_api_key();

    // 3. Input
    let input = read_input(&args)?;
    if input.trim().is_empty() {
        bail!("nothing to correct: the input is empty");
    }

    // 4. Preserve terms
    let mut session = Session::new(input);
    let glossary = load_glossary(&config)?;
    session.rebuild_terms(&config.correction, &glossary);

    if args.show_prompt {
        let (prepared, _) = prepare_text(session.text());
        let request = CorrectionRequest::from_config(prepared, &config.correction, session.preserve_terms());
        println!("{}", PromptBuilder::new(&request).build());
        return Ok(());
    }

    log::info!("Preferences: {}", config.correction.summary());

    // 5. Provider
    let llm: Arc<dyn LlmCorrector> = Arc::new(ApiCorrector::from_config(&config.llm));
    let runner = CorrectionRunner::new(llm);
    log::info!("Models: {}", config.llm.models.join(", "));

    if args.detect_language {
        println!("{}", runner.detect_language(session.text()).await?);
        return Ok(());
    }

    // 6–7. Correct and write
    if args.batch {
        run_batch(&runner, &session, &config, &args).await
    } else {
        run_interactive(&runner, &mut session, &config, &args).await
    }
}
