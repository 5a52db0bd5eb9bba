use std::io::{self, IsTerminal, Read, Write};

use clap::Parser;
use colored::*;
use dialoguer::Password;
use kelly::backends::groq::{GroqConfig, GROQ_API_KEY_ENV};
use kelly::persona;
use kelly::providers::openai_compatible::OpenAICompatibleConfig;
use kelly::render::{render_message, render_notice, render_transcript, rule, write_outcome};
use kelly::session::{ChatSession, Credential, SessionConfig, DEFAULT_TIMEOUT_SECONDS};
use kelly::KellyError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use spinners::{Spinner, Spinners};

/// Command line arguments for the Kelly CLI
#[derive(Parser)]
#[clap(
    name = "kelly",
    about = "Chat with Kelly, the AI skeptical poet",
    after_help = "The Groq API key is read from GROQ_API_KEY or asked for interactively."
)]
struct CliArgs {
    /// Ask a single question and exit (stdin is used when it is piped)
    #[arg(index = 1)]
    question: Option<String>,

    /// Model identifier sent with every request
    #[arg(long, default_value = persona::MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = GroqConfig::DEFAULT_BASE_URL)]
    base_url: String,

    /// Seconds to wait for a reply before giving up
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECONDS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_seconds: u64,
}

const HELP: &str = "\
/key      enter or replace the Groq API key
/forget   drop the API key from memory
/history  show the whole conversation
/help     show this help
exit      leave";

/// Asks for the API key without echoing it. An empty answer leaves the
/// session without a credential.
fn prompt_credential(session: &mut ChatSession) -> Result<(), dialoguer::Error> {
    let key = Password::new()
        .with_prompt("Groq API Key")
        .allow_empty_password(true)
        .interact()?;
    match Credential::new(key) {
        Some(credential) => {
            session.set_credential(credential);
            println!("{} API key set for this session.", "✓".bright_green());
        }
        None => println!(
            "{} No API key entered. Use /key when you have one.",
            "!".bright_yellow()
        ),
    }
    Ok(())
}

fn print_banner() {
    println!("{}", persona::TITLE.bright_cyan().bold());
    println!("{}", persona::WELCOME);
    println!();
    println!("{}", persona::ABOUT.bright_black());
    println!("{}", "Type /help for commands, 'exit' to quit".bright_black());
    println!("{}", rule());
}

/// Answers one question from the command line or a pipe.
async fn one_shot(session: &mut ChatSession, question: &str) -> io::Result<()> {
    let outcome = session.submit(question.trim()).await;
    write_outcome(&mut io::stdout().lock(), &mut io::stderr().lock(), &outcome)
}

async fn ask(session: &mut ChatSession, question: &str) -> io::Result<()> {
    let mut spinner = session.has_credential().then(|| {
        Spinner::new(
            Spinners::Dots12,
            persona::SPINNER_TEXT.bright_magenta().to_string(),
        )
    });

    let result = tokio::select! {
        result = session.submit(question) => result,
        _ = tokio::signal::ctrl_c() => Err(KellyError::Cancelled),
    };

    if let Some(sp) = spinner.as_mut() {
        sp.stop();
        print!("\r\x1B[K");
    }

    match result {
        Ok(_) => {
            if let Some(reply) = session.transcript().messages().last() {
                render_message(reply)?;
            }
        }
        Err(e) => render_notice(&e)?,
    }
    println!("{}", rule());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    kelly::init_logging();
    let args = CliArgs::parse();

    let mut session = ChatSession::groq(SessionConfig {
        model: args.model,
        base_url: args.base_url,
        timeout_seconds: args.timeout_seconds,
    });
    if let Some(credential) = std::env::var(GROQ_API_KEY_ENV).ok().and_then(Credential::new) {
        session.set_credential(credential);
    }

    let is_pipe = !io::stdin().is_terminal();
    if is_pipe || args.question.is_some() {
        let question = match args.question {
            Some(q) => q,
            None => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                input
            }
        };
        one_shot(&mut session, &question).await?;
        return Ok(());
    }

    print_banner();
    if !session.has_credential() {
        prompt_credential(&mut session)?;
    }
    println!("{}", persona::INPUT_HINT.bright_black());

    let mut rl = DefaultEditor::new()?;

    loop {
        io::stdout().flush()?;
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match trimmed {
                    "exit" | "quit" => {
                        println!("{}", "Farewell.".bright_cyan());
                        break;
                    }
                    "/key" => prompt_credential(&mut session)?,
                    "/forget" => {
                        session.clear_credential();
                        println!("{} API key dropped.", "✓".bright_green());
                    }
                    "/history" => render_transcript(session.transcript())?,
                    "/help" => println!("{HELP}"),
                    question => ask(&mut session, question).await?,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{}", "Farewell.".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".bright_red(), err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_session_config() {
        let args = CliArgs::try_parse_from(["kelly"]).unwrap();
        let defaults = SessionConfig::default();
        assert_eq!(args.model, defaults.model);
        assert_eq!(args.base_url, defaults.base_url);
        assert_eq!(args.timeout_seconds, defaults.timeout_seconds);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(CliArgs::try_parse_from(["kelly", "--timeout-seconds", "0"]).is_err());
        let args = CliArgs::try_parse_from(["kelly", "--timeout-seconds", "5"]).unwrap();
        assert_eq!(args.timeout_seconds, 5);
    }
}
