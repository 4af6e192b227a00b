use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wordle_game_engine::*;

/// Host for the daily word game. Runs one game operation per invocation and prints the result as
/// JSON, keeping attempts and guesses in a state file between runs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a file that contains the answers, with one answer on each line. Word ids are
    /// assigned from 1 in file order. Required by every command except `healthcheck`.
    #[arg(short = 'f', long, env = "WORDLE_WORDS_FILE")]
    words_file: Option<PathBuf>,

    /// Path to the JSON file that holds attempts and guesses. Created if it doesn't exist.
    #[arg(
        short = 's',
        long,
        env = "WORDLE_STATE_FILE",
        default_value = "wordle-state.json"
    )]
    state_file: PathBuf,

    /// The environment reported by the health check.
    #[arg(long, value_enum, default_value_t = Environment::Development)]
    env: Environment,

    /// Once this many guesses are recorded, the next guess is the last one accepted.
    #[arg(long, default_value_t = DEFAULT_GUESS_LIMIT)]
    guess_limit: usize,

    /// Log filter directives, e.g. `info` or `wordle_game_engine=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current board for a word.
    Show { word_id: i64 },
    /// Submit a guess for a word.
    Guess {
        word_id: i64,
        submission: String,
        /// Time of the submission in epoch milliseconds. Defaults to now.
        #[arg(long)]
        submission_time: Option<i64>,
    },
    /// Close a word's attempt without solving it.
    Expire { word_id: i64 },
    /// Play a word interactively, one guess per line.
    Play { word_id: i64 },
    /// Report that the service is available.
    Healthcheck,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Envelope<'a> {
    Data(&'a Board),
    Error(ErrorBody<'a>),
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorBody<'a> {
    Message(String),
    Fields(&'a ValidationErrors),
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    system_info: SystemInfo,
}

#[derive(Serialize)]
struct SystemInfo {
    environment: Environment,
    version: &'static str,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).context("invalid log filter")?)
        .with_writer(io::stderr)
        .init();

    if let Command::Healthcheck = args.command {
        print_json(&Health {
            status: "available",
            system_info: SystemInfo {
                environment: args.env,
                version: env!("CARGO_PKG_VERSION"),
            },
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let words_file = args
        .words_file
        .as_deref()
        .context("a words file is required; pass --words-file or set WORDLE_WORDS_FILE")?;
    let store = Arc::new(open_store(words_file, &args.state_file)?);
    info!(
        words = store.num_words()?,
        environment = ?args.env,
        "store loaded"
    );
    let config = GameConfig::default().with_guess_limit(args.guess_limit);
    let session = GameSession::new(Arc::clone(&store), config);

    let exit_code = match &args.command {
        Command::Show { word_id } => respond(&args.command, session.fetch_state(*word_id))?,
        Command::Guess {
            word_id,
            submission,
            submission_time,
        } => {
            let request = GuessRequest {
                submission: submission.clone(),
                submission_time: Some(submission_time.unwrap_or_else(now_millis)),
            };
            respond(&args.command, session.submit_guess(*word_id, &request))?
        }
        Command::Expire { word_id } => {
            respond(&args.command, session.expire_attempt(*word_id))?
        }
        Command::Play { word_id } => play_interactive_game(&session, *word_id)?,
        Command::Healthcheck => ExitCode::SUCCESS,
    };

    save_store(&store, &args.state_file)?;
    Ok(exit_code)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Loads answers from the words file and any attempts and guesses from the state file.
fn open_store(words_file: &Path, state_file: &Path) -> anyhow::Result<MemoryStore> {
    let words_reader = io::BufReader::new(
        File::open(words_file)
            .with_context(|| format!("failed to open {}", words_file.display()))?,
    );
    let words = MemoryStore::from_reader(words_reader)?.snapshot()?.words;

    let mut snapshot = if state_file.exists() {
        let contents = fs::read_to_string(state_file)
            .with_context(|| format!("failed to read {}", state_file.display()))?;
        serde_json::from_str::<StoreSnapshot>(&contents)
            .with_context(|| format!("{} is not a valid state file", state_file.display()))?
    } else {
        StoreSnapshot::default()
    };
    snapshot.words = words;
    Ok(MemoryStore::from_snapshot(snapshot)?)
}

fn save_store(store: &MemoryStore, state_file: &Path) -> anyhow::Result<()> {
    let mut snapshot = store.snapshot()?;
    snapshot.words.clear();
    let contents = serde_json::to_string_pretty(&snapshot)?;
    fs::write(state_file, contents)
        .with_context(|| format!("failed to write {}", state_file.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Prints the board or the error envelope for a finished operation.
fn respond(command: &Command, result: Result<Board, GameError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(board) => {
            print_json(&Envelope::Data(&board))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(GameError::ValidationFailed(errors)) => {
            print_json(&Envelope::Error(ErrorBody::Fields(&errors)))?;
            Ok(ExitCode::from(2))
        }
        Err(err) => {
            if let GameError::Infrastructure(source) = &err {
                error!(?command, error = %source, "operation failed");
            }
            print_json(&Envelope::Error(ErrorBody::Message(err.to_string())))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Renders a hint as the guess followed by a marker per letter: '.' = not in the word, 'y' = in
/// the word but elsewhere, 'g' = in the right location.
fn render_hint(hint: &Hint) -> String {
    let letters: String = hint
        .letters()
        .iter()
        .map(|lh| lh.letter.to_ascii_uppercase())
        .collect();
    let markers: String = hint
        .codes()
        .iter()
        .map(|code| match code {
            HintCode::Absent => '.',
            HintCode::Present => 'y',
            HintCode::Exact => 'g',
        })
        .collect();
    format!("{letters}  {markers}")
}

fn print_board(board: &Board) {
    for hint in board.hints.iter() {
        println!("\t{}", render_hint(hint));
    }
}

fn play_interactive_game<S: GameStore>(
    session: &GameSession<S>,
    word_id: i64,
) -> anyhow::Result<ExitCode> {
    let mut board = match session.fetch_state(word_id) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };
    print_board(&board);

    println!(
        "Guess the {}-letter word. For each guess you'll see:\n\n\
           * '.' = this letter is not in the word\n\
           * 'y' = this letter is in the word, but not in this location\n\
           * 'g' = this letter is in the word and in the right location.\n",
        WORD_LENGTH
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while board.is_open() {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let request = GuessRequest {
            submission: line?.trim().to_string(),
            submission_time: Some(now_millis()),
        };
        match session.submit_guess(word_id, &request) {
            Ok(next) => {
                board = next;
                if let Some(hint) = board.hints.last() {
                    println!("\t{}", render_hint(hint));
                }
            }
            Err(GameError::ValidationFailed(errors)) => println!("{}. Try again.", errors),
            Err(err) => {
                eprintln!("Error: {}", err);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    match board.attempt.state() {
        AttemptState::ClosedSolved => {
            println!("Solved it! It took you {} guesses.", board.guesses.len())
        }
        AttemptState::ClosedUnsolved => println!("Out of guesses :("),
        AttemptState::Open => println!("Come back to finish this one later."),
    }
    Ok(ExitCode::SUCCESS)
}
