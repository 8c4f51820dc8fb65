use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fmt::Display, panic::AssertUnwindSafe, str::FromStr};

use history::SessionRecord;
use pool::{load_pool, PoolError, WordEntry, WordPool};
use sampler::SampleError;
use session::{CompletedSession, SessionConfig, SessionEngine};
use sink::{HttpResultSink, ResultSink, SinkOutcome};
use stats::{Stats, StatsError};
use terminal::TerminalWrapper;

mod cli;
pub mod distractor;
pub mod evaluator;
mod event;
pub mod history;
mod modes;
pub mod pool;
mod random;
pub mod sampler;
pub mod session;
pub mod sink;
pub mod stats;
mod terminal;
mod weighted_list;

pub fn run() -> Result<CorrectIncorrect, VocabrError> {
    let cli = cli::VocabrCli::parse();

    if cli.history {
        print_history();
        return Ok(None);
    }

    let path = cli.path.as_deref().ok_or(ArgError::MissingWordList)?;

    let mut pool = load_pool(path)?;
    let mut stats = match cli.stats.as_deref() {
        Some(path) => Stats::load_from_file(path)?,
        None => Stats::load_from_user_home()?,
    };
    pool.merge_stats(&stats);

    let config = session_config(&cli, &pool)?;

    let sink = cli.sink_url.clone().map(HttpResultSink::new);
    let sink = sink.as_ref().map(|sink| sink as &dyn ResultSink);

    let (completed, outcome) = match cli.seed {
        Some(seed) => run_session(&pool, &config, StdRng::seed_from_u64(seed), sink),
        None => run_session(&pool, &config, StdRng::from_entropy(), sink),
    }?;

    let Some(completed) = completed else {
        //Abandoned mid-session: nothing to score, nothing to persist
        return Ok(None);
    };

    //Everything below is advisory once the summary exists
    if let Some(outcome) = outcome.filter(|outcome| !outcome.is_success()) {
        eprintln!("{outcome}");
    }

    if let Some(history_path) = history::default_path() {
        let record = SessionRecord::new(&completed.summary, &config);
        if let Err(err) = history::append(&history_path, record) {
            eprintln!("History not saved: {err}");
        }
    }

    let mistake_ids = completed
        .summary
        .mistakes
        .iter()
        .map(|mistake| mistake.id)
        .collect::<Vec<_>>();
    stats.record_session(&completed.correct_ids, &mistake_ids);
    let saved = match cli.stats.as_deref() {
        Some(path) => stats.save_to_file(path),
        None => stats.save_to_user_home(),
    };
    if let Err(err) = saved {
        eprintln!("Statistics not saved: {err}");
    }

    Ok(Some((
        completed.summary.correct_count,
        completed.summary.total_questions,
    )))
}

fn run_session<R: Rng>(
    pool: &WordPool,
    config: &SessionConfig,
    rng: R,
    sink: Option<&dyn ResultSink>,
) -> Result<(Option<CompletedSession>, Option<SinkOutcome>), VocabrError> {
    //Sampling failures surface before the terminal is touched; no session
    //state exists if the queue cannot be built
    let engine = SessionEngine::start(pool, config, rng)?;

    std::panic::catch_unwind(AssertUnwindSafe(
        || -> Result<(Option<CompletedSession>, Option<SinkOutcome>), VocabrError> {
            //NOTE: From this point, stdout/stderr will not be usable, hence we
            //need to catch any panics, since they are not loggable. Mapping to
            //VocabrError allows us to gracefully exit and log the panic.
            let term = &mut TerminalWrapper::new().map_err(UiError::IoError)?;
            modes::quiz::run_quiz(term, engine, sink)
        },
    ))
    .map_err(|err| {
        VocabrError::Panic({
            // Attempt to extract the panic message
            let message = if let Some(msg) = err.downcast_ref::<String>() {
                msg.clone()
            } else if let Some(msg) = err.downcast_ref::<&str>() {
                (*msg).to_owned()
            } else {
                "Unknown panic occurred".to_owned()
            };

            // Get the location of the panic
            let location = std::panic::Location::caller();
            let file_name = location.file();
            let line_number = location.line();

            // Create the formatted string
            format!("{}:{}: {}", file_name, line_number, message)
        })
    })?
}

fn session_config(cli: &cli::VocabrCli, pool: &WordPool) -> Result<SessionConfig, ArgError> {
    if cli.count == 0 {
        return Err(ArgError::ZeroCount);
    }

    let ratio = |name: &'static str, value: f64| {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ArgError::RatioOutOfRange(name, value))
        }
    };
    let choice_ratio = ratio("choice-ratio", cli.choice_ratio)?;
    let error_interleave_ratio = ratio("interleave-ratio", cli.interleave_ratio)?;

    let range_start = cli.range_start;
    let range_end = cli.range_end.unwrap_or_else(|| pool.max_id());
    if range_start > range_end {
        return Err(ArgError::InvalidRange(range_start, range_end));
    }

    Ok(SessionConfig {
        range_start,
        range_end,
        requested_count: cli.count,
        choice_ratio,
        error_interleave_ratio,
        direction: cli.direction,
    })
}

fn print_history() {
    let records = history::default_path()
        .map(|path| history::load(&path))
        .unwrap_or_default();

    if records.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }

    println!(
        "{:<17} {:>5} {:>7} {:>7} {:>9} {}",
        "Date", "Score", "Correct", "Time", "Range", "Mix"
    );
    for record in records {
        println!(
            "{:<17} {:>4}% {:>3}/{:<3} {:>6.1}s {:>9} {}",
            record.date.format("%Y-%m-%d %H:%M"),
            record.score,
            record.total_correct,
            record.total_words,
            record.time_spent,
            record.range,
            record.quiz_type,
        );
    }
}

pub type CorrectIncorrect = Option<(usize, usize)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionType {
    MultipleChoice,
    FillIn,
}

///Which field of a word is shown and which is expected back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    SourceToTarget,
    TargetToSource,
}

impl Direction {
    pub fn prompt_field<'a>(&self, word: &'a WordEntry) -> &'a str {
        match self {
            Self::SourceToTarget => &word.headword,
            Self::TargetToSource => &word.translation,
        }
    }

    pub fn answer_field<'a>(&self, word: &'a WordEntry) -> &'a str {
        match self {
            Self::SourceToTarget => &word.translation,
            Self::TargetToSource => &word.headword,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionPolicy {
    Mixed,
    Pinned(Direction),
}

impl FromStr for DirectionPolicy {
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();

        if s == "mixed" {
            Ok(Self::Mixed)
        } else if s == "forward" {
            Ok(Self::Pinned(Direction::SourceToTarget))
        } else if s == "reverse" {
            Ok(Self::Pinned(Direction::TargetToSource))
        } else {
            Err(format!("Direction argument not recognized: {s}"))
        }
    }

    type Err = String;
}

impl Display for DirectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Mixed => "mixed",
            Self::Pinned(Direction::SourceToTarget) => "forward",
            Self::Pinned(Direction::TargetToSource) => "reverse",
        })
    }
}

#[derive(Debug)]
pub enum VocabrError {
    Pool(Box<PoolError>),
    Stats(StatsError),
    Sample(SampleError),
    Arg(ArgError),
    Ui(UiError),
    Panic(String),
}

impl Display for VocabrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pool(err) => f.write_fmt(format_args!("Pool: {err}")),
            Self::Stats(err) => f.write_fmt(format_args!("Stats: {err}")),
            Self::Sample(err) => f.write_fmt(format_args!("Sample: {err}")),
            Self::Arg(err) => f.write_fmt(format_args!("Arg: {err}")),
            Self::Ui(err) => f.write_fmt(format_args!("Ui: {err}")),
            Self::Panic(err) => f.write_fmt(format_args!("Panicked: {err}")),
        }
    }
}

impl From<PoolError> for VocabrError {
    fn from(err: PoolError) -> Self {
        Self::Pool(Box::new(err))
    }
}

impl From<StatsError> for VocabrError {
    fn from(err: StatsError) -> Self {
        Self::Stats(err)
    }
}

impl From<SampleError> for VocabrError {
    fn from(err: SampleError) -> Self {
        Self::Sample(err)
    }
}

impl From<ArgError> for VocabrError {
    fn from(err: ArgError) -> Self {
        Self::Arg(err)
    }
}

impl From<UiError> for VocabrError {
    fn from(err: UiError) -> Self {
        Self::Ui(err)
    }
}

#[derive(Debug)]
pub enum UiError {
    IoError(std::io::Error),
}

impl Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(err) => f.write_fmt(format_args!("IoError: {err}")),
        }
    }
}

impl From<std::io::Error> for UiError {
    fn from(err: std::io::Error) -> Self {
        UiError::IoError(err)
    }
}

#[derive(Debug)]
pub enum ArgError {
    MissingWordList,
    ZeroCount,
    RatioOutOfRange(&'static str, f64),
    InvalidRange(u32, u32),
}

impl Display for ArgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingWordList => f.write_str("No word list path given"),
            Self::ZeroCount => f.write_str("Question count must be at least 1"),
            Self::RatioOutOfRange(name, value) => f.write_fmt(format_args!(
                "--{name} must be between 0 and 1, given: {value}"
            )),
            Self::InvalidRange(start, end) => f.write_fmt(format_args!(
                "Range start {start} is past range end {end}"
            )),
        }
    }
}
