use clap::Parser;

use crate::DirectionPolicy;

#[derive(Parser, Debug)]
#[command(name = "vocabr", version = env!("CARGO_PKG_VERSION"))]
pub struct VocabrCli {
    #[arg(short = 'c', long = "count", value_name = "QUESTION_COUNT", default_value_t = 10, help = "Number of questions to ask.", long_help = COUNT_HELP)]
    pub count: usize,
    #[arg(short = 's', long = "range-start", value_name = "ID", default_value_t = 1, help = "First word id eligible for this session.")]
    pub range_start: u32,
    #[arg(short = 'e', long = "range-end", value_name = "ID", help = "Last word id eligible for this session.", long_help = RANGE_END_HELP)]
    pub range_end: Option<u32>,
    #[arg(long = "choice-ratio", value_name = "RATIO", default_value_t = 0.7, help = "Fraction of questions asked as multiple choice.", long_help = CHOICE_RATIO_HELP)]
    pub choice_ratio: f64,
    #[arg(long = "interleave-ratio", value_name = "RATIO", default_value_t = 0.0, help = "Fraction of questions drawn from previously missed words.", long_help = INTERLEAVE_HELP)]
    pub interleave_ratio: f64,
    #[arg(short = 'd', long = "direction", value_name = "DIRECTION", default_value_t = DirectionPolicy::Mixed, help = "Question direction.", long_help = DIRECTION_HELP)]
    pub direction: DirectionPolicy,
    #[arg(long = "stats", value_name = "PATH", help = "Mistake statistics file.", long_help = STATS_HELP)]
    pub stats: Option<String>,
    #[arg(long = "sink-url", value_name = "URL", help = "Web endpoint that receives session results.", long_help = SINK_HELP)]
    pub sink_url: Option<String>,
    #[arg(long = "seed", value_name = "SEED", help = "Seed the random source for a reproducible session.")]
    pub seed: Option<u64>,
    #[arg(long = "history", default_value_t = false, help = "Print recent session history and exit.")]
    pub history: bool,
    #[arg(help = "Word list file (.csv or .json)", long_help = PATH_HELP)]
    pub path: Option<String>,
}

const COUNT_HELP: &str = r#"Number of questions to ask. Clamped to the number of words in the selected id range."#;
const RANGE_END_HELP: &str = r#"Last word id eligible for this session. Defaults to the highest id in the word list."#;
const CHOICE_RATIO_HELP: &str = r#"Fraction of questions asked as multiple choice, between 0 and 1.
Each question draws its type independently, so short sessions may deviate from the nominal split."#;
const INTERLEAVE_HELP: &str = r#"Fraction of questions drawn from previously missed words, between 0 and 1.
Zero selects mistake-weighted sampling over the whole range instead."#;
const DIRECTION_HELP: &str = r#"Question direction. Possible values:
    mixed   - Each question picks a direction at random
    forward - Always show the headword, ask for the translation
    reverse - Always show the translation, ask for the headword"#;
const STATS_HELP: &str = r#"Mistake statistics file. Defaults to ~/.config/vocabr/stats.json; a missing file means no history yet."#;
const SINK_HELP: &str = r#"Web endpoint that receives session results as JSON. Without it, results are only kept locally."#;
const PATH_HELP: &str = r#"Path of the word list to quiz from. Spreadsheet exports (.csv, comma or semicolon delimited) and JSON arrays are accepted."#;

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use crate::cli;

    #[test]
    fn verify_cli() {
        cli::VocabrCli::command().debug_assert();
    }
}
