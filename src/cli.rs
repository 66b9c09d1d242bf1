//! Command-line argument parsing for askframe.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Ask natural-language questions about a spreadsheet or CSV file.
#[derive(Parser, Debug)]
#[command(name = "askframe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dataset file (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(value_name = "DATASET", conflicts_with = "sample")]
    pub dataset: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Worksheet to read from a workbook (first sheet by default)
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Ask one question, print the answer and exit
    #[arg(short = 'q', long, value_name = "QUESTION")]
    pub question: Option<String>,

    /// LLM provider: gemini or mock
    #[arg(long, value_name = "PROVIDER")]
    pub llm: Option<String>,

    /// Upper bound on one model call, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Rows shown in the preview after loading
    #[arg(long, value_name = "N")]
    pub preview_rows: Option<usize>,

    /// Use the built-in gold-loan sample dataset
    #[arg(long)]
    pub sample: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Overrides config values with the flags that were given.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.dataset {
            config.dataset.path = Some(path.clone());
        }
        if let Some(sheet) = &self.sheet {
            config.dataset.sheet = Some(sheet.clone());
        }
        if let Some(rows) = self.preview_rows {
            config.dataset.preview_rows = rows;
        }
        if let Some(provider) = &self.llm {
            config.llm.provider = provider.clone();
        }
        if let Some(timeout) = self.timeout {
            config.llm.timeout_secs = timeout;
        }
    }

    /// Returns true when running a single question without the TUI.
    pub fn is_one_shot(&self) -> bool {
        self.question.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_parse_dataset_path() {
        let cli = parse_args(&["askframe", "GoldLoan.xlsx", "--sheet", "Loans"]);
        assert_eq!(cli.dataset, Some(PathBuf::from("GoldLoan.xlsx")));
        assert_eq!(cli.sheet.as_deref(), Some("Loans"));
        assert!(!cli.is_one_shot());
    }

    #[test]
    fn test_parse_one_shot_question() {
        let cli = parse_args(&["askframe", "--sample", "-q", "How many loans are there?"]);
        assert!(cli.sample);
        assert!(cli.is_one_shot());
        assert_eq!(cli.question.as_deref(), Some("How many loans are there?"));
    }

    #[test]
    fn test_sample_conflicts_with_path() {
        assert!(Cli::try_parse_from(["askframe", "data.csv", "--sample"]).is_err());
    }

    #[test]
    fn test_parse_config_path() {
        let cli = parse_args(&["askframe", "--config", "/path/to/config.toml"]);
        assert_eq!(cli.config_path(), PathBuf::from("/path/to/config.toml"));

        let cli = parse_args(&["askframe"]);
        assert_eq!(cli.config_path(), Config::default_path());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = Config::default();
        config.dataset.path = Some(PathBuf::from("from-file.csv"));
        config.llm.timeout_secs = 10;

        let cli = parse_args(&[
            "askframe",
            "cli.csv",
            "--llm",
            "mock",
            "--timeout",
            "3",
            "--preview-rows",
            "2",
        ]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.dataset.path, Some(PathBuf::from("cli.csv")));
        assert_eq!(config.llm.provider, "mock");
        assert_eq!(config.llm.timeout_secs, 3);
        assert_eq!(config.dataset.preview_rows, 2);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.dataset.sheet = Some("Sheet2".to_string());
        parse_args(&["askframe"]).apply_overrides(&mut config);
        assert_eq!(config.dataset.sheet.as_deref(), Some("Sheet2"));
        assert_eq!(config.llm.provider, "gemini");
    }
}
