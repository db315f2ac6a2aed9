//! Command line definition and the typed run configuration

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use conftrack_catalog::DEFAULT_CATALOG_PATH;
use conftrack_sources::ccfddl::{
    parse_categories, CcfOptions, DEFAULT_CATEGORIES, DEFAULT_YEAR_FROM, DEFAULT_YEAR_TO,
};
use conftrack_sources::edas::DEFAULT_WATCHLIST_PATH;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CATEGORY_LIST: &str = "DS,NW,SC,SE,DB,CT,CG,AI,HI,MX";
const DEFAULT_YEAR_FROM_ARG: &str = "2026";
const DEFAULT_YEAR_TO_ARG: &str = "2028";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Baseline catalog
    pub input: PathBuf,

    /// Output catalog
    pub output: PathBuf,

    /// Fetch CSA Lab
    pub csalab: bool,

    /// Fetch EasyChair
    pub easychair: bool,

    /// Fetch ccf-deadlines
    pub ccfddl: bool,

    /// ccf-deadlines category codes
    pub ccf_categories: Vec<String>,

    /// First ccf-deadlines year
    pub year_from: i32,

    /// Last ccf-deadlines year
    pub year_to: i32,

    /// EDAS watchlist file
    pub edas_watchlist: PathBuf,

    /// GitHub API token
    pub github_token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_CATALOG_PATH),
            output: PathBuf::from(DEFAULT_CATALOG_PATH),
            csalab: true,
            easychair: true,
            ccfddl: true,
            ccf_categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
            year_from: DEFAULT_YEAR_FROM,
            year_to: DEFAULT_YEAR_TO,
            edas_watchlist: PathBuf::from(DEFAULT_WATCHLIST_PATH),
            github_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RunConfig {
    /// Configuration with every network source switched off
    #[must_use]
    pub fn offline(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            csalab: false,
            easychair: false,
            ccfddl: false,
            ..Self::default()
        }
    }

    /// ccf-deadlines adapter settings
    #[must_use]
    pub fn ccf_options(&self) -> CcfOptions {
        CcfOptions {
            categories: self.ccf_categories.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
            token: self.github_token.clone(),
            timeout: self.timeout,
        }
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<PathBuf>(id).cloned().unwrap_or_default();
        let year = |id: &str| matches.get_one::<i32>(id).copied().unwrap_or_default();

        Self {
            input: path("in"),
            output: path("out"),
            csalab: !matches.get_flag("disable-csalab"),
            easychair: !matches.get_flag("disable-easychair"),
            ccfddl: !matches.get_flag("disable-ccfddl"),
            ccf_categories: matches
                .get_one::<String>("ccf-categories")
                .map(|list| parse_categories(list))
                .unwrap_or_default(),
            year_from: year("year-from"),
            year_to: year("year-to"),
            edas_watchlist: path("edas-watchlist"),
            github_token: matches
                .get_one::<String>("github-token")
                .filter(|token| !token.trim().is_empty())
                .cloned(),
            timeout: Duration::from_secs(
                matches
                    .get_one::<u64>("timeout")
                    .copied()
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

/// The `conftrack` command
#[must_use]
pub fn command() -> Command {
    Command::new("conftrack")
        .version(conftrack_catalog::VERSION)
        .about("Fetch conference feeds and merge them into the catalog")
        .arg(
            Arg::new("in")
                .long("in")
                .value_name("PATH")
                .default_value(DEFAULT_CATALOG_PATH)
                .value_parser(value_parser!(PathBuf))
                .help("Baseline catalog"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("PATH")
                .default_value(DEFAULT_CATALOG_PATH)
                .value_parser(value_parser!(PathBuf))
                .help("Output catalog"),
        )
        .arg(
            Arg::new("disable-csalab")
                .long("disable-csalab")
                .action(ArgAction::SetTrue)
                .help("Skip CSA Lab conf-track"),
        )
        .arg(
            Arg::new("disable-easychair")
                .long("disable-easychair")
                .action(ArgAction::SetTrue)
                .help("Skip the EasyChair CFP list"),
        )
        .arg(
            Arg::new("disable-ccfddl")
                .long("disable-ccfddl")
                .action(ArgAction::SetTrue)
                .help("Skip ccf-deadlines"),
        )
        .arg(
            Arg::new("ccf-categories")
                .long("ccf-categories")
                .value_name("LIST")
                .default_value(DEFAULT_CATEGORY_LIST)
                .value_parser(value_parser!(String))
                .help("Comma-separated ccf-deadlines category codes"),
        )
        .arg(
            Arg::new("year-from")
                .long("year-from")
                .value_name("N")
                .default_value(DEFAULT_YEAR_FROM_ARG)
                .value_parser(value_parser!(i32))
                .help("First ccf-deadlines year"),
        )
        .arg(
            Arg::new("year-to")
                .long("year-to")
                .value_name("N")
                .default_value(DEFAULT_YEAR_TO_ARG)
                .value_parser(value_parser!(i32))
                .help("Last ccf-deadlines year"),
        )
        .arg(
            Arg::new("edas-watchlist")
                .long("edas-watchlist")
                .value_name("PATH")
                .default_value(DEFAULT_WATCHLIST_PATH)
                .value_parser(value_parser!(PathBuf))
                .help("EDAS watchlist YAML"),
        )
        .arg(
            Arg::new("github-token")
                .long("github-token")
                .value_name("TOKEN")
                .env("GITHUB_TOKEN")
                .value_parser(value_parser!(String))
                .hide_env_values(true)
                .help("GitHub API token for ccf-deadlines"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .default_value("30")
                .value_parser(value_parser!(u64).range(1..))
                .help("Per-request timeout in seconds"),
        )
}

/// Parse command line arguments into a [`RunConfig`]
///
/// # Errors
///
/// Returns a clap error for unknown flags, bad values, or a year range whose
/// start is after its end.
pub fn parse_args<I, T>(args: I) -> Result<RunConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = command();
    let matches = cmd.try_get_matches_from_mut(args)?;
    let config = RunConfig::from_matches(&matches);

    if config.year_from > config.year_to {
        return Err(cmd.error(
            ErrorKind::ValueValidation,
            format!(
                "--year-from ({}) must not be after --year-to ({})",
                config.year_from, config.year_to
            ),
        ));
    }
    Ok(config)
}
