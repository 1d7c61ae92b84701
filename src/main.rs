use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use space_audit_tools::audit::fetch::FetchPolicy;
use space_audit_tools::audit::normalize::UserFilter;
use space_audit_tools::commands::login_report::{
    self, exit_code, should_export_csv, ReportOptions, DEFAULT_END, DEFAULT_START, DEFAULT_TZ,
};
use space_audit_tools::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "space-audit")]
#[command(about = "Daily unique TM1 users and per-user login dates from the SPACE audit log", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Also write daily_unique_users.csv and user_login_dates.csv (or set EXPORT_CSV=1)
    #[arg(long)]
    csv: bool,

    /// Count system accounts (by default "system" is excluded)
    #[arg(long)]
    include_system: bool,

    /// Additional user name to exclude (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Range start in RFC3339 UTC format
    #[arg(long, default_value = DEFAULT_START)]
    start: String,

    /// Range end in RFC3339 UTC format
    #[arg(long, default_value = DEFAULT_END)]
    end: String,

    /// IANA timezone the server converts timestamps into
    #[arg(long, default_value = DEFAULT_TZ)]
    tz: String,

    /// Records requested per page
    #[arg(long, default_value = "100")]
    page_size: usize,

    /// Attempts per page before giving up
    #[arg(long, default_value = "3")]
    max_attempts: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Directory for CSV output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// API endpoint (default: $SPACE_API_URL or the SPACE audit-log endpoint)
    #[arg(long)]
    api_url: Option<String>,

    /// API token (default: $SPACE_TOKEN or $SPACE_TOKEN_FILE)
    #[arg(long)]
    token: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts
    GenerateCompletion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        let filter = if self.include_system {
            UserFilter::empty()
        } else {
            UserFilter::default()
        }
        .with_excluded(&self.exclude);

        ReportOptions {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            tz: self.tz.clone(),
            policy: FetchPolicy {
                page_size: self.page_size,
                max_attempts: self.max_attempts,
                ..FetchPolicy::default()
            },
            timeout: Duration::from_secs(self.timeout),
            filter,
            export_csv: should_export_csv(self.csv),
            output_dir: self.output_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::GenerateCompletion { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "space-audit", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    init_logging(cli.verbose);

    match login_report::run(&cli.report_options()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
