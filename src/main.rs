use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::Shell;
use ddiff::config::DEFAULT_CONTEXT;
use ddiff::{Config, Ddiff};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ddiff", version)]
#[command(about = "Show unified diffs between two files or two directories")]
struct Cli {
    /// First file or directory
    #[arg(required_unless_present_any = ["completions", "man"])]
    path1: Option<PathBuf>,

    /// Second file or directory
    #[arg(required_unless_present_any = ["completions", "man"])]
    path2: Option<PathBuf>,

    /// Show colored output
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        default_missing_value = "true",
        num_args = 0..=1,
        require_equals = true,
        action = ArgAction::Set
    )]
    color: bool,

    /// Number of context lines
    #[arg(short = 'U', long, value_name = "N", default_value_t = DEFAULT_CONTEXT)]
    context: usize,

    /// Compare directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Report binary files that differ
    #[arg(long)]
    binary: bool,

    /// Ignore changes in the amount of whitespace
    #[arg(short = 'b', long)]
    ignore_space: bool,

    /// Show diff statistics
    #[arg(long)]
    stats: bool,

    /// Print a completion script for SHELL and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    completions: Option<Shell>,

    /// Print a man page and exit
    #[arg(long, hide = true)]
    man: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            context: self.context,
            color: self.color,
            recursive: self.recursive,
            show_binary: self.binary,
            ignore_space: self.ignore_space,
            show_stats: self.stats,
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "ddiff", &mut io::stdout());
        return Ok(());
    }
    if cli.man {
        clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        return Ok(());
    }

    let (Some(path1), Some(path2)) = (&cli.path1, &cli.path2) else {
        Cli::command().print_help()?;
        return Err("two paths are required".into());
    };

    let config = cli.config();
    colored::control::set_override(config.color);

    let mut ddiff = Ddiff::new(config, io::stdout().lock(), io::stderr());
    ddiff.run(path1, path2)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
