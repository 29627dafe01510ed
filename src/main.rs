use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lansweep::config::{parse_port_spec, port_preset, ScanConfig, DEFAULT_CONCURRENCY};
use lansweep::net::interface;
use lansweep::report;
use lansweep::{InterfaceProfile, ScanEngine, ScanError, ScanHooks, ScanOutcome, ScanTarget};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lansweep")]
#[command(version)]
#[command(about = "Sweep a local IPv4 network and report every responsive host", long_about = None)]
struct Cli {
    #[arg(help = "Interface name or CIDR network (auto-detected when omitted)")]
    target: Option<String>,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        help = "Concurrent address probes (1-1024)"
    )]
    jobs: usize,

    #[arg(
        short,
        long,
        help = "Ports to probe: a list with ranges (22,80,8000-8010) or a preset \
                (common, web, windows, printers, management)"
    )]
    ports: Option<String>,

    #[arg(short, long, help = "Skip port probing")]
    quick: bool,

    #[arg(long, help = "Leave the OS ARP cache as it is before the sweep")]
    keep_arp_cache: bool,

    #[arg(long, help = "Never contact the remote vendor API")]
    offline: bool,

    #[arg(short = 'y', long, help = "Assume yes for the large-range confirmation")]
    yes: bool,

    #[arg(long, default_value_t = 1, help = "Echo requests per address before giving up")]
    attempts: u32,

    #[arg(long, help = "List usable interfaces and exit")]
    list: bool,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Export the report to FILE (.json or .csv)"
    )]
    export: Option<PathBuf>,
}

/// Interactive hook set: progress bar, confirmation prompt and interface
/// menu on the terminal. Prompts go to stderr so piped stdout stays clean.
struct CliHooks {
    assume_yes: bool,
    bar: ProgressBar,
}

impl CliHooks {
    fn new(assume_yes: bool) -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} addresses")
        {
            bar.set_style(style);
        }
        Self { assume_yes, bar }
    }
}

impl ScanHooks for CliHooks {
    fn confirm_large_range(&self, host_count: usize) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("About to probe {} addresses. Continue? [y/N] ", host_count);
        io::stderr().flush().ok();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn choose_interface(&self, candidates: &[InterfaceProfile]) -> usize {
        eprintln!("Several interfaces qualify:");
        for (i, profile) in candidates.iter().enumerate() {
            eprintln!(
                "  [{}] {} - {} ({})",
                i + 1,
                profile.name,
                profile.cidr(),
                profile.description
            );
        }
        eprint!("Pick one [1]: ");
        io::stderr().flush().ok();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return 0;
        }
        line.trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .unwrap_or(0)
    }

    fn on_progress(&self, done: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(done as u64);
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ScanError> {
    if cli.list {
        return list_interfaces();
    }

    let config = build_config(&cli)?;
    let target = match &cli.target {
        None => ScanTarget::Auto,
        Some(t) if t.contains('/') => ScanTarget::Cidr(t.clone()),
        Some(t) => ScanTarget::Interface(t.clone()),
    };

    let engine = ScanEngine::new(config, target)?;
    let hooks = CliHooks::new(cli.yes);
    let outcome = engine.scan(&hooks).await;
    hooks.bar.finish_and_clear();

    match outcome? {
        ScanOutcome::Declined => println!("Sweep cancelled."),
        ScanOutcome::Completed(scan_report) => {
            println!("{}", report::render_table(&scan_report));
            println!("{}", report::summary_line(&scan_report).bold());
            if let Some(path) = &cli.export {
                match report::export(&scan_report, path) {
                    Ok(()) => println!("Report exported to {}", path.display()),
                    Err(e) => eprintln!("{} export failed: {}", "warning:".yellow().bold(), e),
                }
            }
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ScanConfig, ScanError> {
    let mut config = ScanConfig::default();
    config.concurrency = cli.jobs;
    config.ping_attempts = cli.attempts;
    config.skip_ports = cli.quick;
    config.skip_arp_flush = cli.keep_arp_cache;
    config.offline = cli.offline;
    if let Some(spec) = &cli.ports {
        config.ports = match port_preset(spec) {
            Some(ports) => ports,
            None => parse_port_spec(spec)?,
        };
    }
    config.validate()?;
    Ok(config)
}

fn list_interfaces() -> Result<(), ScanError> {
    let candidates = interface::candidates()?;
    if candidates.is_empty() {
        println!("No usable IPv4 interfaces found.");
        return Ok(());
    }
    println!("Usable network interfaces:");
    for profile in &candidates {
        println!(
            "  {} - {} (address {}, {})",
            profile.name,
            profile.cidr(),
            profile.addr,
            profile.description
        );
    }
    Ok(())
}
