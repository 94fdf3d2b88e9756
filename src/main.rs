use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use emu86::catalog::{write_sample, Form, CODE_FIELD};
use emu86::output::{self, message, MsgColor};
use emu86::smoke::{InvalidSource, Scenario, WebDriver};
use emu86::{env, error, export, Catalog, Topic};

/// Sample programs and page checks for the Emu86 assembly emulator.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the sample program for a topic in a flavor
    Sample {
        /// `area`, `data`, `power` or `addTwo`
        topic: String,
        /// `intel` or `mips_asm`; anything else prints nothing
        flavor: String,
        /// Show the code field assignment instead of raw text
        #[arg(short, long)]
        field: bool,
        /// Sample tree to read instead of the bundled programs
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// List every available sample program
    List {
        /// Sample tree to read instead of the bundled programs
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Render the page script which loads sample programs
    Export {
        /// Sample tree to read instead of the bundled programs
        #[arg(long)]
        from: Option<PathBuf>,
        /// Destination `.js` file; stdout if omitted
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },
    /// Check that the page's memory editor rejects invalid input
    Smoke {
        /// WebDriver endpoint [env: EMU86_WEBDRIVER_URL]
        #[arg(long)]
        webdriver: Option<String>,
        /// Page to start from [env: EMU86_BASE_URL]
        #[arg(long)]
        base_url: Option<String>,
        /// Browser to request from the driver [env: EMU86_BROWSER]
        #[arg(long)]
        browser: Option<String>,
        /// Type a random invalid value instead of `BC`
        #[arg(long)]
        random_invalid: bool,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env::init();
    env::init_logging();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(emu86::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    let Some(command) = args.command else {
        println!("\n~ emu86 v{VERSION} ~");
        println!("{}", "Emu86 sample programs".bold());
        println!("{SHORT_INFO}");
        std::process::exit(0);
    };

    match command {
        Command::Sample {
            topic,
            flavor,
            field,
            from,
        } => {
            let topic: Topic = topic
                .parse()
                .map_err(|_| error::catalog_unknown_topic(&topic))?;
            let catalog = load_catalog(from.as_deref())?;
            if field {
                let mut form = Form::new();
                write_sample(&mut form, &catalog, topic, &flavor);
                let value = form.value(CODE_FIELD).unwrap_or_default();
                println!("{CODE_FIELD} = {}", serde_json::to_string(value).into_diagnostic()?);
            } else {
                print!("{}", catalog.lookup(topic, &flavor));
            }
            Ok(())
        }
        Command::List { from } => {
            let catalog = load_catalog(from.as_deref())?;
            for (topic, flavor, text) in catalog.iter() {
                println!(
                    "{:<8} {:<10} {:>3} lines  {}",
                    topic.to_string(),
                    flavor.to_string(),
                    text.lines().count(),
                    topic.function_name().dimmed(),
                );
            }
            Ok(())
        }
        Command::Export { from, dest } => {
            let catalog = load_catalog(from.as_deref())?;
            let script = export::render_js(&catalog);
            match dest {
                Some(dest) => {
                    fs::write(&dest, script).map_err(|e| error::export_write(&dest, e))?;
                    file_message(MsgColor::Green, "Exported", &dest);
                }
                None => print!("{script}"),
            }
            Ok(())
        }
        Command::Smoke {
            webdriver,
            base_url,
            browser,
            random_invalid,
            minimal,
        } => {
            output::set_minimal(minimal);
            let endpoint = webdriver.unwrap_or_else(env::webdriver_url);
            let base_url = base_url.unwrap_or_else(env::base_url);
            let browser = browser.unwrap_or_else(env::browser);
            let invalid_source = if random_invalid {
                InvalidSource::Random
            } else {
                InvalidSource::Literal
            };
            let scenario = Scenario::new(base_url).with_invalid_source(invalid_source);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .into_diagnostic()?;
            runtime.block_on(smoke(&scenario, &endpoint, &browser))
        }
    }
}

async fn smoke(scenario: &Scenario, endpoint: &str, browser: &str) -> Result<()> {
    message(MsgColor::Green, "Connecting", &format!("webdriver {endpoint}"));
    let mut driver = WebDriver::connect(endpoint, browser)
        .await
        .map_err(|e| error::smoke_connect(endpoint, e))?;

    message(MsgColor::Green, "Running", &format!("{browser} session {}", driver.session_id()));
    let report = scenario
        .run(&mut driver)
        .await
        .map_err(|failure| error::smoke_step(&failure))?;
    if report.closed {
        message(MsgColor::Green, "Closed", "browser session");
    } else {
        message(MsgColor::Red, "Unclosed", "browser session did not end cleanly");
    }

    message(
        MsgColor::Cyan,
        "Observed",
        &format!(
            "typed {:?}, valid input: {}, alert popup: {}",
            report.value_typed,
            report.observation.input_valid,
            report.observation.alert.was_shown(),
        ),
    );
    if report.verdict.is_error() {
        return Err(error::smoke_verdict(report.verdict.message()));
    }
    message(MsgColor::Green, "Passed", report.verdict.message());
    Ok(())
}

fn load_catalog(from: Option<&Path>) -> Result<Catalog> {
    match from {
        Some(root) => Catalog::from_dir(root),
        None => Ok(Catalog::builtin()),
    }
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

const SHORT_INFO: &str = r"
Prints, lists and exports the sample programs shown by the Emu86 page,
and smoke tests the page's memory editor through a WebDriver server.
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
