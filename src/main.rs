use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use loginflow::config::Config;
use loginflow::domain::{FlowEvent, Scene};
use loginflow::flow::{
    LoginFlowController, LoginInput, LoginOutput, Projection, StartScreenController, StartScreenInput, TextField,
};
use loginflow::service::Directory;
use loginflow::validation::RuleValidator;

mod cli;

use cli::Cli;
use cli::commands::Commands;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loginflow")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("loginflow.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = config.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let directory = Arc::new(Directory::from(&config.directory));
    info!("Directory loaded with {} accounts", directory.len());

    match &cli.command {
        Some(Commands::Login { email, password }) => handle_login_command(email, password, directory, config).await,
        Some(Commands::Repl) | None => run_repl(directory, config).await,
    }
}

fn login_flow(directory: Arc<Directory>, config: &Config) -> LoginFlowController<RuleValidator, Directory> {
    LoginFlowController::new(Arc::new(RuleValidator::with_description("login form")), directory)
        .with_config(config.flow.clone())
}

async fn handle_login_command(email: &str, password: &str, directory: Arc<Directory>, config: &Config) -> Result<()> {
    info!("One-shot login for: {}", email);
    let (confirm, confirm_rx) = mpsc::channel(1);
    let mut output = login_flow(directory, config).transform(LoginInput {
        email: TextField::new(email),
        password: TextField::new(password),
        confirm: confirm_rx,
    });

    confirm.send(()).await.context("Login flow stopped before confirm")?;
    drop(confirm);

    let mut failure = None;
    while let Some(event) = output.events.recv().await {
        print_event(&event);
        if let FlowEvent::Failed(message) = event {
            failure = Some(message);
        }
    }

    if let Some(message) = failure {
        bail!("Login failed: {}", message);
    }
    Ok(())
}

fn print_event(event: &FlowEvent) {
    match event {
        FlowEvent::Loading => println!("{}", "Signing in...".cyan()),
        FlowEvent::LoginSucceeded => println!("{}", "Logged in".green()),
        FlowEvent::Failed(message) => println!("{} {}", "Failed:".red(), message),
        FlowEvent::ValidationPassed => {}
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  <email> <password>   fill the form and press confirm");
    println!("  confirm              press confirm with the current form");
    println!("  logout               press logout");
    println!("  login | dashboard    navigate from the start screen");
    println!("  status               show whether a user is logged in");
    println!("  quit                 exit");
}

async fn run_repl(directory: Arc<Directory>, config: &Config) -> Result<()> {
    info!("Launching interactive form");

    let email = TextField::default();
    let password = TextField::default();
    let (confirm, confirm_rx) = mpsc::channel(config.flow.trigger_capacity.max(1));
    let LoginOutput { events, driver, .. } = login_flow(Arc::clone(&directory), config).transform(LoginInput {
        email: email.clone(),
        password: password.clone(),
        confirm: confirm_rx,
    });

    let (dashboard, dashboard_pressed) = mpsc::channel(1);
    let (login, login_pressed) = mpsc::channel(1);
    let (logout, logout_pressed) = mpsc::channel(1);
    let start = StartScreenController::new(Arc::clone(&directory)).with_config(config.flow.clone());
    let start_output = start.transform(StartScreenInput {
        dashboard_pressed,
        login_pressed,
        logout_pressed,
    });

    let printer = tokio::spawn(print_outputs(events, start_output.transition, start_output.logout));

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let sent = match words.as_slice() {
            [] => Ok(()),
            ["quit"] | ["exit"] => break,
            ["help"] => {
                print_help();
                Ok(())
            }
            ["confirm"] => confirm.send(()).await,
            ["logout"] => logout.send(()).await,
            ["login"] => login.send(()).await,
            ["dashboard"] => dashboard.send(()).await,
            ["status"] => {
                let state = if start.is_logged_in().await { "logged in".green() } else { "logged out".yellow() };
                println!("{}", state);
                Ok(())
            }
            [user, pass] => {
                email.set(*user);
                password.set(*pass);
                confirm.send(()).await
            }
            _ => {
                println!("{} {}", "Unknown command:".red(), line.trim());
                Ok(())
            }
        };
        sent.context("Flow stopped unexpectedly")?;
    }

    // Closing the inputs lets both drivers wind down
    drop((confirm, dashboard, login, logout));
    driver.await.context("Login flow panicked")?;
    start_output.driver.await.context("Start screen panicked")?;
    printer.await.context("Printer panicked")?;
    info!("Interactive form closed");
    Ok(())
}

async fn print_outputs(
    mut events: Projection<FlowEvent>,
    mut transitions: Projection<Scene, Scene>,
    mut logouts: Projection<(), ()>,
) {
    let (mut events_open, mut transitions_open, mut logouts_open) = (true, true, true);
    while events_open || transitions_open || logouts_open {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => print_event(&event),
                None => events_open = false,
            },
            scene = transitions.recv(), if transitions_open => match scene {
                Some(scene) => println!("{} {}", "Navigate to".blue(), scene),
                None => transitions_open = false,
            },
            logout = logouts.recv(), if logouts_open => match logout {
                Some(()) => println!("{}", "Logged out".yellow()),
                None => logouts_open = false,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging once the level is known
    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
