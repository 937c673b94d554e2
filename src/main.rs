use clap::{Parser, Subcommand};
use mudra::actions::ActionRegistry;
use mudra::config::Config;
use mudra::feed;
use mudra::landmarks::Landmark;
use mudra::library::GestureLibrary;
use mudra::pipeline::run_session;
use mudra::session::Session;
use mudra::sink::{ActionDispatchSink, TranscriptSink};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Parser)]
#[command(name = "mudra")]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Transcript mode: print the transcript as JSON after each detection
    Transcribe,
    /// Load the gesture store and report what is usable
    Check,
}

#[hotpath::main]
fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let config = Config::load_from(&cli.config);

    if matches!(cli.command, Some(Command::Check)) {
        return run_check(&config);
    }

    let library = Arc::new(GestureLibrary::load(&config.library.path)?);
    eprintln!(
        "Loaded {} gesture(s) from {}",
        library.len(),
        config.library.path.display()
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let (frame_tx, frame_rx) = flume::bounded::<Vec<Landmark>>(100);

    // The feed thread exits with the process; a blocked stdin read cannot
    // be interrupted portably.
    let running_feed = running.clone();
    thread::spawn(move || feed::run_stdin_feed(frame_tx, running_feed));

    let session = Session::new(library, config.matching.params());

    match cli.command {
        Some(Command::Transcribe) => run_transcribe_mode(frame_rx, session, &config, running),
        _ => run_detect_mode(frame_rx, session, &config, running),
    }
}

fn run_detect_mode(
    rx: flume::Receiver<Vec<Landmark>>,
    session: Session,
    config: &Config,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let registry = ActionRegistry::from_bindings(&config.actions.bind);
    if registry.is_empty() {
        eprintln!("No actions bound; detections will only be reported.");
    } else {
        eprintln!("{} action binding(s) active", registry.len());
    }
    eprintln!("Reading landmark frames from stdin... Press Ctrl+C to stop.\n");

    run_session(
        rx,
        session,
        Box::new(ActionDispatchSink::new(registry)),
        running,
        config.matching.verbose,
    )
}

fn run_transcribe_mode(
    rx: flume::Receiver<Vec<Landmark>>,
    session: Session,
    config: &Config,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (line_tx, line_rx) = flume::bounded::<String>(10);

    // Transcript lines get their own thread so matching never blocks on a
    // slow stdout consumer.
    let printer = thread::spawn(move || {
        while let Ok(line) = line_rx.recv() {
            println!("{}", line);
        }
    });

    eprintln!("Transcribing... Press Ctrl+C to stop.\n");
    let result = run_session(
        rx,
        session,
        Box::new(TranscriptSink::new(line_tx)),
        running,
        config.matching.verbose,
    );

    let _ = printer.join();
    result
}

fn run_check(config: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let path = &config.library.path;
    let library = GestureLibrary::load(path)?;

    println!("{}: {} usable gesture(s)", path.display(), library.len());
    for template in library.iter() {
        println!("  {}  (word: {})", template.name, template.word());
    }
    Ok(())
}
