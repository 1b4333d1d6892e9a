use clack::audio::{AudioBackend, ChannelBackend, NullBackend, SystemPlayer};
use clack::config::{RcConfig, RcLoader};
use clack::controller::EditorSession;
use clack::input::TerminalInput;
use clack::storage::FileStorage;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

/// Audio-first modal text editor.
#[derive(Parser, Debug)]
#[command(name = "clack", version, about)]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    file: Option<PathBuf>,

    /// Read settings from this file instead of .clackrc
    #[arg(long)]
    rc: Option<PathBuf>,

    /// Whitespace units per indentation level
    #[arg(long)]
    tab_width: Option<usize>,

    /// Rows moved by PageUp / PageDown
    #[arg(long)]
    page_size: Option<usize>,

    /// Speech rate in words per minute
    #[arg(long)]
    rate: Option<u32>,

    /// Write logs here (default: clack.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run without speech or tones
    #[arg(long)]
    mute: bool,

    /// Print a sample .clackrc and exit
    #[arg(long)]
    print_rc: bool,
}

fn load_config(args: &Args) -> Result<RcConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.rc {
        Some(path) => RcLoader::load_from(path)?,
        None => RcLoader::load_config(),
    };

    // Command line wins over the rc file
    if let Some(tab_width) = args.tab_width {
        config.tab_stop = tab_width.max(1);
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size.max(1);
    }
    if let Some(rate) = args.rate {
        config.rate_wpm = rate;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    Ok(config)
}

fn init_logging(config: &RcConfig) -> Result<(), Box<dyn std::error::Error>> {
    // stderr belongs to the raw-mode terminal, so logs go to a file
    let path = config
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("clack.log"));
    let file = File::create(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_rc {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }

    let config = load_config(&args)?;
    init_logging(&config)?;
    log::info!("starting clack");

    let audio: Box<dyn AudioBackend> = if args.mute {
        Box::new(NullBackend)
    } else {
        let (voice, rate_wpm, tones) = (config.voice.clone(), config.rate_wpm, config.tones);
        Box::new(ChannelBackend::spawn(move || {
            SystemPlayer::new(voice, rate_wpm, tones)
        })?)
    };

    let mut storage = FileStorage::new(None);
    if let Some(line_ending) = config.line_ending {
        storage = storage.with_line_ending(line_ending);
    }

    let mut session = EditorSession::new(config.editor_config(), audio, Box::new(storage));
    if let Some(path) = &args.file {
        session.open(path)?;
    }

    let mut input = TerminalInput::new()?;
    let result = session.run(&mut input);
    input.restore()?;
    result?;

    log::info!("clack exited");
    Ok(())
}
