//! Aurora CLI
//!
//! Usage:
//!   aurora --text "your text here"     # Classify, then chat if the endpoint answers
//!   aurora --interactive               # Chat REPL with slash commands
//!   aurora --breathe 478               # Guided breathing (478 | box | coherent)
//!   aurora --ground                    # 5-4-3-2-1 grounding
//!   aurora --resources --tab coping    # Wellness resources
//!   aurora --serve                     # Companion HTTP endpoint
//!   aurora --text "text" --json        # JSON output

use anyhow::Context;
use clap::Parser;
use colored::{Color, Colorize};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aurora::core::resources::{
    self, breathing_guide, find_strategy, COMMUNICATION_TIPS, MUSIC, VIDEOS,
};
use aurora::core::{
    run_server, ChatController, ChatOutcome, CommandSynthesizer, EmotionClassifier, ExerciseSession,
    GroundingEngine, HttpChatBackend, InsightsPoller, LocalCache, Practice, QuickTool,
    ResourceLibrary, SpeechInput, SpeechOutput, SpeechSynthesizer, ConversationStore,
};
use aurora::types::{
    ConversationTurn, EmotionLabel, ExerciseFrame, GroundingView, Insights, Notice, NoticeCode,
    NoticeKind, PracticePhase, ResourceTab, StrategyKind, Technique,
};
use aurora::{Config, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS, VERSION};

type InputLines = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(
    name = "aurora",
    version = VERSION,
    about = "Aurora - wellness companion with emotion tracking and guided exercises",
    long_about = "Aurora is a terminal wellness companion.\n\n\
                  It classifies the emotion of each message, chats with a remote\n\
                  companion endpoint, and runs guided breathing and grounding exercises.\n\n\
                  Modes:\n  \
                  --interactive  Chat REPL (default)\n  \
                  --breathe      Breathing exercise (478, box, coherent)\n  \
                  --ground       5-4-3-2-1 grounding\n  \
                  --resources    Wellness resources\n  \
                  --serve        Companion endpoint server"
)]
struct Args {
    /// Text to classify and send (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Interactive chat mode
    #[arg(short, long)]
    interactive: bool,

    /// Run the companion endpoint server
    #[arg(short, long)]
    serve: bool,

    /// Run a breathing exercise (478, box, coherent)
    #[arg(short, long, value_name = "TECHNIQUE")]
    breathe: Option<Technique>,

    /// Stop the breathing exercise after this many breaths
    #[arg(long, requires = "breathe")]
    breaths: Option<u32>,

    /// Run the 5-4-3-2-1 grounding exercise
    #[arg(short, long)]
    ground: bool,

    /// Show wellness resources
    #[arg(short, long)]
    resources: bool,

    /// Resource tab to show and remember (breathing, media, coping, communication)
    #[arg(long, requires = "resources")]
    tab: Option<ResourceTab>,

    /// Open a media resource by title
    #[arg(long, requires = "resources", value_name = "TITLE")]
    open: Option<String>,

    /// Chat endpoint base URL
    #[arg(long, env = "AURORA_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Directory for the local cache (default: platform data dir)
    #[arg(long, env = "AURORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory
    #[arg(long)]
    no_persist: bool,

    /// Chat request timeout in seconds
    #[arg(long, env = "AURORA_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Server address (default: 127.0.0.1:5000)
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Do not speak replies this session
    #[arg(long)]
    no_speech: bool,

    /// TTS command used to speak replies (autodetected by default)
    #[arg(long, env = "AURORA_TTS_COMMAND")]
    tts_command: Option<String>,

    /// Debug logging
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::default().with_endpoint(&self.endpoint);
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.speech = !self.no_speech;
        config.tts_command = self.tts_command.clone();
        config.addr = self.addr;
        config
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "aurora=debug" } else { "aurora=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.no_color || args.json {
        colored::control::set_override(false);
    }

    let config = args.config();
    let cache = if args.no_persist {
        LocalCache::in_memory()
    } else {
        LocalCache::open(&config.data_dir)
            .with_context(|| format!("opening data dir {}", config.data_dir.display()))?
    };
    tracing::debug!(endpoint = %config.endpoint, data_dir = %config.data_dir.display(), "config loaded");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if args.serve {
        run_serve(&config).await
    } else if let Some(technique) = args.breathe {
        run_breathing(technique, args.breaths, &mut lines, args.json).await
    } else if args.ground {
        run_grounding(&mut lines, args.json).await
    } else if args.resources {
        run_resources(cache, &args)
    } else if let Some(text) = &args.text {
        run_single(text, &config, cache, args.json).await
    } else {
        run_interactive(&config, cache, &mut lines, args.json).await
    }
}

// =============================================================================
// MODES
// =============================================================================

/// Run the companion endpoint
async fn run_serve(config: &Config) -> anyhow::Result<()> {
    println!();
    println!("{}", format!("  Aurora companion endpoint v{}", VERSION).bold());
    println!();
    run_server(config.addr).await?;
    Ok(())
}

/// Classify one message and send it
async fn run_single(text: &str, config: &Config, cache: LocalCache, json: bool) -> anyhow::Result<()> {
    let reading = EmotionClassifier::new().classify(text, EmotionLabel::default());
    let mut chat = controller(config, cache)?;
    let outcome = chat.send_message(text).await;

    if json {
        #[derive(serde::Serialize)]
        struct SingleOutput<'a> {
            reading: &'a aurora::types::EmotionReading,
            reply: Option<&'a ConversationTurn>,
            connected: bool,
        }
        let out = SingleOutput {
            reading: &reading,
            reply: outcome.reply(),
            connected: matches!(outcome, ChatOutcome::Replied { .. }),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {} ({} words)",
        reading.label.icon(),
        reading.label.to_string().color(reading.label.color()).bold(),
        reading.word_count
    );
    print_outcome(&outcome);
    Ok(())
}

/// Chat REPL
async fn run_interactive(
    config: &Config,
    cache: LocalCache,
    lines: &mut InputLines,
    json: bool,
) -> anyhow::Result<()> {
    let mut chat = controller(config, cache.clone())?;
    let mut mic = SpeechInput::new(None, cache.clone());
    let poller = InsightsPoller::spawn(chat.backend().clone());

    print_header("Chat");
    println!("Type a message and press Enter. /help lists commands, /quit exits.");
    println!();
    for turn in chat.restored_turns() {
        print_turn(&turn);
    }

    loop {
        print_prompt(chat.current_emotion())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            let (name, arg) = match command.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (command, ""),
            };
            match name {
                "quit" | "exit" => break,
                "help" => print_help(),
                "clear" => print_notice(&chat.clear()),
                "speech" => print_notice(&chat.toggle_speech()),
                "mic" => match mic.toggle() {
                    Ok(state) => println!("Microphone: {:?}", state),
                    Err(notice) => print_notice(&notice),
                },
                "emotion" => match arg.parse::<EmotionLabel>() {
                    Ok(label) => {
                        chat.set_emotion(label);
                        println!("{} Emotion set to {}", label.icon(), label.to_string().color(label.color()));
                    }
                    Err(e) => print_error(&e),
                },
                "tool" => match arg.parse::<QuickTool>() {
                    Ok(tool) => {
                        let outcome = chat.quick_tool(tool).await;
                        if !json {
                            if let Some(turn) = chat.store().last_user_turn() {
                                print_turn(turn);
                            }
                        }
                        emit_outcome(&outcome, json)?;
                    }
                    Err(e) => print_error(&e),
                },
                "breathe" => match arg.parse::<Technique>() {
                    Ok(technique) => run_breathing(technique, None, lines, json).await?,
                    Err(e) => print_error(&e),
                },
                "ground" => run_grounding(lines, json).await?,
                "practice" => match find_strategy(arg) {
                    Some(strategy) => run_practice(Practice::new(strategy), lines).await?,
                    None => print_error(&format!("Unknown practice: {}", arg)),
                },
                "insights" => {
                    let insights = match poller.latest() {
                        Some(insights) => Some(insights),
                        None => match chat.insights().await {
                            Ok(insights) => Some(insights),
                            Err(e) => {
                                print_error(&e);
                                None
                            }
                        },
                    };
                    if let Some(insights) = insights {
                        print_insights(&insights, json)?;
                    }
                }
                "history" => {
                    let rendered = chat.history().render(chrono::Utc::now());
                    if rendered.is_empty() {
                        println!("{}", "No emotions recorded yet".dimmed());
                    }
                    for line in rendered {
                        println!("  {}", line);
                    }
                    if !chat.trend().is_empty() {
                        println!("  trend {}", chat.trend().sparkline());
                    }
                }
                "resources" => {
                    let mut library = ResourceLibrary::load(cache.clone());
                    if !arg.is_empty() {
                        match arg.parse::<ResourceTab>() {
                            Ok(tab) => library.select_tab(tab)?,
                            Err(e) => {
                                print_error(&e);
                                continue;
                            }
                        }
                    }
                    print_resources(library.tab());
                }
                other => print_error(&format!("Unknown command: /{}", other)),
            }
            continue;
        }

        let outcome = chat.send_message(line).await;
        emit_outcome(&outcome, json)?;
    }

    println!();
    println!(
        "Session ended. Messages: {} | Minutes: {} | Emotion: {} {}",
        chat.message_count(),
        chat.session_minutes(),
        chat.current_emotion().icon(),
        chat.current_emotion()
    );
    Ok(())
}

/// Breathing exercise until stopped, out of input, or `breaths` reached
async fn run_breathing(
    technique: Technique,
    breaths: Option<u32>,
    lines: &mut InputLines,
    json: bool,
) -> anyhow::Result<()> {
    let guide = breathing_guide(technique);
    if !json {
        print_header(guide.title);
        for (i, step) in guide.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
        println!();
        println!("{}", "p + Enter pauses, r resumes, q stops".dimmed());
        println!();
    }

    let (mut session, mut frames) = ExerciseSession::start(technique);
    let mut stdin_open = true;
    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                print_frame(&frame, json)?;
                if breaths.is_some_and(|limit| frame.breath_count >= limit) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line?.as_deref().map(str::trim) {
                    // keep breathing with no controls
                    None => stdin_open = false,
                    Some("q") | Some("quit") => break,
                    Some("p") => session.pause(),
                    Some("r") => session.resume(),
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let last = session.frame();
    session.stop();
    if !json {
        if let Some(frame) = last {
            println!();
            println!(
                "Exercise ended. Breaths: {} | Time: {}",
                frame.breath_count,
                frame.elapsed_display()
            );
        }
    }
    Ok(())
}

/// 5-4-3-2-1 grounding; an empty line advances once a step is full
async fn run_grounding(lines: &mut InputLines, json: bool) -> anyhow::Result<()> {
    let mut engine = GroundingEngine::new();
    if !json {
        print_header("5-4-3-2-1 Grounding");
        println!("{}", "Enter one item per line. Empty line moves on when a step is full, q stops.".dimmed());
        println!();
    }
    print_grounding(&engine.view(), json)?;

    while !engine.is_complete() {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == "q" {
            break;
        }
        let result = if line.is_empty() || line == "next" {
            engine.next()
        } else {
            engine.add_item(line)
        };
        match result {
            Ok(view) => print_grounding(&view, json)?,
            Err(e) => print_error(&e),
        }
    }
    Ok(())
}

/// Step through a coping strategy
async fn run_practice(mut practice: Practice, lines: &mut InputLines) -> anyhow::Result<()> {
    let strategy = practice.strategy();
    print_header(strategy.title);
    println!("{} ({})", "Press Enter for each step, q stops.".dimmed(), strategy.duration);
    practice.start();

    loop {
        match practice.phase() {
            PracticePhase::Active(i) => {
                if let Some(step) = practice.current_step() {
                    println!("  {}/{} {}", i + 1, strategy.steps.len(), step);
                }
            }
            PracticePhase::Complete => {
                print_notice(&Notice::new(NoticeCode::N003_PRACTICE_COMPLETE));
                break;
            }
            PracticePhase::NotStarted => {}
        }
        match lines.next_line().await?.as_deref().map(str::trim) {
            None | Some("q") => break,
            _ => {
                if let Err(e) = practice.next() {
                    print_error(&e);
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Show (and optionally switch) the resources tab
fn run_resources(cache: LocalCache, args: &Args) -> anyhow::Result<()> {
    let mut library = ResourceLibrary::load(cache);
    if let Some(tab) = args.tab {
        library.select_tab(tab)?;
    }

    if let Some(title) = &args.open {
        let wanted = title.trim().to_lowercase();
        let found = MUSIC
            .iter()
            .chain(VIDEOS.iter())
            .find(|m| m.title.to_lowercase() == wanted)
            .with_context(|| format!("no media resource titled {:?}", title))?;
        library.track_usage(found.kind, found.title);
        println!("{} {}", found.title.bold(), found.url);
        return Ok(());
    }

    if args.json {
        let tab = library.tab();
        let body = match tab {
            ResourceTab::Breathing => serde_json::to_string_pretty(
                &Technique::ALL.iter().map(|t| breathing_guide(*t)).collect::<Vec<_>>(),
            )?,
            ResourceTab::Media => serde_json::to_string_pretty(&(&MUSIC, &VIDEOS))?,
            ResourceTab::Coping => serde_json::to_string_pretty(&resources::COPING_STRATEGIES)?,
            ResourceTab::Communication => serde_json::to_string_pretty(&COMMUNICATION_TIPS)?,
        };
        println!("{}", body);
    } else {
        print_resources(library.tab());
    }
    Ok(())
}

// =============================================================================
// WIRING
// =============================================================================

fn controller(config: &Config, cache: LocalCache) -> anyhow::Result<ChatController<HttpChatBackend>> {
    let backend = HttpChatBackend::from_config(config)?;
    let store = ConversationStore::load(cache.clone());
    let mut speech = SpeechOutput::load(synthesizer(config), cache);
    if !config.speech {
        speech = speech.muted();
    }
    Ok(ChatController::new(backend, store, speech))
}

fn synthesizer(config: &Config) -> Option<Box<dyn SpeechSynthesizer>> {
    if !config.speech {
        return None;
    }
    let synth = match &config.tts_command {
        Some(command) => CommandSynthesizer::new(command),
        None => CommandSynthesizer::detect(),
    };
    match synth {
        Some(s) => {
            tracing::debug!(program = s.program(), "speech synthesizer ready");
            Some(Box::new(s))
        }
        None => {
            tracing::debug!("no speech synthesizer found");
            None
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Print header
fn print_header(title: &str) {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Aurora v{} - {}", VERSION, title).bold());
    println!("{}", "========================================".bold());
    println!();
}

fn print_help() {
    println!("  /clear               Clear the conversation");
    println!("  /speech              Toggle spoken replies");
    println!("  /mic                 Toggle voice input");
    println!("  /emotion <label>     Set the current emotion");
    println!("  /tool <name>         Quick tool: stress, anxious, grounding, emergency");
    println!("  /breathe <technique> Breathing: 478, box, coherent");
    println!("  /ground              5-4-3-2-1 grounding");
    println!("  /practice <title>    Step through a coping strategy");
    println!("  /insights            Emotion insights");
    println!("  /history             Recent emotions and trend");
    println!("  /resources [tab]     Wellness resources");
    println!("  /quit                Exit");
}

/// `😐 [Neutral] > `
fn print_prompt(emotion: EmotionLabel) -> anyhow::Result<()> {
    let label = format!("[{}]", emotion).color(emotion.color());
    print!("{} {} > ", emotion.icon(), label);
    std::io::stdout().flush()?;
    Ok(())
}

fn print_turn(turn: &ConversationTurn) {
    println!(
        "{} {}: {}",
        turn.sender.avatar(),
        turn.sender.display_name().bold(),
        turn.text
    );
}

fn print_outcome(outcome: &ChatOutcome) {
    match outcome {
        ChatOutcome::Rejected => {}
        ChatOutcome::Replied { reply, notices, .. } => {
            print_turn(reply);
            for notice in notices {
                print_notice(notice);
            }
        }
        ChatOutcome::Fallback { reply, error } => {
            print_turn(reply);
            println!("{}", format!("  └─ {}", error).dimmed());
        }
    }
}

fn emit_outcome(outcome: &ChatOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        if let Some(reply) = outcome.reply() {
            println!("{}", serde_json::to_string(reply)?);
        }
    } else {
        print_outcome(outcome);
    }
    Ok(())
}

fn print_notice(notice: &Notice) {
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    };
    println!("  {}", notice.to_string().color(color));
}

fn print_error(error: &dyn std::fmt::Display) {
    println!("  {}", format!("✗ {}", error).red());
}

fn print_frame(frame: &ExerciseFrame, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(frame)?);
    } else if colored::control::SHOULD_COLORIZE.should_colorize() {
        println!("{}", frame.to_terminal_string());
    } else {
        println!("{}", frame.to_parseable_string());
    }
    Ok(())
}

fn print_grounding(view: &GroundingView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
        return Ok(());
    }
    match view {
        GroundingView::Step {
            number,
            total,
            prompt,
            required,
            collected,
            can_advance,
            ..
        } => {
            println!(
                "{} {} [{}/{}]",
                format!("Step {}/{}:", number, total).bold(),
                prompt,
                collected.len(),
                required
            );
            if *can_advance {
                println!("{}", "  Step complete. Press Enter to continue.".green());
            }
        }
        GroundingView::Complete => {
            println!("{}", "Grounding complete. Well done.".green().bold());
        }
    }
    Ok(())
}

fn print_insights(insights: &Insights, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(insights)?);
        return Ok(());
    }
    let top = insights.most_common_emotion;
    println!("  Most common: {} {}", top.icon(), top.to_string().color(top.color()));
    println!("  Interactions: {}", insights.total_interactions);
    println!("  Avg message length: {:.1}", insights.avg_message_length);
    if insights.recent_drug_mentions > 0 {
        println!("  Recent substance mentions: {}", insights.recent_drug_mentions);
    }
    for label in EmotionLabel::ALL {
        if let Some(count) = insights.emotion_distribution.get(&label) {
            println!("    {} {:<9} {}", label.icon(), label.to_string(), count);
        }
    }
    Ok(())
}

fn print_resources(tab: ResourceTab) {
    println!("{}", format!("Resources - {}", tab.id()).bold());
    match tab {
        ResourceTab::Breathing => {
            for technique in Technique::ALL {
                let guide = breathing_guide(technique);
                println!("  {} ({})", guide.title.bold(), technique.id());
                for step in guide.steps {
                    println!("    - {}", step);
                }
            }
        }
        ResourceTab::Media => {
            for media in MUSIC.iter().chain(VIDEOS.iter()) {
                println!("  {} [{}, {}]", media.title.bold(), media.kind, media.duration);
                println!("    {}", media.description.dimmed());
            }
        }
        ResourceTab::Coping => {
            for kind in [StrategyKind::Immediate, StrategyKind::Daily] {
                for strategy in resources::strategies(kind) {
                    println!("  {} ({:?}, {})", strategy.title.bold(), kind, strategy.duration);
                    for step in strategy.steps {
                        println!("    - {}", step);
                    }
                }
            }
        }
        ResourceTab::Communication => {
            for category in &COMMUNICATION_TIPS {
                println!("  {}", category.category.bold());
                for tip in category.tips {
                    println!("    - {}", tip);
                }
            }
        }
    }
}
