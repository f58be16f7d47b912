use anyhow::Context;
use clap::Parser;
use console::prompt::{AutoAnswer, ConsolePrompt};
use console::report::{render_json, render_progress};
use log::info;
use posecore::media::open_media;
use posecore::prelude::UserPrompt;
use posecore::session::AnnotationSession;
use std::path::PathBuf;
use workflow::config::{AnnotatorConfig, ConfigOverrides};
use workflow::runner::Runner;
use workflow::script::EventScript;

mod console;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the pose keypoint annotator")]
struct Args {
    /// YAML config layered over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Image, video or image directory to annotate
    #[arg(long)]
    path: Option<PathBuf>,
    /// Frame count reported by the video reader
    #[arg(long)]
    frames: Option<usize>,
    /// Directory for `<media>_keypoints.csv` (defaults to the media's directory)
    #[arg(long)]
    save_loc: Option<PathBuf>,
    /// Comma-separated keypoint names, in column order
    #[arg(long, value_delimiter = ',')]
    keypoints: Option<Vec<String>>,
    #[arg(long)]
    radius: Option<f64>,
    /// Save after every committed edit
    #[arg(long, default_value_t = false)]
    autosave: bool,
    /// Replay a YAML event script through the session
    #[arg(long)]
    script: Option<PathBuf>,
    /// Print annotation progress for the open media
    #[arg(long, default_value_t = false)]
    summary: bool,
    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Answer yes to the unsaved-changes prompt instead of asking
    #[arg(long, default_value_t = false)]
    yes: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let overrides = ConfigOverrides {
        path: args.path.clone(),
        frames: args.frames,
        save_loc: args.save_loc.clone(),
        keypoints: args.keypoints.clone(),
        radius: args.radius,
        autosave: args.autosave,
    };
    let config = AnnotatorConfig::resolve(args.config.as_deref(), &overrides)?;
    let media_path = config.media_path()?.to_path_buf();
    let media = open_media(&media_path, config.frames)
        .with_context(|| format!("opening media {}", media_path.display()))?;

    let mut prompt: Box<dyn UserPrompt> = if args.yes {
        Box::new(AutoAnswer::new(true))
    } else {
        Box::new(ConsolePrompt::stdio())
    };

    let mut session = AnnotationSession::new(config.session.clone(), &*media)
        .context("creating annotation session")?;
    match session.restore() {
        Ok(true) => println!("Restored annotations from {}", session.save_path().display()),
        Ok(false) => info!("no save file at {}", session.save_path().display()),
        Err(err) => {
            prompt.notify(&format!(
                "Could not load {}: {}",
                session.save_path().display(),
                err
            ));
            return Err(err).context("restoring existing annotations");
        }
    }

    let mut script_failure = None;
    if let Some(script_path) = &args.script {
        let script = EventScript::load(script_path)?;
        match Runner::new().execute(&mut session, &script) {
            Ok(report) => println!("{}", report),
            Err(err) => {
                prompt.notify(&format!("Script stopped: {:#}", err));
                script_failure = Some(err);
            }
        }
    }

    if args.summary {
        let progress = session.progress();
        if args.json {
            println!(
                "{}",
                render_json(session.save_path(), &progress, session.metrics())?
            );
        } else {
            println!("{}", render_progress(&progress));
        }
    }

    if let Err(err) = session.prompt_for_save(prompt.as_mut()) {
        prompt.notify(&format!("Saving failed: {}", err));
        return Err(err).context("saving annotations");
    }

    let edits = session.metrics();
    info!(
        "placements={} moves={} clears={} saves={} loads={} failures={}",
        edits.placements, edits.moves, edits.clears, edits.saves, edits.loads, edits.failures
    );

    match script_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
