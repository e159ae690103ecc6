use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gfx-replay", version)]
struct Cli {
    /// Log debug-level recorder events (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a per-keyframe summary of a keyframe document.
    Inspect(InspectArgs),
    /// Replay a keyframe document up to an index and print the resulting scene as JSON.
    Replay(ReplayArgs),
    /// Record a small animated scene and write its keyframe document.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input keyframe document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input keyframe document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Keyframe index (0-based). Defaults to the last keyframe.
    #[arg(long)]
    index: Option<usize>,
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output keyframe document JSON.
    #[arg(long)]
    out: PathBuf,

    /// Number of keyframes to record.
    #[arg(long, default_value_t = 8)]
    frames: usize,

    /// Pretty-print the output document.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_doc(path: &Path) -> anyhow::Result<gfx_replay::KeyframeDocument> {
    gfx_replay::KeyframeDocument::from_path(path)
        .with_context(|| format!("read keyframe document '{}'", path.display()))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let doc = read_doc(&args.in_path)?;
    println!("keyframes: {}", doc.keyframes.len());
    for (i, kf) in doc.keyframes.iter().enumerate() {
        println!(
            "{i:>4}: loads={} creations={} deletions={} updates={} user_transforms={}",
            kf.loads.len(),
            kf.creations.len(),
            kf.deletions.len(),
            kf.state_updates.len(),
            kf.user_transforms.len(),
        );
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let doc = read_doc(&args.in_path)?;
    let mut player = gfx_replay::Player::from_document(&doc);
    if player.num_keyframes() == 0 {
        anyhow::bail!("'{}' holds no keyframes", args.in_path.display());
    }
    let index = args.index.unwrap_or(player.num_keyframes() - 1);

    let mut scene = gfx_replay::ReplayedScene::new();
    player
        .set_keyframe_index(index, &mut scene)
        .with_context(|| format!("replay to keyframe {index}"))?;

    let json = serde_json::to_string_pretty(&scene).context("encode replayed scene")?;
    println!("{json}");
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    use gfx_replay::{
        AssetInfo, JsonFileStore, Quat, Recorder, RecorderOpts, RenderAssetInstanceCreationInfo,
        SimpleNode, Transform, Vec3,
    };

    let mut rec = Recorder::with_opts(RecorderOpts {
        pretty_json: args.pretty,
    });
    rec.on_load_render_asset(AssetInfo::new("cube"));
    rec.on_load_render_asset(AssetInfo::new("sphere"));

    let pivot = SimpleNode::new();
    let orbiter = SimpleNode::with_parent(&pivot);
    orbiter.set_translation(Vec3::new(2.0, 0.0, 0.0));
    rec.on_create_render_asset_instance(&orbiter, RenderAssetInstanceCreationInfo::new("cube"));

    let mut transient: Option<Rc<SimpleNode>> = None;
    for frame in 0..args.frames {
        let angle = frame as f32 * std::f32::consts::FRAC_PI_4;
        pivot.set_local_transform(Transform::from_rotation(Quat::from_rotation_y(angle)));

        // A sphere lives for two frames out of every four.
        match (frame % 4, transient.take()) {
            (0, _) => {
                let node = SimpleNode::new();
                node.set_translation(Vec3::new(0.0, frame as f32, 0.0));
                node.set_semantic_id(7);
                rec.on_create_render_asset_instance(
                    &node,
                    RenderAssetInstanceCreationInfo::new("sphere"),
                );
                transient = Some(node);
            }
            (2, Some(node)) => drop(node),
            (_, kept) => transient = kept,
        }

        rec.add_user_transform_to_keyframe(
            "camera",
            Vec3::new(0.0, 1.5, 6.0),
            Quat::from_rotation_y(angle * 0.5),
        );
        rec.save_keyframe();
    }

    let mut store = JsonFileStore::new(&args.out).pretty(args.pretty);
    let frames = rec.num_saved_keyframes();
    rec.write_saved_keyframes_to_store(&mut store)
        .with_context(|| format!("write keyframes '{}'", args.out.display()))?;

    eprintln!("wrote {} ({frames} keyframes)", args.out.display());
    Ok(())
}
