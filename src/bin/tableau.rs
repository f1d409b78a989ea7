use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tableau::{
    AnimTarget, BlendMode, CpuSurface, FixedStepTimer, FrameTimer, Game, GameOpts, IntervalTimer,
    Point, Repeat, Rgba8, Scene, Shape,
};

#[derive(Parser, Debug)]
#[command(name = "tableau", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate the built-in demo scene and write its last frame as a PNG.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Number of frames to run.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frame-loop options as JSON (`GameOpts`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace frames on the wall clock instead of stepping a virtual clock.
    #[arg(long)]
    realtime: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo(args) => cmd_demo(args),
    }
}

fn read_opts(path: Option<&Path>) -> anyhow::Result<GameOpts> {
    let opts = match path {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse config JSON")?
        }
        None => GameOpts {
            clear_rgba: Some([18, 20, 28, 255]),
            ..GameOpts::default()
        },
    };
    Ok(opts.with_env_overrides())
}

fn build_demo(scene: &mut Scene, width: f64, height: f64) -> anyhow::Result<()> {
    let root = scene.root();
    let world = scene.create_group("world")?;
    scene.add(root, world)?;

    let center = Point::new(width / 2.0, height / 2.0);
    let unit = width.min(height) / 8.0;

    let backdrop = Shape::rectangle(width, height * 0.3, Point::new(0.0, height * 0.7))?
        .with_fill(Rgba8::from_hex("#2a3b4c")?);
    let backdrop = scene.create_object("ground", backdrop)?;
    scene.add(world, backdrop)?;

    let sun = Shape::circle(unit, Point::new(unit * 1.5, unit * 1.5))?
        .with_fill(Rgba8::from_hex("#ffbb00")?);
    let sun = scene.create_object("sun", sun)?;
    scene.add(world, sun)?;
    scene.animate(sun, AnimTarget::Brightness(0.6), 1000.0, Repeat::Forever)?;

    let star = Shape::star(5, unit * 1.5, 0.5, center)?
        .with_fill(Rgba8::rgb(40, 180, 90))
        .with_stroke(Rgba8::BLACK, 3.0, &[])?;
    let star = scene.create_object("star", star)?;
    scene.add(world, star)?;
    scene.animate(star, AnimTarget::Rotate(360.0), 2000.0, Repeat::Forever)?;
    scene.animate(star, AnimTarget::Scale(1.3), 500.0, Repeat::Times(1))?;
    scene.animate(star, AnimTarget::Scale(1.0), 500.0, Repeat::Times(1))?;

    let ghost = Shape::ellipse(unit * 3.0, unit * 1.5, Point::new(width - unit * 2.0, unit * 2.0))?
        .with_fill(Rgba8::new(128, 0, 128, 200))
        .with_stroke(Rgba8::WHITE, 2.0, &[6.0, 4.0])?;
    let ghost = scene.create_object("ghost", ghost)?;
    scene.add(world, ghost)?;
    scene.transform_mut(ghost)?.set_blend(BlendMode::Screen);
    scene.animate(ghost, AnimTarget::Opacity(0.2), 800.0, Repeat::Times(1))?;
    scene.animate(
        ghost,
        AnimTarget::Move {
            x: -unit * 2.0,
            y: unit,
        },
        1000.0,
        Repeat::Times(1),
    )?;

    let badge = Shape::polygon(6, unit * 0.6, Point::new(width - unit * 1.2, height - unit * 1.2))?
        .with_fill(Rgba8::rgb(220, 60, 60));
    let badge = scene.create_object("badge", badge)?;
    scene.add(star, badge)?;
    scene.transform_mut(badge)?.set_mirror(true, false).set_skew(0.2, 0.0)?;
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let opts = read_opts(args.config.as_deref())?;
    let surface = CpuSurface::new(args.width, args.height)?;
    let mut game = Game::new(surface, opts)?;
    build_demo(
        game.scene_mut(),
        f64::from(args.width),
        f64::from(args.height),
    )?;

    let mut timer: Box<dyn FrameTimer> = if args.realtime {
        Box::new(IntervalTimer::new(args.fps)?.with_frame_limit(args.frames))
    } else {
        Box::new(FixedStepTimer::from_fps(args.fps)?.with_frame_limit(args.frames))
    };

    let mut completed = 0usize;
    let frames = game.run(timer.as_mut(), |ctx| {
        completed += ctx.completed().len();
        Ok(())
    })?;

    let mut frame = game.surface().frame_rgba();
    if frame.premultiplied {
        tableau::unpremultiply_rgba8_in_place(&mut frame.data);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "rendered {frames} frames ({completed} animations completed), wrote {}",
        args.out.display()
    );
    Ok(())
}
