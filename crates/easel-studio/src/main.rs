//! Headless frame driver.
//!
//! Builds a synthetic canvas, renders it for a number of frames through the
//! batching façade against a recording context, then prints frame statistics
//! and the optimizer's suggestions.

use anyhow::{Result, bail};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use easel_engine::command::shapes::TextCmd;
use easel_engine::coords::{Rect, Vec2, Viewport};
use easel_engine::gfx::{RecordingContext, TextureId};
use easel_engine::logging::{LoggingConfig, init_logging};
use easel_engine::optimizer::PerformanceOptimizer;
use easel_engine::paint::Color;
use easel_engine::{CommandRenderer, MaterialKey, QueueConfig, RenderCommand, ZIndex};

const CANVAS_W: f32 = 1280.0;
const CANVAS_H: f32 = 720.0;

/// Drive the easel batching engine headlessly and report batching statistics
#[derive(Parser, Debug)]
#[command(name = "easel-studio")]
#[command(version)]
struct Args {
    /// Number of frames to render
    #[arg(short, long, default_value_t = 120)]
    frames: u32,

    /// Shapes submitted per frame
    #[arg(short, long, default_value_t = 2000)]
    shapes: usize,

    /// Seed for the generated scene
    #[arg(long, default_value_t = 0x9e37_79b9)]
    seed: u64,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log {
        logging = logging.with_filter(filter.as_str());
    }
    init_logging(logging);

    let Args { frames, shapes, seed, .. } = args;
    log::info!("driving {frames} frames with {shapes} shapes each");

    let mut renderer =
        CommandRenderer::new(QueueConfig::default()).with_optimizer(PerformanceOptimizer::default());
    let mut ctx = RecordingContext::new();
    let mut abandoned = 0u32;

    for frame in 0..frames {
        // Pan slowly so culling sees a different slice each frame.
        let scroll = Vec2::new(frame as f32 * 4.0, 0.0);
        renderer.set_viewport(Viewport::new(CANVAS_W, CANVAS_H).with_origin(scroll));

        renderer.submit(RenderCommand::clear(
            ZIndex::BACKGROUND,
            Rect::new(scroll.x, scroll.y, CANVAS_W, CANVAS_H),
            Color::white(),
        ));
        renderer.submit_batch(scene(shapes, seed, frame));

        ctx.reset();
        match renderer.render(&mut ctx) {
            Some(stats) if frame % 30 == 0 => log::info!(
                "frame {frame}: {}/{} visible, {} batches, {} draw calls, {} vertices",
                stats.visible_commands,
                stats.total_commands,
                stats.batches,
                stats.draw_calls,
                stats.vertices,
            ),
            Some(_) => {}
            None => abandoned += 1,
        }
    }

    if frames > 0 && abandoned == frames {
        bail!("every frame was abandoned by the graphics context");
    }

    let last = renderer.last_stats();
    println!();
    println!("  frames rendered   {}", frames - abandoned);
    println!("  frames abandoned  {abandoned}");
    println!("  last frame        {} commands, {} culled", last.total_commands, last.culled_commands);
    println!("  batches           {} (+{} unbatched)", last.total_batches, last.unbatched_commands);
    println!("  est. draw calls   {}", last.total_draw_calls);
    println!("  est. memory       {} B", last.total_memory_usage);

    if let Some(optimizer) = renderer.optimizer() {
        let analysis = optimizer.analyze();
        println!();
        println!("  over the last {} frames:", analysis.frames);
        println!("    avg draw calls          {:.1}", analysis.avg_draw_calls);
        println!("    vertices / draw call    {:.1}", analysis.avg_vertices_per_draw_call);
        println!("    batch utilization       {:.1}%", analysis.batch_utilization * 100.0);
        println!("    texture binds / call    {:.2}", analysis.texture_bind_ratio);
        if analysis.suggestions.is_empty() {
            println!("    no suggestions");
        }
        for suggestion in &analysis.suggestions {
            println!("    {suggestion}");
        }
    }
    println!();

    Ok(())
}

/// Deterministic mix of every shape kind spread over a canvas twice the
/// viewport's width, using a handful of textures and fills.
fn scene(shapes: usize, seed: u64, frame: u32) -> Vec<RenderCommand> {
    let palette = [
        Color::from_hex(0x1f77b4ff),
        Color::from_hex(0xff7f0eff),
        Color::from_hex(0x2ca02cff),
        Color::from_hex(0xd62728ff),
    ];
    // The layout changes once per second of frames.
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(frame / 60));

    (0..shapes)
        .map(|i| {
            let x = rng.gen_range(0.0..CANVAS_W * 2.0);
            let y = rng.gen_range(0.0..CANVAS_H);
            let z = ZIndex(rng.gen_range(0..8));
            let fill = palette[i % palette.len()];

            match i % 6 {
                0 | 1 => RenderCommand::solid_quad(z, Rect::new(x, y, 24.0, 16.0), fill),
                2 => RenderCommand::quad(
                    z,
                    Rect::new(x, y, 32.0, 32.0),
                    MaterialKey::solid(Color::white()).with_texture(TextureId(rng.gen_range(0..3))),
                ),
                3 => RenderCommand::solid_circle(z, Vec2::new(x, y), rng.gen_range(6.0..26.0), fill),
                4 => RenderCommand::path(
                    z,
                    vec![Vec2::new(x, y), Vec2::new(x + 30.0, y + 5.0), Vec2::new(x + 12.0, y + 28.0)],
                    true,
                    MaterialKey::new().with_stroke(Color::black(), 1.5),
                ),
                _ => RenderCommand::text(
                    z.above(),
                    TextCmd::new(format!("node {i}"), Vec2::new(x, y), 12.0),
                    MaterialKey::solid(Color::black()),
                ),
            }
        })
        .collect()
}
