use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use puppetry::{
    EXPRESSION_FILE_SUFFIX, Expression, FrameView, InMemoryModel, ModelOpts, ModelRuntime,
    PropertyValue, RenderResources, ShaderLibrary, TextureHandle, UserModel, build_render_graph,
};

#[derive(Parser, Debug)]
#[command(name = "puppetry", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the render graph built for a model as JSON.
    Inspect(InspectArgs),
    /// Run frames with expressions toggled and print the final state as JSON.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input model JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input model JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Expression files, or directories scanned for `*.exp3.json`.
    #[arg(long = "expressions")]
    expressions: Vec<PathBuf>,

    /// Expression to turn on, as `name` or `name:fade_seconds`.
    #[arg(long = "activate")]
    activate: Vec<String>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Model options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

/// One texture handle per index the model references.
fn texture_table(model: &InMemoryModel) -> anyhow::Result<Vec<TextureHandle>> {
    let mut count = 0usize;
    for d in &model.drawables {
        let needed = d
            .texture_index
            .checked_add(1)
            .with_context(|| format!("drawable '{}' texture index overflows", d.id))?;
        count = count.max(needed);
    }
    let count = u32::try_from(count).with_context(|| {
        format!("model references {count} textures, more than a u32 handle holds")
    })?;
    Ok((0..count).map(TextureHandle).collect())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let model = InMemoryModel::from_path(&args.in_path)?;
    let shaders = ShaderLibrary::sequential();
    let textures = texture_table(&model)?;
    let graph = build_render_graph(
        &model,
        &RenderResources {
            shaders: &shaders,
            textures: &textures,
        },
    )?;

    let meshes: Vec<_> = graph
        .meshes()
        .iter()
        .map(|m| {
            let viewport = graph.viewport_of(m).map(|vp| {
                let masks: Vec<_> = vp
                    .masks
                    .iter()
                    .filter_map(|mask| model.drawable(mask.drawable).map(|d| d.id))
                    .collect();
                json!({ "target": vp.target.0, "size": [vp.size.0, vp.size.1], "masks": masks })
            });
            json!({
                "id": m.id,
                "shader": m.material.variant,
                "z_index": m.z_index,
                "visible": m.visible,
                "viewport": viewport,
            })
        })
        .collect();

    let out = json!({ "canvas": graph.canvas(), "meshes": meshes });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn load_expressions(paths: &[PathBuf]) -> anyhow::Result<Vec<Expression>> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(path)
                .with_context(|| format!("read expression dir '{}'", path.display()))?
            {
                let p = entry?.path();
                if is_expression_file(&p) {
                    files.push(p);
                }
            }
            files.sort();
            for f in files {
                out.push(Expression::from_path(&f)?);
            }
        } else {
            out.push(Expression::from_path(path)?);
        }
    }
    Ok(out)
}

fn is_expression_file(p: &Path) -> bool {
    p.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(EXPRESSION_FILE_SUFFIX))
}

fn parse_activation(s: &str) -> anyhow::Result<(&str, Option<f32>)> {
    match s.rsplit_once(':') {
        Some((name, fade)) => {
            let fade: f32 = fade
                .parse()
                .with_context(|| format!("invalid fade in '--activate {s}'"))?;
            if !fade.is_finite() || fade < 0.0 {
                anyhow::bail!("fade in '--activate {s}' must be finite and >= 0");
            }
            Ok((name, Some(fade)))
        }
        None => Ok((s, None)),
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let opts = match &args.config {
        Some(p) => ModelOpts::from_path(p)?,
        None => ModelOpts::default(),
    };
    let model = InMemoryModel::from_path(&args.in_path)?;
    let canvas = model.canvas;
    let shaders = ShaderLibrary::sequential();
    let textures = texture_table(&model)?;

    let mut user = UserModel::new(opts)?;
    for e in load_expressions(&args.expressions)? {
        user.insert_expression(e);
    }
    user.bind(
        Box::new(model),
        &RenderResources {
            shaders: &shaders,
            textures: &textures,
        },
    )?;

    for a in &args.activate {
        let (name, fade) = parse_activation(a)?;
        if user.expressions().get(name).is_none() {
            anyhow::bail!("unknown expression '{name}'");
        }
        match fade {
            Some(f) => user.expressions_mut().activate(name, f),
            None => {
                user.set_property(name, PropertyValue::Bool(true));
            }
        }
    }

    let view = FrameView::for_canvas(&canvas);
    for _ in 0..args.ticks {
        user.advance(args.dt, &view);
    }

    let runtime = user
        .runtime()
        .context("model was unbound during simulation")?;
    let parameters: serde_json::Map<String, serde_json::Value> = (0..runtime.parameter_count())
        .filter_map(|i| {
            runtime
                .parameter_info(i)
                .map(|p| (p.id.to_owned(), json!(runtime.parameter_value(i))))
        })
        .collect();

    let graph = user
        .render_graph()
        .context("model was unbound during simulation")?;
    let viewports: Vec<_> = graph
        .viewports()
        .iter()
        .map(|vp| {
            json!({
                "owner": graph.meshes().get(vp.owner).map(|m| m.id.as_str()),
                "size": [vp.size.0, vp.size.1],
            })
        })
        .collect();
    let active: Vec<_> = user
        .expressions()
        .expression_names()
        .filter(|n| user.expressions().is_active(n))
        .collect();

    let out = json!({
        "parameters": parameters,
        "active_expressions": active,
        "viewports": viewports,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
