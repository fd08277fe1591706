use anyhow::{anyhow, bail};
use approx::relative_eq;
use clap::Parser;
use log::{error, info};
use rayon::prelude::*;
use skin2d_model::{Pose, PoseBlend, SkinnedMesh, SkinningContext, demo};

#[derive(Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// The number of evenly spaced cursor positions to sample.
    #[arg(long, default_value_t = 64)]
    steps: usize,
    /// The maximum difference allowed when comparing positions.
    #[arg(long, default_value_t = 0.0001)]
    tolerance: f32,
}

fn check_assets() -> anyhow::Result<(SkinningContext, SkinnedMesh)> {
    let context = demo::context()?;
    let mesh = demo::mesh()?;

    if context.poses().len() != demo::POSE_NAMES.len() {
        bail!(
            "expected {} poses but found {}",
            demo::POSE_NAMES.len(),
            context.poses().len()
        );
    }
    if context.bind_pose().len() != demo::JOINT_COUNT {
        bail!(
            "expected {} joints but found {}",
            demo::JOINT_COUNT,
            context.bind_pose().len()
        );
    }

    Ok((context, mesh))
}

fn check_identity_bind(
    context: &SkinningContext,
    mesh: &SkinnedMesh,
    tolerance: f32,
) -> anyhow::Result<()> {
    // The context starts in the bind pose, so skinning should not move any vertex.
    let skinned = context.skin_mesh(mesh)?;
    for (i, (vertex, skinned)) in mesh.vertices().iter().zip(&skinned).enumerate() {
        let expected = vertex.position.extend(0.0).extend(1.0);
        if !relative_eq!(expected, skinned.position, epsilon = tolerance) {
            bail!(
                "vertex {i} moved from {expected} to {} in the bind pose",
                skinned.position
            );
        }
    }
    Ok(())
}

fn check_interpolation_boundaries(context: &SkinningContext) -> anyhow::Result<()> {
    for (i, pair) in context.poses().windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        if &Pose::interpolate(a, b, 0.0)? != a {
            bail!("blending poses {i} and {} at 0.0 does not match pose {i}", i + 1);
        }
        if &Pose::interpolate(a, b, 1.0)? != b {
            bail!(
                "blending poses {i} and {} at 1.0 does not match pose {}",
                i + 1,
                i + 1
            );
        }
    }
    Ok(())
}

fn check_blend_sweep(
    context: &SkinningContext,
    mesh: &SkinnedMesh,
    steps: usize,
) -> anyhow::Result<()> {
    let pose_count = context.poses().len();

    // Each sample only reads the shared data, so samples can run in parallel.
    let failures: Vec<_> = (0..steps)
        .into_par_iter()
        .filter_map(|step| {
            let x = step as f32 / steps.saturating_sub(1).max(1) as f32;
            let mut context = context.clone();
            if let Err(e) = context.update_pose(PoseBlend::from_cursor(x, pose_count)) {
                return Some(format!("x = {x}: {e}"));
            }

            match context.skin_mesh(mesh) {
                Ok(vertices) => vertices
                    .iter()
                    .position(|v| !v.position.is_finite() || !v.color.is_finite())
                    .map(|i| format!("x = {x}: vertex {i} is not finite")),
                Err(e) => Some(format!("x = {x}: {e}")),
            }
        })
        .collect();

    for failure in &failures {
        error!("{failure}");
    }

    match failures.len() {
        0 => Ok(()),
        count => Err(anyhow!("{count} of {steps} samples failed")),
    }
}

fn run_check(name: &str, check: impl FnOnce() -> anyhow::Result<()>) -> bool {
    let start = std::time::Instant::now();
    match check() {
        Ok(()) => {
            info!("{name}: ok ({:?})", start.elapsed());
            true
        }
        Err(e) => {
            error!("{name}: {e} ({:?})", start.elapsed());
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let cli = Cli::parse();

    let start = std::time::Instant::now();

    let (context, mesh) = check_assets()?;
    info!("asset validation: ok ({:?})", start.elapsed());
    info!(
        "Checking {} poses, {} joints, {} vertices",
        context.poses().len(),
        context.bind_pose().len(),
        mesh.vertices().len()
    );

    let results = [
        run_check("identity bind", || {
            check_identity_bind(&context, &mesh, cli.tolerance)
        }),
        run_check("interpolation boundaries", || {
            check_interpolation_boundaries(&context)
        }),
        run_check("blend sweep", || check_blend_sweep(&context, &mesh, cli.steps)),
    ];

    info!("Finished in {:?}", start.elapsed());

    let failed = results.iter().filter(|passed| !**passed).count();
    if failed > 0 {
        bail!("{failed} checks failed");
    }
    Ok(())
}
