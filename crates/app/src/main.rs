//! Entry point for Roomview.
//! Logging + CLI flags: GPU backend, window size, math backend, view distance.

use anyhow::Result;
use corelib::{MathBackend, camera::DEFAULT_VIEW_DISTANCE};
use platform::ViewerConfig;

fn parse_backend_arg(args: &[String]) -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_math_arg(args: &[String]) -> MathBackend {
    // --math=manual|glam, default glam
    let mut math = MathBackend::default();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--math=") {
            math = val.parse().unwrap_or_else(|err| {
                log::warn!("{err}; using {}.", MathBackend::default());
                MathBackend::default()
            });
        }
    }
    math
}

fn parse_view_distance_arg(args: &[String]) -> f64 {
    let mut distance = DEFAULT_VIEW_DISTANCE;
    for arg in args {
        if let Some(v) = arg.strip_prefix("--view-distance=") {
            match v.parse::<f64>() {
                Ok(d) if d.is_finite() => distance = d,
                _ => log::warn!("Invalid view distance '{}', keeping {}.", v, distance),
            }
        }
    }
    distance
}

fn parse_size_args(args: &[String]) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    // Square by default so the trackball circle fills the window.
    let ww = w.unwrap_or(800).max(1);
    let hh = h.unwrap_or(800).max(1);
    (ww, hh)
}

fn parse_config(args: &[String]) -> ViewerConfig {
    let (width, height) = parse_size_args(args);
    ViewerConfig {
        backends: parse_backend_arg(args),
        width,
        height,
        math: parse_math_arg(args),
        view_distance: parse_view_distance_arg(args),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_config(&args);
    log::info!(
        "Starting Roomview. Backend: {:?}, math={}, view_distance={}, window_size={}x{}",
        config.backends,
        config.math,
        config.view_distance,
        config.width,
        config.height
    );
    log::info!("Drag to rotate, 'M' toggles manual/glam matrices, Esc quits.");

    platform::run_viewer(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
