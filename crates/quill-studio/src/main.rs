use anyhow::{Context, Result};
use quill_engine::coords::Viewport;
use quill_engine::device::{Gpu, GpuInit};
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::paint::Color;
use quill_engine::render::{GpuImage, Renderer, RendererConfig, ShapeKind, WgpuDevice};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = pollster::block_on(Gpu::new_headless(GpuInit::default()))?;
    let viewport = Viewport::new(WIDTH as f32, HEIGHT as f32);

    let device = WgpuDevice::new(&gpu.render_ctx());
    let mut renderer =
        Renderer::new(device, RendererConfig::default()).context("failed to create renderer")?;
    renderer.set_viewport(viewport);

    let checker = checkerboard(&mut renderer, 8)?;
    let stripes = stripes(&mut renderer, 16)?;

    let mut frame = gpu.begin_offscreen(WIDTH, HEIGHT)?;
    frame.clear(wgpu::Color {
        r: 0.08,
        g: 0.08,
        b: 0.1,
        a: 1.0,
    });

    draw_scene(&mut renderer, &checker, &stripes)?;
    let stats = renderer.flush();
    renderer.device_mut().encode(&mut frame.target());

    gpu.submit(frame);

    log::info!(
        "frame: {} fill vertices in {} batches, {} stroke vertices, {} draw calls",
        stats.fill.vertices,
        stats.fill.batches,
        stats.stroke.vertices,
        stats.draw_calls()
    );
    Ok(())
}

fn draw_scene(
    r: &mut Renderer<WgpuDevice>,
    checker: &GpuImage,
    stripes: &GpuImage,
) -> Result<()> {
    // Background grid.
    r.stroke(Color::gray(0.25));
    for x in (0..WIDTH).step_by(50) {
        r.line(x as f32, 0.0, x as f32, HEIGHT as f32);
    }
    for y in (0..HEIGHT).step_by(50) {
        r.line(0.0, y as f32, WIDTH as f32, y as f32);
    }

    // A row of rotated tiles.
    r.stroke(Color::WHITE);
    for i in 0..6 {
        let t = i as f32 / 5.0;
        r.push();
        r.translate(100.0 + i as f32 * 120.0, 120.0);
        r.rotate(t * std::f32::consts::FRAC_PI_2);
        r.fill(Color::rgb(t, 0.4, 1.0 - t));
        r.rect(-40.0, -40.0, 80.0, 80.0);
        r.pop()?;
    }

    // Images interleaved with solid fills break batches.
    r.no_stroke();
    r.image_sized(checker, 60.0, 240.0, 128.0, 128.0);
    r.image_sized(stripes, 220.0, 240.0, 128.0, 128.0);
    r.tint(Color::rgba(1.0, 0.8, 0.8, 0.75));
    r.image_sized(checker, 380.0, 240.0, 128.0, 128.0);
    r.no_tint();

    r.fill(Color::from_hex(0xf5a623));
    r.ellipse(640.0, 300.0, 140.0, 90.0);

    // Custom shape.
    r.stroke(Color::BLACK);
    r.fill(Color::rgba(0.2, 0.8, 0.4, 0.9));
    r.begin_shape(ShapeKind::Polygon);
    for k in 0..5 {
        let a = k as f32 / 5.0 * std::f32::consts::TAU;
        r.vertex(400.0 + 80.0 * a.cos(), 480.0 + 80.0 * a.sin());
    }
    r.end_shape(true);

    Ok(())
}

fn checkerboard(r: &mut Renderer<WgpuDevice>, size: u32) -> Result<GpuImage> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if (x + y) % 2 == 0 { 255 } else { 40 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Ok(r.device_mut().create_image(size, size, &pixels)?)
}

fn stripes(r: &mut Renderer<WgpuDevice>, size: u32) -> Result<GpuImage> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for _y in 0..size {
        for x in 0..size {
            let px: [u8; 4] = if (x / 2) % 2 == 0 {
                [220, 60, 60, 255]
            } else {
                [250, 250, 250, 255]
            };
            pixels.extend_from_slice(&px);
        }
    }
    Ok(r.device_mut().create_image(size, size, &pixels)?)
}
