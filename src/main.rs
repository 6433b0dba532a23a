use std::env;
use std::error::Error;
use std::time::Instant;

use sdl2::{
    event::{Event, WindowEvent},
    gfx::framerate::FPSManager,
    keyboard::Keycode,
    pixels::PixelFormatEnum,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pyramids::config::ViewerConfig;
use pyramids::frame::{handle_key, Command, FrameState, Tick, KEY_ESCAPE};
use pyramids::geometry::Fractal;
use pyramids::render::{Renderer, View};
use pyramids::scene::build_frame_into;

fn load_config() -> Result<ViewerConfig, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            Ok(ViewerConfig::load(&path)?)
        }
        None => {
            info!("no config given, using defaults");
            Ok(ViewerConfig::default())
        }
    }
}

fn title(config: &ViewerConfig, state: &FrameState) -> String {
    format!("{} [{}x{}]", config.window.title, state.slices, state.stacks)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let fractal = Fractal::new(config.fractal.threshold, config.fractal.style);
    info!(
        placements = config.lattice.placement_count(),
        triangles = config.lattice.triangle_count(&fractal),
        "scene ready"
    );

    let ctx = sdl2::init()?;
    let video = ctx.video()?;
    let mut window = video
        .window(&config.window.title, config.window.width, config.window.height)
        .position(config.window.x, config.window.y)
        .resizable()
        .build()?;

    let mut state = FrameState::default();
    window.set_title(&title(&config, &state))?;

    let mut canvas = window.into_canvas().accelerated().build()?;
    let texture_creator = canvas.texture_creator();
    let (width, height) = canvas.output_size()?;

    let mut renderer = Renderer::new(width, height);
    let mut texture = texture_creator.create_texture_streaming(PixelFormatEnum::RGB24, width, height)?;

    let mut fps = FPSManager::new();
    fps.set_framerate(config.framerate)?;

    let mut triangles = Vec::new();
    let mut events = ctx.event_pump()?;
    let start = Instant::now();

    'mainloop: loop {
        for event in events.poll_iter() {
            let key = match event {
                Event::Quit { .. } => break 'mainloop,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => KEY_ESCAPE,
                Event::TextInput { text, .. } => match text.as_bytes() {
                    [key] if key.is_ascii() => *key,
                    _ => continue,
                },
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = canvas.output_size()?;
                    // Minimized windows report an empty drawable.
                    if width > 0 && height > 0 {
                        info!(width, height, "resized");
                        renderer.resize(width, height);
                        texture = texture_creator.create_texture_streaming(PixelFormatEnum::RGB24, width, height)?;
                    }
                    continue;
                }
                _event => continue,
            };

            let before = state;
            if handle_key(&mut state, key) == Command::Quit {
                break 'mainloop;
            }
            if state != before {
                canvas.window_mut().set_title(&title(&config, &state))?;
            }
        }

        let now = Instant::now();
        let tick = Tick::at(start.elapsed().as_secs_f64(), &config.animation);
        let aspect = f64::from(renderer.width()) / f64::from(renderer.height().max(1));
        let view = View::new(&config, &tick, aspect);

        build_frame_into(&config.lattice, &fractal, &mut triangles);
        let built = now.elapsed();
        let drawn = renderer.render(&triangles, &view);

        texture.update(None, renderer.pixels(), renderer.width() as usize * 3)?;
        canvas.clear();
        canvas.copy(&texture, None, None)?;
        canvas.present();

        debug!(
            angle = tick.angle,
            fog = tick.fog_density,
            triangles = triangles.len(),
            drawn,
            build_ms = built.as_secs_f64() * 1e3,
            frame_ms = now.elapsed().as_secs_f64() * 1e3,
            "frame"
        );
        fps.delay();
    }

    info!("bye");
    Ok(())
}
