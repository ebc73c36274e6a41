use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{arg, value_parser, ArgMatches, Command};
use dial::raster::Canvas;
use dial::{
    palette, AngularConfig, ArcColors, ArcColorsProvider, Color, Gauge, GaugeConfig,
    GaugeNumerics, TickConfig, ValueRange,
};
use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use rand::Rng;
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

const MAX_FRAMERATE: f64 = 60.0;
const LERP_FACTOR: f64 = 0.1;

fn cli() -> Command {
    Command::new("dial")
        .version(clap::crate_version!())
        .about("Draws a circular gauge fed with a randomly drifting value")
        .arg(
            arg!(--"min" <value> "Start of the value range")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("0"),
        )
        .arg(
            arg!(--"max" <value> "End of the value range")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("100"),
        )
        .arg(
            arg!(--"value" <value> "Initial value, defaults to the start of the range")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(--"start-angle" <degrees> "Start angle, 0 is 3 o'clock, clockwise")
                .value_parser(value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("120"),
        )
        .arg(
            arg!(--"sweep" <degrees> "Sweep angle, 1 to 360")
                .value_parser(value_parser!(i32))
                .allow_negative_numbers(true)
                .default_value("300"),
        )
        .arg(
            arg!(--"minor-step" <step> "Minor tick step")
                .value_parser(value_parser!(i32))
                .default_value("2"),
        )
        .arg(
            arg!(--"major-step" <step> "Major tick step")
                .value_parser(value_parser!(i32))
                .default_value("10"),
        )
        .arg(
            arg!(--"size" <pixels> "Window edge in logical pixels")
                .value_parser(value_parser!(u32).range(64..=4096))
                .default_value("400"),
        )
        .arg(arg!(--"unit" <unit> "Unit drawn under the value").default_value(""))
        .arg(arg!(--"font" <path> "TTF/OTF font for labels and value text"))
        .arg(arg!(--"banded" "Color the fill arc by value zones"))
        .arg(arg!(--"dump" "Print the composed primitives as JSON and exit"))
}

fn gauge_from_matches(matches: &ArgMatches) -> Gauge {
    let numerics = GaugeNumerics::builder()
        .value_range(ValueRange::new(
            *matches.get_one::<f64>("min").unwrap_or(&0.0),
            *matches.get_one::<f64>("max").unwrap_or(&100.0),
        ))
        .angles(AngularConfig::new(
            *matches.get_one::<i32>("start-angle").unwrap_or(&120),
            *matches.get_one::<i32>("sweep").unwrap_or(&300),
        ))
        .ticks(TickConfig::new(
            *matches.get_one::<i32>("minor-step").unwrap_or(&2),
            *matches.get_one::<i32>("major-step").unwrap_or(&10),
        ))
        .build();

    let unit = matches.get_one::<String>("unit").cloned().unwrap_or_default();
    let arc_colors_provider = matches.get_flag("banded").then(banded_arc_colors);
    Gauge::new(
        GaugeConfig::builder()
            .numerics(numerics)
            .value_unit(unit)
            .maybe_arc_colors_provider(arc_colors_provider)
            .build(),
    )
}

/// Red, yellow, orange and green quarters of the range.
fn banded_arc_colors() -> ArcColorsProvider {
    ArcColorsProvider::new(|colors: ArcColors, value: f64, range: ValueRange| {
        let on = if value <= range.end / 4.0 {
            Color::RED
        } else if value <= range.end / 2.0 {
            Color::YELLOW
        } else if value <= range.end * 3.0 / 4.0 {
            Color::ORANGE
        } else {
            Color::GREEN
        };
        ArcColors { on, ..colors }
    })
}

/// Random targets inside the range, approached by lerping every frame.
struct ValueFeed {
    range: ValueRange,
    current: f64,
    target: f64,
    frames_left: u32,
}

impl ValueFeed {
    fn new(range: ValueRange, initial: f64) -> Self {
        Self {
            range,
            current: initial,
            target: initial,
            frames_left: 0,
        }
    }

    fn step(&mut self) -> f64 {
        if self.frames_left == 0 {
            let mut rng = rand::rng();
            self.target = rng.random_range(self.range.start..=self.range.end);
            self.frames_left = rng.random_range(30..120);
        }
        self.frames_left -= 1;
        self.current += (self.target - self.current) * LERP_FACTOR;
        self.current = self.current.clamp(self.range.start, self.range.end);
        self.current
    }
}

fn load_font(path: &str) -> Result<Font<'static>, Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| format!("{path} is not a usable font").into())
}

fn run_window(
    gauge: Gauge,
    mut feed: ValueFeed,
    size: u32,
    font: Option<Font<'static>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("dial")
        .with_inner_size(LogicalSize::new(size as f64, size as f64))
        .with_resizable(false)
        .build(&event_loop)?;
    let window = Arc::new(window);

    let window_clone = window.clone();
    let inner = window.inner_size();
    let mut fb_width = inner.width as usize;
    let mut fb_height = inner.height as usize;
    let surface_texture = SurfaceTexture::new(inner.width, inner.height, &window);
    let mut pixels = Pixels::new(inner.width, inner.height, surface_texture)?;

    let frame_duration = Duration::from_secs_f64(1.0 / MAX_FRAMERATE);
    let mut last_frame = Instant::now();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                        error!("failed to resize buffer: {err}");
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        error!("failed to resize surface: {err}");
                    }
                }
                WindowEvent::RedrawRequested => {
                    let value = feed.step();
                    let edge = fb_width.min(fb_height) as f64;
                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                    if let Some(font) = font.as_ref() {
                        canvas = canvas.with_font(font);
                    }
                    canvas.clear(palette::BACKGROUND);
                    if let Err(err) = gauge.render(value, edge, &mut canvas) {
                        error!("cannot draw gauge: {err}");
                        window_target.exit();
                        return;
                    }
                    if let Err(err) = pixels.render() {
                        error!("failed to present frame: {err}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = cli().get_matches();
    let gauge = gauge_from_matches(&matches);
    let range = gauge.config().numerics.value_range;
    let initial = matches
        .get_one::<f64>("value")
        .copied()
        .unwrap_or(range.start);
    let size = *matches.get_one::<u32>("size").unwrap_or(&400);

    if matches.get_flag("dump") {
        let scene = gauge.compose(initial, size as f64)?;
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    // Fail before opening a window if the configuration can never draw.
    gauge.validate(initial)?;

    let font = match matches.get_one::<String>("font") {
        Some(path) => Some(load_font(path)?),
        None => {
            info!("no --font given, labels and value text will not be drawn");
            None
        }
    };

    info!("showing gauge over {range} starting at {initial}, {size}x{size}");
    run_window(gauge, ValueFeed::new(range, initial), size, font)
}
