use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use feigenbrot::attractor::AttractorMap;
use feigenbrot::config::{parse_colours, parse_complex, parse_pair, parse_palette};
use feigenbrot::kernel::Sign;
use feigenbrot::output::write_png;
use feigenbrot::scan::{ScanFunction, ScanPlot};
use feigenbrot::{
    AttractorConfig, FractalError, PaletteRegistry, PixelConfig, Result, Rgb, ScanConfig,
    SurfaceConfig,
};
use std::str::FromStr;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> std::result::Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> std::result::Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> std::result::Result<(), String> {
    T::from_str(s).map(|_| ()).map_err(|_| err.to_string())
}

fn validate_colours(s: &str) -> std::result::Result<(), String> {
    parse_colours(s).map(|_| ()).map_err(|e| e.to_string())
}

const OUTPUT: &str = "output";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const SIZE: &str = "size";
const XRANGE: &str = "xrange";
const YRANGE: &str = "yrange";
const YMIN: &str = "ymin";
const YMAX: &str = "ymax";
const RATIO: &str = "ratio";
const LIMIT: &str = "limit";
const SEED: &str = "seed";
const MINUS: &str = "minus";
const POWER: &str = "power";
const ROOTS: &str = "roots";
const PALETTE: &str = "palette";
const PALETTE_LENGTH: &str = "palette-length";
const CONTOURS: &str = "contours";
const CONTOUR_COLOURS: &str = "contour-colours";
const RED_FIELD: &str = "red-field";
const SET: &str = "set";
const INFINITY: &str = "infinity";
const DEFAULT: &str = "default";
const ANGLES: &str = "angles";
const NO_LINES: &str = "no-lines";
const KRANGE: &str = "krange";
const PRANGE: &str = "prange";
const P0: &str = "p0";
const IGNORE: &str = "ignore";
const FUNCTION: &str = "function";
const RETURN_MAP: &str = "return-map";
const COLOURS: &str = "colours";
const CONSTANTS: &str = "constants";
const PHASE: &str = "phase";
const KICKS: &str = "kicks";
const KICK: &str = "kick";
const COLOUR: &str = "colour";

fn iterations() -> Arg<'static, 'static> {
    Arg::with_name(ITERATIONS)
        .long(ITERATIONS)
        .short("i")
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                2,
                feigenbrot::config::ABSURD_ITER,
                "Could not parse iteration count",
                "Iteration count must be between 2 and 10000",
            )
        })
        .help("Maximum iterations per pixel, column or orbit")
}

fn float_pair(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_pair::<f64>(&s, ',', "Please enter two numbers separated by a comma"))
        .help(help)
}

fn float(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_number::<f64>(&s, "Please enter a number"))
        .help(help)
}

fn count(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .validator(|s| validate_number::<usize>(&s, "Please enter a whole number"))
        .help(help)
}

fn colour(name: &'static str, help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .validator(|s| validate_colours(&s))
        .help(help)
}

fn size() -> Arg<'static, 'static> {
    Arg::with_name(SIZE)
        .long(SIZE)
        .short("s")
        .takes_value(true)
        .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
        .help("Size of output image, WIDTHxHEIGHT")
}

fn pixel_args(name: &str, about: &'static str) -> App<'static, 'static> {
    SubCommand::with_name(name)
        .about(about)
        .arg(iterations())
        .arg(count(WIDTH, "Image width").short("w"))
        .arg(count(HEIGHT, "Image height; derived from the ratio if absent"))
        .arg(float_pair(XRANGE, "Real extent of the window, START,END"))
        .arg(float(YMIN, "Bottom of the window"))
        .arg(float(YMAX, "Top of the window; derived from the ratio if absent"))
        .arg(float(RATIO, "Image height over width"))
        .arg(float(LIMIT, "Squared escape radius, or the convergence epsilon"))
        .arg(float_pair(SEED, "Seed value, RE,IM"))
        .arg(
            Arg::with_name(MINUS)
                .long(MINUS)
                .help("Subtract the constant instead of adding it"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .help("Contour palette name, or hex colours separated by commas"),
        )
        .arg(count(PALETTE_LENGTH, "Length of the grayscale ramp for unknown palettes"))
        .arg(count(CONTOURS, "Number of contour bands to show"))
        .arg(colour(CONTOUR_COLOURS, "Hex colours replacing the first palette entries"))
        .arg(
            Arg::with_name(RED_FIELD)
                .long(RED_FIELD)
                .help("Colour escapes with the red field"),
        )
        .arg(colour(SET, "Hex colour for the set"))
        .arg(colour(INFINITY, "Hex colour for escapes"))
        .arg(colour(DEFAULT, "Hex colour for points that settle on nothing"))
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("feigenbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time, root-basin and bifurcation diagram renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use for pixel-per-value renders"),
        )
        .subcommand(pixel_args("mandelbrot", "The Mandelbrot set"))
        .subcommand(pixel_args("julia", "A Julia set"))
        .subcommand(
            pixel_args("power", "The Mandelbrot set under a real power")
                .arg(float(POWER, "Exponent")),
        )
        .subcommand(pixel_args("magnet", "The first magnetism model"))
        .subcommand(
            pixel_args("newton", "Newton basins of the roots of unity").arg(
                Arg::with_name(ROOTS)
                    .long(ROOTS)
                    .short("n")
                    .takes_value(true)
                    .validator(|s| {
                        validate_range(&s, 2u32, 64, "Could not parse root count", "Root count must be between 2 and 64")
                    })
                    .help("Number of roots"),
            ),
        )
        .subcommand(
            pixel_args("sphere", "The Mandelbrot set on the Riemann sphere")
                .arg(float_pair(ANGLES, "Latitude and longitude turns, in degrees"))
                .arg(Arg::with_name(NO_LINES).long(NO_LINES).help("Leave out the great circles")),
        )
        .subcommand(
            SubCommand::with_name("feigenbaum")
                .about("Bifurcation diagram of a real map")
                .arg(iterations())
                .arg(size())
                .arg(float_pair(KRANGE, "Parameter sweep, START,END"))
                .arg(float_pair(PRANGE, "Vertical extent, START,END"))
                .arg(float(P0, "Starting value"))
                .arg(count(IGNORE, "Settling iterations"))
                .arg(
                    Arg::with_name(FUNCTION)
                        .long(FUNCTION)
                        .short("f")
                        .takes_value(true)
                        .possible_values(&["logistic", "quadratic", "trigonometric", "verhulst"])
                        .help("The map to iterate"),
                )
                .arg(
                    Arg::with_name(RETURN_MAP)
                        .long(RETURN_MAP)
                        .help("Plot (p, f(p)) instead of (k, p)"),
                )
                .arg(colour(COLOURS, "Even and odd iteration colours, hex"))
                .arg(
                    Arg::with_name(PALETTE)
                        .long(PALETTE)
                        .short("p")
                        .takes_value(true)
                        .help("Colour from this palette, named or hex, instead of by parity"),
                )
                .arg(count(PALETTE_LENGTH, "Length of the grayscale ramp for unknown palettes")),
        )
        .subcommand(
            SubCommand::with_name("henon")
                .about("The Hénon attractor")
                .arg(iterations())
                .arg(size())
                .arg(float_pair(XRANGE, "Horizontal extent, START,END"))
                .arg(float_pair(YRANGE, "Vertical extent, START,END"))
                .arg(float_pair(SEED, "Starting point, X,Y"))
                .arg(count(IGNORE, "Settling iterations"))
                .arg(float_pair(CONSTANTS, "The constants a,b"))
                .arg(colour(COLOUR, "Hex drawing colour")),
        )
        .subcommand(
            SubCommand::with_name("orbiter")
                .about("Orbits of a rotated quadratic map")
                .arg(iterations())
                .arg(size())
                .arg(float_pair(XRANGE, "Horizontal extent, START,END"))
                .arg(float_pair(YRANGE, "Vertical extent, START,END"))
                .arg(float_pair(SEED, "First starting point, X,Y"))
                .arg(count(IGNORE, "Settling iterations"))
                .arg(float(PHASE, "Rotation, in radians"))
                .arg(count(KICKS, "Number of orbits"))
                .arg(float_pair(KICK, "Shift between starting points, DX,DY"))
                .arg(colour(COLOUR, "Hex drawing colour")),
        )
        .get_matches()
}

fn value<T: FromStr>(
    m: &ArgMatches,
    name: &str,
    err: fn(String) -> FractalError,
) -> Result<Option<T>> {
    match m.value_of(name) {
        None => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(|_| err(s.to_string())),
    }
}

fn pair<T: FromStr>(
    m: &ArgMatches,
    name: &str,
    separator: char,
    err: fn(String) -> FractalError,
) -> Result<Option<(T, T)>> {
    match m.value_of(name) {
        None => Ok(None),
        Some(s) => parse_pair(s, separator).map(Some).ok_or_else(|| err(s.to_string())),
    }
}

fn complex(m: &ArgMatches, name: &str) -> Result<Option<num::Complex<f64>>> {
    match m.value_of(name) {
        None => Ok(None),
        Some(s) => parse_complex(s).map(Some).ok_or_else(|| FractalError::Seed(s.to_string())),
    }
}

fn single_colour(m: &ArgMatches, name: &str) -> Result<Option<Rgb>> {
    match m.value_of(name) {
        None => Ok(None),
        Some(s) => Rgb::from_hex(s.trim()).map(Some),
    }
}

fn pixel_config(name: &str, m: &ArgMatches) -> Result<PixelConfig> {
    let mut config = match name {
        "julia" => PixelConfig::julia(),
        "power" => PixelConfig::power(),
        "magnet" => PixelConfig::magnet(),
        "newton" => PixelConfig::newton(),
        "sphere" => PixelConfig::sphere(),
        _ => PixelConfig::mandelbrot(),
    };
    if let Some(max_iter) = value(m, ITERATIONS, FractalError::Iterations)? {
        config.max_iter = max_iter;
        if let SurfaceConfig::Sphere { .. } = config.surface {
            config.contours = Some(max_iter);
        }
    }
    if let Some(width) = value(m, WIDTH, FractalError::Size)? {
        config.width = width;
    }
    if let Some(height) = value(m, HEIGHT, FractalError::Size)? {
        config.height = Some(height);
    }
    if let Some(x_range) = pair(m, XRANGE, ',', FractalError::Bounds)? {
        config.x_range = x_range;
    }
    if let Some(y_min) = value(m, YMIN, FractalError::Bounds)? {
        config.y_min = y_min;
    }
    if let Some(y_max) = value(m, YMAX, FractalError::Bounds)? {
        config.y_max = Some(y_max);
    }
    if let Some(ratio) = value(m, RATIO, FractalError::Size)? {
        config.ratio = ratio;
    }
    if let Some(limit) = value(m, LIMIT, FractalError::Parameter)? {
        config.limit = limit;
    }
    if let Some(seed) = complex(m, SEED)? {
        config.seed = seed;
    }
    if m.is_present(MINUS) {
        config.sign = Sign::Minus;
    }
    if let Some(power) = value(m, POWER, FractalError::Parameter)? {
        config.power = power;
    }
    if let Some(degree) = value(m, ROOTS, FractalError::Parameter)? {
        config.degree = degree;
    }
    if let Some(palette) = m.value_of(PALETTE) {
        config.palette = palette.to_string();
    }
    if let Some(length) = value(m, PALETTE_LENGTH, FractalError::Parameter)? {
        config.palette_length = length;
    }
    if let Some(contours) = value(m, CONTOURS, FractalError::Contours)? {
        config.contours = Some(contours);
    }
    if let Some(overrides) = m.value_of(CONTOUR_COLOURS) {
        config.contour_overrides = parse_colours(overrides)?;
    }
    config.red_field = m.is_present(RED_FIELD);
    if let Some(set) = single_colour(m, SET)? {
        config.set = set;
    }
    if let Some(infinity) = single_colour(m, INFINITY)? {
        config.infinity = infinity;
    }
    if let Some(default) = single_colour(m, DEFAULT)? {
        config.default = default;
    }
    if let SurfaceConfig::Sphere {
        ref mut x_angle,
        ref mut z_angle,
        ref mut grid_lines,
    } = config.surface
    {
        if let Some((x, z)) = pair(m, ANGLES, ',', FractalError::Parameter)? {
            *x_angle = x;
            *z_angle = z;
        }
        *grid_lines = !m.is_present(NO_LINES);
    }
    Ok(config)
}

fn scan_config(m: &ArgMatches) -> Result<ScanConfig> {
    let mut config = ScanConfig::feigenbaum();
    if let Some(max_iter) = value(m, ITERATIONS, FractalError::Iterations)? {
        config.max_iter = max_iter;
    }
    if let Some((width, height)) = pair(m, SIZE, 'x', FractalError::Size)? {
        config.width = width;
        config.height = height;
    }
    if let Some(k_range) = pair(m, KRANGE, ',', FractalError::Bounds)? {
        config.k_range = k_range;
    }
    if let Some(p_range) = pair(m, PRANGE, ',', FractalError::Bounds)? {
        config.p_range = p_range;
    }
    if let Some(p0) = value(m, P0, FractalError::Seed)? {
        config.p0 = p0;
    }
    if let Some(ignore) = value(m, IGNORE, FractalError::Parameter)? {
        config.ignore = ignore;
    }
    config.function = match m.value_of(FUNCTION) {
        Some("quadratic") => ScanFunction::Quadratic,
        Some("trigonometric") => ScanFunction::Trigonometric,
        Some("verhulst") => ScanFunction::Verhulst,
        _ => ScanFunction::Logistic,
    };
    if m.is_present(RETURN_MAP) {
        config.mode = ScanPlot::ReturnMap;
    }
    if let Some(colours) = m.value_of(COLOURS) {
        match parse_colours(colours)?.as_slice() {
            [even, odd] => {
                config.even = *even;
                config.odd = *odd;
            }
            _ => return Err(FractalError::Colour(colours.to_string())),
        }
    }
    if let Some(palette) = m.value_of(PALETTE) {
        config.palette = Some(palette.to_string());
    }
    if let Some(length) = value(m, PALETTE_LENGTH, FractalError::Parameter)? {
        config.palette_length = length;
    }
    Ok(config)
}

fn attractor_config(name: &str, m: &ArgMatches) -> Result<AttractorConfig> {
    let mut config = match name {
        "orbiter" => AttractorConfig::orbiter(),
        _ => AttractorConfig::henon(),
    };
    if let Some(max_iter) = value(m, ITERATIONS, FractalError::Iterations)? {
        config.max_iter = max_iter;
    }
    if let Some((width, height)) = pair(m, SIZE, 'x', FractalError::Size)? {
        config.width = width;
        config.height = height;
    }
    if let Some(x_range) = pair(m, XRANGE, ',', FractalError::Bounds)? {
        config.x_range = x_range;
    }
    if let Some(y_range) = pair(m, YRANGE, ',', FractalError::Bounds)? {
        config.y_range = y_range;
    }
    if let Some(seed) = complex(m, SEED)? {
        config.seed = seed;
    }
    if let Some(ignore) = value(m, IGNORE, FractalError::Parameter)? {
        config.ignore = ignore;
    }
    if let Some((a, b)) = pair(m, CONSTANTS, ',', FractalError::Parameter)? {
        config.map = AttractorMap::Henon { a, b };
    }
    if let Some(w) = value(m, PHASE, FractalError::Parameter)? {
        config.map = AttractorMap::Orbiter { w };
    }
    if let Some(kicks) = value(m, KICKS, FractalError::Parameter)? {
        config.kicks = kicks;
    }
    if let Some(kick) = complex(m, KICK)? {
        config.kick = kick;
    }
    if let Some(colour) = single_colour(m, COLOUR)? {
        config.colour = colour;
    }
    Ok(config)
}

// A `--palette` that names no stock palette but reads as hex colours is
// registered under its own text.
fn palettes(m: &ArgMatches) -> Result<PaletteRegistry> {
    let registry = PaletteRegistry::builtin();
    match m.value_of(PALETTE) {
        Some(name) if !registry.contains(name) && name.contains(',') => {
            let palette = parse_palette(name)?;
            Ok(registry.with(name, palette))
        }
        _ => Ok(registry),
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let threads = value(matches, THREADS, FractalError::Parameter)?.unwrap_or(1);
    let (name, sub) = match matches.subcommand() {
        (name, Some(sub)) => (name, sub),
        (_, None) => return Err(FractalError::Parameter("no family given".to_string())),
    };
    let registry = palettes(sub)?;
    let raster = match name {
        "feigenbaum" => scan_config(sub)?.build(&registry)?.render().0,
        "henon" | "orbiter" => attractor_config(name, sub)?.build()?.render().0,
        _ => pixel_config(name, sub)?.build(&registry)?.render(threads)?.0,
    };
    let path = matches.value_of(OUTPUT).unwrap_or("feigenbrot.png");
    write_png(path, &raster).map_err(|e| {
        warn!(path, error = %e, "Couldn't save file");
        e
    })
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = args();
    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}
