// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate deepbrot;
extern crate env_logger;
extern crate failure;
extern crate image;
extern crate log;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use deepbrot::precision::{self, parse_real, required_precision, MIN_PRECISION};
use deepbrot::{intensities, BigComplex, PlaneMapper, PlaneRenderer, Silent};
use failure::{format_err, Error};
use image::png::PNGEncoder;
use image::ColorType;
use log::info;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<usize>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Ok(()),
        Some(_) => Err("Image width and height must both be at least 1".to_string()),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
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

// Only the syntax is checked here; the value is parsed again once the
// working precision is known.
fn validate_real(s: &str, err: &str) -> Result<(), String> {
    parse_real(s, MIN_PRECISION)
        .map(|_| ())
        .map_err(|_| err.to_string())
}

fn validate_span(s: &str) -> Result<(), String> {
    match parse_real(s, MIN_PRECISION) {
        Ok(span) if span > precision::zero(MIN_PRECISION) => Ok(()),
        Ok(_) => Err("The span of the region must be greater than zero".to_string()),
        Err(_) => Err("Could not parse the span of the region".to_string()),
    }
}

fn validate_julia(s: &str) -> Result<(), String> {
    match parse_pair::<String>(s, ',') {
        Some((re, im)) => {
            validate_real(&re, "Could not parse the real part of the Julia constant")?;
            validate_real(&im, "Could not parse the imaginary part of the Julia constant")
        }
        None => Err("The Julia constant must be written RE,IM".to_string()),
    }
}

const OUTPUT: &str = "output";
const XMIN: &str = "xmin";
const YMIN: &str = "ymin";
const XSPAN: &str = "xspan";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const JULIA: &str = "julia";
const THREADS: &str = "threads";
const PRECISION: &str = "precision";
const QUIET: &str = "quiet";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("deepbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Arbitrary-precision Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("output.png")
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(XMIN)
                .long(XMIN)
                .short("x")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2")
                .validator(|s| validate_real(&s, "Could not parse the minimum value of x"))
                .help("Minimum value of x (the real axis)"),
        )
        .arg(
            Arg::with_name(YMIN)
                .long(YMIN)
                .short("y")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2")
                .validator(|s| validate_real(&s, "Could not parse the minimum value of y"))
                .help("Minimum value of y (the imaginary axis)"),
        )
        .arg(
            Arg::with_name(XSPAN)
                .long(XSPAN)
                .short("w")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("4")
                .validator(|s| validate_span(&s))
                .help("Width of the region along the real axis"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1000x1000")
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 100000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(JULIA)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_julia(&s))
                .help("Render the Julia set for the constant RE,IM"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(PRECISION)
                .long(PRECISION)
                .short("p")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        MIN_PRECISION,
                        1 << 20,
                        "Could not parse precision",
                        &format!("Precision must be between {} and {} bits", MIN_PRECISION, 1 << 20),
                    )
                })
                .help("Working precision in bits (default: chosen from the zoom depth)"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .help("Do not report progress"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = parse_pair::<usize>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let iterations = usize::from_str(value(matches, ITERATIONS)?)?;
    let threads = match matches.value_of(THREADS) {
        Some(t) => usize::from_str(t)?,
        None => num_cpus::get(),
    };
    let (x_min, y_min, x_span) = (
        value(matches, XMIN)?,
        value(matches, YMIN)?,
        value(matches, XSPAN)?,
    );

    let precision = match matches.value_of(PRECISION) {
        Some(p) => usize::from_str(p)?,
        None => required_precision(
            &parse_real(x_min, MIN_PRECISION)?,
            &parse_real(y_min, MIN_PRECISION)?,
            &parse_real(x_span, MIN_PRECISION)?,
            width,
            height,
            iterations,
        ),
    };
    info!("working precision: {} bits", precision);

    let julia = match matches.value_of(JULIA) {
        Some(pair) => {
            let (re, im) = parse_pair::<String>(pair, ',')
                .ok_or_else(|| format_err!("Error parsing the Julia constant"))?;
            Some(BigComplex::new(
                parse_real(&re, precision)?,
                parse_real(&im, precision)?,
            ))
        }
        None => None,
    };

    let plane = PlaneMapper::new(
        parse_real(x_min, precision)?,
        parse_real(y_min, precision)?,
        parse_real(x_span, precision)?,
        width,
        height,
    )?;
    let renderer = PlaneRenderer::new(plane, iterations, julia)?;

    info!(
        "rendering {}x{}, {} iterations, {} threads{}",
        width,
        height,
        iterations,
        threads,
        if matches.is_present(JULIA) { ", julia" } else { "" }
    );
    let started = Instant::now();
    let grid = if matches.is_present(QUIET) {
        renderer.render(threads, &Silent)?
    } else {
        let report = |done: usize, total: usize| eprint!("Computing row {}/{}\r", done, total);
        let grid = renderer.render(threads, &report)?;
        eprintln!();
        grid
    };
    info!("render finished in {:.2?}", started.elapsed());

    let output = value(matches, OUTPUT)?;
    write_image(output, &intensities(&grid), (width, height))?;
    info!("wrote {}", output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
