use argh::FromArgs;
use std::path::PathBuf;

use edetect::image::{ops, Image};
use edetect::imgproc::filter::{
    GaussianBlurFilter, MarrHildrethConfig, MarrHildrethOperatorFilter, SobelOperatorFilter,
};
use edetect::imgproc::{normalize, Backend, Cpu, Filter, FilterError, Parallel};

#[derive(FromArgs)]
/// Run a chain of edge detection filters on a grayscale image
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// filter to apply: gaussian, sobel or marr-hildreth. Can be repeated
    #[argh(option, short = 'f')]
    filter: Vec<String>,

    /// kernel radius of the gaussian and marr-hildreth filters
    #[argh(option, short = 'r', default = "2")]
    radius: usize,

    /// largest marr-hildreth radius; runs every radius up to it when set
    #[argh(option)]
    radius_max: Option<usize>,

    /// zero-crossing threshold of the marr-hildreth filter
    #[argh(option, default = "1e-4")]
    threshold: f32,

    /// execution backend: cpu or parallel
    #[argh(option, short = 'b', default = "String::from(\"parallel\")")]
    backend: String,

    /// number of worker threads of the parallel backend
    #[argh(option)]
    threads: Option<usize>,
}

fn build_pipeline<B: Backend + 'static>(
    args: &Args,
    backend: B,
) -> Result<Vec<Box<dyn Filter>>, FilterError> {
    let mut pipeline: Vec<Box<dyn Filter>> = Vec::with_capacity(args.filter.len());

    for name in args.filter.iter() {
        let filter: Box<dyn Filter> = match name.to_lowercase().as_str() {
            "gaussian" => Box::new(
                GaussianBlurFilter::new(args.radius)?.with_backend(backend.clone()),
            ),
            "sobel" => Box::new(SobelOperatorFilter::new().with_backend(backend.clone())),
            "marr-hildreth" => {
                let radius_max = args.radius_max.unwrap_or(args.radius);
                let config = MarrHildrethConfig::new(args.radius)
                    .with_radius_range(args.radius, radius_max, 1)
                    .with_threshold(args.threshold);
                Box::new(MarrHildrethOperatorFilter::with_config(config)?.with_backend(backend.clone()))
            }
            other => {
                return Err(FilterError::InvalidParameter(format!(
                    "unknown filter {other}"
                )))
            }
        };
        pipeline.push(filter);
    }

    Ok(pipeline)
}

fn run<B: Backend + 'static>(args: &Args, backend: B, src: Image) -> Result<Image, FilterError> {
    log::info!(
        "running {:?} on the {} backend",
        args.filter,
        backend.name()
    );

    let mut pipeline = build_pipeline(args, backend.clone())?;

    let mut current = src;
    let mut next = current.zeros_like()?;
    for filter in pipeline.iter_mut() {
        filter.apply(&mut next, &current)?;
        std::mem::swap(&mut current, &mut next);
    }

    let mut out = current.zeros_like()?;
    normalize::normalize_min_max(&backend, &current, &mut out, 0.0, 255.0)?;
    Ok(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image as 8 bit grayscale
    let gray = image::open(&args.input)?.to_luma8();
    let size = [gray.width() as usize, gray.height() as usize].into();
    let src = ops::cast_and_scale(gray.as_raw(), size, 1. / 255.)?;
    log::info!("read {} image from {}", src.size(), args.input.display());

    let edges = match args.backend.to_lowercase().as_str() {
        "cpu" => run(&args, Cpu, src)?,
        "parallel" => {
            let backend = match args.threads {
                Some(n) => Parallel::with_threads(n)?,
                None => Parallel::new(),
            };
            run(&args, backend, src)?
        }
        other => return Err(format!("unknown backend {other}").into()),
    };

    let data = ops::to_u8_scaled(&edges, 1.0);
    let out = image::GrayImage::from_raw(edges.width() as u32, edges.height() as u32, data)
        .ok_or("output buffer does not match the image size")?;
    out.save(&args.output)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}
