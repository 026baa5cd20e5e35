use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "geostamp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stamp a photo with its location and capture time.
    Stamp(StampArgs),
    /// Print where a caption would be placed on a bitmap of the given size, as JSON.
    Place(PlaceArgs),
}

#[derive(Parser, Debug)]
struct StampArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path. Defaults to `captured_<timestamp>.jpg` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    pincode: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Pre-formatted timestamp line. Defaults to the local time now.
    #[arg(long)]
    time: Option<String>,

    /// Stamp style JSON.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Preferred TrueType font, overriding the style.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print an HTML download anchor for the written file.
    #[arg(long)]
    link: bool,

    /// Print which caption font was resolved.
    #[arg(long)]
    dump_font: bool,
}

#[derive(Parser, Debug)]
struct PlaceArgs {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Caption line; repeat for more lines.
    #[arg(long = "line")]
    lines: Vec<String>,

    /// Timestamp line appended after the caption lines.
    #[arg(long, default_value = "")]
    time: String,

    /// Stamp style JSON.
    #[arg(long)]
    style: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Stamp(args) => cmd_stamp(args),
        Command::Place(args) => cmd_place(args),
    }
}

fn read_style(path: Option<&Path>) -> anyhow::Result<geostamp::StampStyle> {
    match path {
        Some(p) => Ok(geostamp::StampStyle::from_json_file(p)?),
        None => Ok(geostamp::StampStyle::default()),
    }
}

fn cmd_stamp(args: StampArgs) -> anyhow::Result<()> {
    let mut style = read_style(args.style.as_deref())?;
    if let Some(font) = args.font {
        style.font = Some(font);
    }

    let img = image::open(&args.in_path)
        .with_context(|| format!("open photo '{}'", args.in_path.display()))?;

    let now = chrono::Local::now();
    let timestamp = args.time.unwrap_or_else(|| geostamp::format_timestamp(&now));
    let location = geostamp::Location {
        city: args.city,
        pincode: args.pincode,
        latitude: args.lat,
        longitude: args.lon,
    };
    let caption = geostamp::Caption::for_location(&location);

    let mut compositor = geostamp::Compositor::new(style)?;
    if args.dump_font {
        eprintln!("caption font: {}", compositor.font().describe());
    }
    let stamped = compositor.composite(img, caption.lines(), &timestamp)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(geostamp::capture_file_name(&now)));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = geostamp::save_image(&stamped, &out)?;
    eprintln!("wrote {}", out.display());

    if args.link {
        let file_name = out
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let link =
            geostamp::DownloadLink::new(&bytes, file_name, geostamp::export::IMAGE_LINK_MIME);
        println!("{}", link.to_html("Download Image"));
    }
    Ok(())
}

fn cmd_place(args: PlaceArgs) -> anyhow::Result<()> {
    let style = read_style(args.style.as_deref())?;
    let mut compositor = geostamp::Compositor::new(style)?;
    let placement =
        compositor.placement(args.width, args.height, args.lines.as_slice(), &args.time)?;
    let json = serde_json::to_string_pretty(&placement).context("serialize placement")?;
    println!("{json}");
    Ok(())
}
