//! tilewave CLI - encode and decode PGM/PPM images with the tile-predicted
//! wavelet codec or its lossless sibling.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use tilewave::constants::{DEFAULT_TILE_LENGTH, DEFAULT_QUANTIZERS};
use tilewave::lossless::{LosslessDecoder, LosslessEncoder};
use tilewave::{CodecError, EncoderConfig, RoundingMode, TileDecoder, TileEncoder, WaveletKind, pnm};

/// Tile-predicted wavelet image codec
#[derive(Parser)]
#[command(name = "tilewave")]
#[command(version)]
#[command(about = "Lossy and lossless image compression for 8-bit PGM/PPM files", long_about = None)]
#[command(after_help = "EXAMPLES:
    tilewave encode photo.ppm photo.img
    tilewave encode photo.ppm photo.img --quantizers 256,64,64 --wavelet haar --rounding nearest
    tilewave encode photo.ppm photo.img 256 64 64 0 1
    tilewave decode photo.img restored.ppm
    tilewave encode --lossless scan.pgm scan.img
    tilewave info photo.img

Use - as a file name to read from standard input or write to standard output.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a PGM/PPM image
    #[command(visible_alias = "e")]
    Encode {
        /// Input pixel map (P5 or P6, maxval 255)
        input: PathBuf,

        /// Output stream
        output: PathBuf,

        /// Positional settings: Q0 Q1 Q2 [WAVELET 0=haar|1=cdf97] [ROUNDING 0=nearest|1=truncate]
        #[arg(value_name = "SETTING", num_args = 0..=5, conflicts_with_all = ["quantizers", "wavelet", "rounding"])]
        settings: Vec<u32>,

        /// Quantizer steps for Y, Cb and Cr; larger keeps more detail
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_QUANTIZERS)]
        quantizers: Vec<u32>,

        /// Wavelet kernel
        #[arg(short, long, default_value = "cdf97", value_enum)]
        wavelet: WaveletArg,

        /// Coefficient rounding
        #[arg(short, long, default_value = "truncate", value_enum)]
        rounding: RoundingArg,

        /// Tile edge length, a power of two
        #[arg(short, long, default_value_t = DEFAULT_TILE_LENGTH)]
        tile_length: u32,

        /// Use the lossless delta/run-length codec instead
        #[arg(long, conflicts_with_all = ["settings", "quantizers", "wavelet", "rounding", "tile_length"])]
        lossless: bool,
    },

    /// Decode a stream back to a PGM/PPM image
    #[command(visible_alias = "d")]
    Decode {
        /// Input stream
        input: PathBuf,

        /// Output pixel map
        output: PathBuf,

        /// The input was written with `encode --lossless`
        #[arg(long)]
        lossless: bool,
    },

    /// Show the header of a lossy stream
    #[command(visible_alias = "i")]
    Info {
        /// Input stream
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WaveletArg {
    /// Haar wavelet
    Haar,
    /// CDF 9/7 biorthogonal wavelet
    Cdf97,
}

impl From<WaveletArg> for WaveletKind {
    fn from(arg: WaveletArg) -> Self {
        match arg {
            WaveletArg::Haar => WaveletKind::Haar,
            WaveletArg::Cdf97 => WaveletKind::Cdf97,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoundingArg {
    /// Round to nearest
    Nearest,
    /// Truncate toward zero, reconstruct with bias
    Truncate,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Nearest => RoundingMode::Nearest,
            RoundingArg::Truncate => RoundingMode::Truncate,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            settings,
            quantizers,
            wavelet,
            rounding,
            tile_length,
            lossless,
        } => {
            if lossless {
                encode_lossless(&input, &output)
            } else {
                let config = EncoderConfig {
                    wavelet: wavelet.into(),
                    rounding: rounding.into(),
                    tile_length,
                    ..EncoderConfig::default()
                };
                quantizer_steps(&quantizers)
                    .map(|quantizers| EncoderConfig { quantizers, ..config })
                    .and_then(|config| apply_settings(config, &settings))
                    .and_then(|config| encode_image(&input, &output, config))
            }
        }
        Commands::Decode {
            input,
            output,
            lossless,
        } => decode_image(&input, &output, lossless),
        Commands::Info { input } => show_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn quantizer_steps(values: &[u32]) -> Result<[u32; 3], CodecError> {
    <[u32; 3]>::try_from(values).map_err(|_| {
        CodecError::invalid_config(format!("expected three quantizer steps, got {}", values.len()))
    })
}

/// Applies `Q0 Q1 Q2 [WAVELET] [ROUNDING]` given after the output path.
fn apply_settings(mut config: EncoderConfig, settings: &[u32]) -> Result<EncoderConfig, CodecError> {
    match settings.len() {
        0 => return Ok(config),
        3..=5 => {}
        n => {
            return Err(CodecError::invalid_config(format!(
                "expected Q0 Q1 Q2 [WAVELET] [ROUNDING], got {} values",
                n
            )));
        }
    }
    config.quantizers = quantizer_steps(&settings[..3])?;
    if let Some(&flag) = settings.get(3) {
        config.wavelet = header_flag(flag, "wavelet")?;
    }
    if let Some(&flag) = settings.get(4) {
        config.rounding = header_flag(flag, "rounding")?;
    }
    Ok(config)
}

fn header_flag<T: TryFrom<u8>>(value: u32, name: &str) -> Result<T, CodecError> {
    u8::try_from(value)
        .ok()
        .and_then(|bit| T::try_from(bit).ok())
        .ok_or_else(|| CodecError::invalid_config(format!("{} flag must be 0 or 1, got {}", name, value)))
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<Vec<u8>, CodecError> {
    if is_stdio(path) {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        return Ok(data);
    }
    fs::read(path).map_err(|source| CodecError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

// Output goes to a temporary file next to `path` and is renamed into place
// once complete, so a failed run never leaves a partial file.
fn write_output(path: &Path, data: &[u8]) -> Result<(), CodecError> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
        return Ok(());
    }
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn encode_image(input: &Path, output: &Path, config: EncoderConfig) -> Result<(), CodecError> {
    let image = pnm::read(&read_input(input)?)?;
    let mut encoded = Vec::new();
    let bits = TileEncoder::new(config).encode(&image, &mut encoded)?;
    write_output(output, &encoded)?;
    eprintln!("{} bits encoded", bits);
    Ok(())
}

fn encode_lossless(input: &Path, output: &Path) -> Result<(), CodecError> {
    let image = pnm::read(&read_input(input)?)?;
    let encoded = LosslessEncoder::encode(&image)?;
    write_output(output, &encoded)?;
    eprintln!("{} bytes encoded", encoded.len());
    Ok(())
}

fn decode_image(input: &Path, output: &Path, lossless: bool) -> Result<(), CodecError> {
    let data = read_input(input)?;
    let image = if lossless {
        LosslessDecoder::decode(&data)?
    } else {
        TileDecoder::new(&data).decode()?
    };
    let mut pixels = Vec::with_capacity(image.pixels.len() + 32);
    pnm::write(&image, &mut pixels)?;
    write_output(output, &pixels)
}

fn show_info(input: &Path) -> Result<(), CodecError> {
    let data = read_input(input)?;
    let header = TileDecoder::new(&data).read_header()?;

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());
    println!();
    println!("  Dimensions:  {}x{}", header.width, header.height);
    println!("  Channels:    {}", header.channel_count());
    println!("  Wavelet:     {:?}", header.wavelet);
    println!("  Rounding:    {:?}", header.rounding);
    println!("  Tile length: {}", header.tile_length);
    println!("  Quantizers:  {:?}", &header.quantizers[..header.channel_count()]);
    Ok(())
}
