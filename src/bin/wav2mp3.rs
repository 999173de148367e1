//! WAV to MP3 converter command line tool
//!
//! Reads a WAV file, drives the streaming encoder in fixed-size chunks and
//! writes the concatenated MP3 bytes to the output path.

use std::env;
use std::fs::File;
use std::io::Write;
use std::process;

use pcm2mp3::util::read_wav_file;
use pcm2mp3::{EncoderConfig, StreamingEncoder};

/// Samples per encode call; small enough to keep memory flat, large enough
/// to amortize call overhead
const DEFAULT_CHUNK_SIZE: usize = 12800;

struct Args {
    input_file: String,
    output_file: String,
    bitrate: u32,
    quality: u8,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let args: Vec<String> = env::args().collect();

        let mut bitrate = 128;
        let mut quality = 5;
        let mut positional = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-b" => {
                    i += 1;
                    let value = args.get(i).ok_or("option -b requires a bitrate value")?;
                    bitrate = value
                        .parse::<u32>()
                        .map_err(|_| format!("invalid bitrate: {}", value))?;
                }
                "-q" => {
                    i += 1;
                    let value = args.get(i).ok_or("option -q requires a quality value")?;
                    quality = value
                        .parse::<u8>()
                        .map_err(|_| format!("invalid quality: {}", value))?;
                }
                "-h" | "--help" => return Err(String::new()),
                other if other.starts_with('-') => {
                    return Err(format!("unknown option: {}", other));
                }
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        if positional.len() != 2 {
            return Err(String::new());
        }

        Ok(Self {
            input_file: positional[0].clone(),
            output_file: positional[1].clone(),
            bitrate,
            quality,
        })
    }
}

fn print_usage() {
    eprintln!("Usage: wav2mp3 [options] <input.wav> <output.mp3>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -b <bitrate>   target bitrate in kbps (default: 128)");
    eprintln!("  -q <quality>   quality 0 (best) to 9 (fastest) (default: 5)");
    eprintln!("  -h             show this help");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (samples, sample_rate, channels) = read_wav_file(&args.input_file)?;

    let mut encoder = StreamingEncoder::new();
    encoder.configure(
        EncoderConfig::new()
            .sample_rate(sample_rate)
            .bitrate(args.bitrate)
            .channels(channels)
            .quality(args.quality),
    )?;

    let mut output = File::create(&args.output_file)?;
    let chunk_samples = DEFAULT_CHUNK_SIZE * channels as usize;

    for chunk in samples.chunks(chunk_samples) {
        output.write_all(&encoder.encode(chunk)?)?;
    }
    output.write_all(&encoder.flush()?)?;

    println!(
        "{} -> {} ({} Hz, {} ch, {} kbps)",
        args.input_file, args.output_file, sample_rate, channels, args.bitrate
    );
    Ok(())
}

fn main() {
    // Errors only unless RUST_LOG overrides
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Error)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
                eprintln!();
            }
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
