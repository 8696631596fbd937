pub mod convertable_media;
pub mod converter;
pub mod display;
pub mod encoder;
pub mod encoding_state;
pub mod error;
pub mod ffmpeg;
pub mod fstools;
pub mod media_list;
pub mod mime;
pub mod request;
pub mod request_queue;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;

use log::{info, warn};
use rustop::opts;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use converter::Converter;
use display::{print_media_list, render_events, summary_line};
use error::ConverterError;
use ffmpeg::encoder::FFmpegEncoder;
use ffmpeg::{AudioCodec, EncoderOptions, FFmpeg};
use media_list::MediaList;
use request::{read_requests, ConvertRequest};
use request_queue::{drain_messages, RequestQueue};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let (args, _rest) = opts! {
        synopsis "Convert videos handed over by another program into WebM.";
        opt vp9:bool=false, desc:"Encode video with VP9 instead of VP8.";
        opt audio:String=String::from("opus"), desc:"Audio codec for media that may use sound. [opus, vorbis]";
        opt cpu_used:usize=0, desc:"Value passed to -cpu-used. (0 = every core but two)";
        opt overwrite:bool=false, desc:"Overwrite existing output files.";
        opt dry_run:bool=false, desc:"List the requested media, but don't convert anything.";
        opt ffmpeg:String=String::from("ffmpeg"), desc:"ffmpeg executable.";
        opt ffprobe:String=String::from("ffprobe"), desc:"ffprobe executable.";
        param requests:Option<String>, desc:"Request file, one JSON request per line. (stdin when omitted)";
    }.parse_or_exit();

    let audio = match AudioCodec::from_str(&args.audio) {
        Some(audio) => audio,
        None => {
            println!("Unsupported audio codec: {}", args.audio);
            return ExitCode::FAILURE;
        },
    };

    let options = EncoderOptions {
        ffmpeg: PathBuf::from(&args.ffmpeg),
        ffprobe: PathBuf::from(&args.ffprobe),
        vp9: args.vp9,
        audio,
        cpu_used: if args.cpu_used == 0 { None } else { Some(args.cpu_used) },
        overwrite: args.overwrite,
    };

    if !args.dry_run && !FFmpeg::new(options.ffmpeg.clone()).is_installed() {
        println!("ffmpeg is not installed.");
        return ExitCode::FAILURE;
    }

    let stop = Arc::new(AtomicBool::new(false));
    if let Err(err) = register_stop_handler(&stop) {
        warn!("unable to install the Ctrl-C handler: {}", err);
    }

    let media_list = Arc::new(Mutex::new(MediaList::new()));
    let mut queue = RequestQueue::new(Arc::clone(&media_list));
    let messages = queue.subscribe();

    let read_result = match &args.requests {
        Some(path) => File::open(path)
            .map_err(ConverterError::from)
            .and_then(|f| read_requests(BufReader::new(f), |r| feed(&queue, r))),
        None => read_requests(io::stdin().lock(), |r| feed(&queue, r)),
    };
    queue.close();

    if let Err(err) = read_result {
        println!("Unable to read requests: {}", err);
        return ExitCode::FAILURE;
    }

    let outcome = drain_messages(&messages, &media_list);
    for notice in &outcome.notices {
        println!("{}", notice);
    }

    if outcome.finish {
        println!("Nothing to convert.");
        return ExitCode::FAILURE;
    }

    print_media_list(&snapshot(&media_list));
    if args.dry_run {
        return ExitCode::SUCCESS;
    }

    let encoder = Arc::new(FFmpegEncoder::new(&options, Arc::clone(&stop)));
    let mut converter = Converter::new(encoder, options);
    let events = converter.subscribe();
    let list = Arc::clone(&media_list);
    let conversion = thread::spawn(move || converter.convert_media(&list));

    render_events(events);

    let summary = match conversion.join() {
        Ok(summary) => summary,
        Err(_) => {
            println!("Failure -__-\nThe conversion thread panicked.");
            return ExitCode::FAILURE;
        },
    };

    println!();
    print_media_list(&snapshot(&media_list));
    println!("{}", summary_line(&summary));
    info!("{:?}", summary);

    if summary.failed == 0 && summary.canceled == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn feed(queue: &RequestQueue, request: Result<ConvertRequest, ConverterError>) {
    match request {
        Ok(request) => queue.send(Some(request)),
        Err(err) => {
            println!("{}", err);
            queue.send(None);
        },
    }
}

fn snapshot(media_list: &Arc<Mutex<MediaList>>) -> Vec<convertable_media::ConvertableMedia> {
    media_list
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .snapshot()
}

fn register_stop_handler(stop: &Arc<AtomicBool>) -> Result<(), ConverterError> {
    for signal in [SIGINT, SIGTERM] {
        // the second signal terminates right away
        flag::register_conditional_shutdown(signal, 1, Arc::clone(stop))?;
        flag::register(signal, Arc::clone(stop))?;
    }
    Ok(())
}
