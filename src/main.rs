use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process;

use flatfs::cmd;

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => {
            eprintln!("usage: flatfs <request-log>");
            process::exit(1);
        }
    };

    let log = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("flatfs: failed to open {}: {}", path, e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = cmd::run(BufReader::new(log), &mut out);
    if let Err(e) = out.flush() {
        eprintln!("flatfs: {}", e);
        process::exit(1);
    }
    if let Err(e) = result {
        eprintln!("flatfs: {}", e);
        process::exit(1);
    }
}
