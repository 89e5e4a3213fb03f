use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use std::{env, process};

use getopts::Options;

use kfinger_graph::{formats, utils, FingerGraph};

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    let start_time = Instant::now();

    // Parse arguments.
    let config = Config::new()?;
    if !utils::file_exists(&config.factors_file) {
        return Err(format!("File {} does not exist", config.factors_file));
    }

    // Build the graph.
    eprintln!("Building the graph from {}", config.factors_file);
    let reader = utils::open_file(&config.factors_file)?;
    let graph = FingerGraph::from_reader(
        reader, config.k, config.limit, config.normalize, config.enrich
    )?;
    eprintln!("The graph contains {} nodes", graph.node_count());

    // Write the graph.
    match &config.output {
        Some(filename) => {
            let file = File::create(filename).map_err(|x| x.to_string())?;
            let mut output = BufWriter::new(file);
            formats::write_graph(&graph, &mut output).map_err(|x| x.to_string())?;
            output.flush().map_err(|x| x.to_string())?;
        }
        None => {
            let stdout = io::stdout();
            let mut output = stdout.lock();
            formats::write_graph(&graph, &mut output).map_err(|x| x.to_string())?;
        }
    }

    let end_time = Instant::now();
    let seconds = end_time.duration_since(start_time).as_secs_f64();
    eprintln!("Used {:.3} seconds", seconds);

    Ok(())
}

//-----------------------------------------------------------------------------

struct Config {
    pub factors_file: String,
    pub output: Option<String>,
    pub k: usize,
    pub limit: usize,
    pub normalize: bool,
    pub enrich: bool,
}

impl Config {
    const DEFAULT_K: usize = 5;
    const DEFAULT_LIMIT: usize = 30;

    pub fn new() -> Result<Config, String> {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optopt("k", "", &format!("window width in factors (default {})", Self::DEFAULT_K), "INT");
        opts.optopt("l", "limit", &format!("minimum sum of factor lengths in a window (default {})", Self::DEFAULT_LIMIT), "INT");
        opts.optflag("", "no-norm", "do not canonicalize k-fingers; the graph becomes directed");
        opts.optflag("", "no-enriched", "do not enrich k-fingers with representative substrings");
        opts.optopt("o", "output", "write the graph to FILE (default: stdout)", "FILE");
        let matches = opts.parse(&args[1..]).map_err(|x| x.to_string())?;

        if matches.opt_present("h") {
            let header = format!("Usage: {} [options] factors.txt", program);
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }

        let mut k = Self::DEFAULT_K;
        if let Some(s) = matches.opt_str("k") {
            k = s.parse::<usize>().map_err(|x| format!("-k: {}", x))?;
        }
        let mut limit = Self::DEFAULT_LIMIT;
        if let Some(s) = matches.opt_str("l") {
            limit = s.parse::<usize>().map_err(|x| format!("--limit: {}", x))?;
        }

        let factors_file = if let Some(s) = matches.free.first() {
            s.clone()
        } else {
            let header = format!("Usage: {} [options] factors.txt", program);
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };

        Ok(Config {
            factors_file,
            output: matches.opt_str("o"),
            k,
            limit,
            normalize: !matches.opt_present("no-norm"),
            enrich: !matches.opt_present("no-enriched"),
        })
    }
}

//-----------------------------------------------------------------------------
