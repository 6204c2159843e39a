use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

mod args;
mod survey;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let args = args::Args::parse();
    init_logging(args.verbose);
    debug!("main: args: {:?}", args);

    let res = survey::config_reader::build_plan(&args).and_then(|plan| survey::run_survey(&plan));

    if let Err(e) = res {
        eprintln!("An error occurred: {}", e);
        for cause in e.iter_chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("{}", bt);
        }
        std::process::exit(1);
    }
}
