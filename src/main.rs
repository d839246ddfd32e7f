use anyhow::{bail, Result};
use newsclean::{
    config::Config,
    merge, normalize,
};
use std::{env, path::PathBuf, process};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn usage() -> ! {
    eprintln!("usage: newsclean <merge|normalize|all> [config.yaml]");
    process::exit(2);
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse args & load config ─────────────────────────────────
    let mut args = env::args().skip(1);
    let command = match args.next() {
        Some(c) => c,
        None => usage(),
    };
    let config_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        usage();
    }

    let cfg = Config::load_or_default(config_path.as_deref())?;
    info!(command = %command, "startup");

    // ─── 3) run the requested pipeline(s) ────────────────────────────
    match command.as_str() {
        "merge" => merge::run(&cfg.merge)?,
        "normalize" => normalize::run(&cfg.normalize)?,
        "all" => {
            merge::run(&cfg.merge)?;
            normalize::run(&cfg.normalize)?;
        }
        other => bail!("unknown command `{}` (expected merge, normalize or all)", other),
    }

    info!("done");
    Ok(())
}
