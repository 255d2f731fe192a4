use anyhow::Result;
use collab_cli::{build_cli, init_tracing, load_config, run};

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let config = load_config(&matches)?;
    init_tracing(&config.log);

    let output = run(&matches, config)?;
    println!("{output}");
    Ok(())
}
