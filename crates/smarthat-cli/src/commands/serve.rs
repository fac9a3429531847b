//! Serve snapshots over HTTP.

pub fn run(store_path: &str, host: &str, port: u16) {
    let aggregator = super::make_aggregator(store_path);
    let base = format!("http://{host}:{port}");

    println!("Smart Hat Telemetry Server v{}", smarthat_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET /           API index (try: curl {base})");
    println!("     GET /snapshot   Full telemetry snapshot as JSON");
    println!("     GET /health     Connectivity and record counts");
    println!();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(smarthat_server::run_server(aggregator, host, port)) {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
