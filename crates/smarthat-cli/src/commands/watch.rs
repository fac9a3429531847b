//! Periodic refresh loop: the CLI counterpart of the dashboard's interval
//! timer. Each tick is an independent cycle against the store; nothing is
//! carried over between ticks.

use std::time::Duration;

pub fn run(store_path: &str, interval_secs: u64, json: bool) {
    let aggregator = super::make_aggregator(store_path);
    let interval = Duration::from_secs(interval_secs.max(1));

    loop {
        let snapshot = aggregator.assemble();
        if json {
            super::print_json(&snapshot);
        } else {
            println!("\x1b[2J\x1b[H"); // clear screen between refreshes
            super::print_summary(&snapshot);
            println!("\nrefreshing every {}s — ctrl-c to stop", interval.as_secs());
        }
        std::thread::sleep(interval);
    }
}
