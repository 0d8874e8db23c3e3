use flood_monitoring::{
    river_options, status_options, FloodMonitoring, FloodMonitoringError, NO_MATCHING_STATIONS,
    STATIONS_UNAVAILABLE,
};

#[tokio::main]
async fn main() -> Result<(), FloodMonitoringError> {
    // Set RUST_LOG=info to see cache and request messages.
    env_logger::init();

    // FLOOD_MONITORING_BASE_URL points the client at another server.
    let client = FloodMonitoring::from_env()?;

    let outcome = client.load_stations().await;
    if let Some(notice) = outcome.notice() {
        eprintln!("{}", notice);
        eprintln!("{}", STATIONS_UNAVAILABLE);
        return Ok(());
    }
    println!("Total stations: {}", outcome.items.len());

    let rivers = river_options(&outcome.items);
    let statuses = status_options(&outcome.items);
    println!("{} river options, statuses: {:?}", rivers.len(), statuses);

    let query = std::env::args().nth(1).unwrap_or_default();
    let found = client
        .find_stations()
        .query(query.as_str())
        .status("Active")
        .call()
        .await?;

    if found.is_empty() {
        println!("{}", NO_MATCHING_STATIONS);
    }
    for station in found.iter().take(20) {
        println!(
            "{:<40} {:<25} {}",
            station.option_label(),
            station.river,
            station.map_url().unwrap_or_default()
        );
    }
    Ok(())
}
