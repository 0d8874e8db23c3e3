use flood_monitoring::{
    group_by_parameter, summarize, write_csv, FloodMonitoring, FloodMonitoringError,
    NO_RECENT_READINGS,
};

#[tokio::main]
async fn main() -> Result<(), FloodMonitoringError> {
    env_logger::init();

    // Kingston upon Thames unless another station reference is given.
    let station_id = std::env::args().nth(1).unwrap_or_else(|| "3400TH".to_string());
    let client = FloodMonitoring::from_env()?;

    let outcome = client.load_readings(&station_id).await;
    if let Some(notice) = outcome.notice() {
        eprintln!("{}", notice);
        return Ok(());
    }
    if outcome.items.is_empty() {
        println!("{}", NO_RECENT_READINGS);
        return Ok(());
    }

    for group in group_by_parameter(&outcome.items) {
        let Some(summary) = summarize(&group.parameter, &group.readings) else {
            continue;
        };
        println!("{}", summary.chart_title());
        println!("  {}", summary.span_description());
        if let Some((at, value)) = summary.latest {
            println!("  Latest:  {} at {}", summary.format_value(value), at);
        }
        for (label, value) in [("Average", summary.mean), ("Min", summary.min), ("Max", summary.max)] {
            if let Some(value) = value {
                println!("  {:<8} {}", format!("{}:", label), summary.format_value(value));
            }
        }

        let path = write_csv(
            &std::env::temp_dir(),
            &station_id,
            &group.parameter,
            &group.readings,
        )
        .await?;
        println!("  Saved {}", path.display());
    }
    Ok(())
}
