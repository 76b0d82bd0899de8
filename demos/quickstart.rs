use chrono::{NaiveDate, NaiveTime};
use ganji::{fmt, BirthInput, Engine, Gender};

fn main() -> ganji::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let engine = Engine::default();
    let input = BirthInput::new(
        NaiveDate::from_ymd_opt(1996, 12, 29).ok_or(ganji::Error::invalid_date(1996, 12, 29))?,
        Gender::Male,
    )
    .with_time(NaiveTime::from_hms_opt(16, 3, 0).unwrap_or(NaiveTime::MIN))
    .with_location(127.5);

    let chart = engine.chart(&input, None)?;
    if let Some(correction) = &chart.correction {
        println!(
            "corrected: {} ({:+.2} min)",
            correction.corrected,
            correction.total_minutes()
        );
    }
    for (label, pillar) in ["year", "month", "day", "hour"].iter().zip(chart.pillars.iter()) {
        println!(
            "{label:>5}: {pillar} {}",
            fmt::ganzhi(pillar, fmt::Script::Hangul)
        );
    }
    println!("direction: {}", chart.direction);
    Ok(())
}
