use chrono::{Datelike, Local};
use ganji::{fmt, BirthInput, Engine, LuckCycleBuilder};

fn main() -> ganji::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = Engine::default();
    let input = BirthInput::parse("1990-06-15", "08:30", "여")?.with_location(126.98);
    let chart = engine.chart(&input, None)?;
    let decades = engine.decades(&chart)?;

    println!("대운 ({})", chart.direction);
    for decade in &decades {
        println!(
            "  {:>3}세  {}  {}",
            decade.start_age.unwrap_or_default(),
            decade.ganzhi,
            decade.instant().date()
        );
    }

    let now = Local::now().naive_local();
    if let Some(active) = LuckCycleBuilder::active_decade(&decades, &now) {
        println!("current decade: {}", fmt::ganzhi(active.ganzhi, fmt::Script::Hangul));
    }

    let luck = engine.luck();
    println!("세운");
    for year in luck.years(now.year(), 3, chart.longitude)? {
        println!("  {}  {}", year.instant(), year.ganzhi);
    }
    println!("월운");
    for month in luck.months(now.year(), chart.longitude)? {
        println!("  {:>2}  {}  {}", month.ordinal, month.span, month.ganzhi);
    }
    println!("일운");
    for day in luck.days(now.date(), 7)? {
        println!("  {}  {}", day.instant().date(), day.ganzhi);
    }
    Ok(())
}
