use weather_core::{ConditionIcon, RenderData, View, ViewSink};

/// Prints each view as a standalone panel on stdout.
#[derive(Debug, Default)]
pub struct TerminalPanels;

impl ViewSink for TerminalPanels {
    fn render(&self, view: &View) {
        println!("{}", panel_text(view));
    }

    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

fn glyph(icon: ConditionIcon) -> &'static str {
    match icon {
        ConditionIcon::Thunderstorm => "⛈",
        ConditionIcon::Drizzle => "🌦",
        ConditionIcon::Rain => "🌧",
        ConditionIcon::Snow => "❄",
        ConditionIcon::Atmosphere => "🌫",
        ConditionIcon::Clear => "☀",
        ConditionIcon::Clouds => "☁",
    }
}

pub fn panel_text(view: &View) -> String {
    match view {
        View::Idle => "Search for a city to see its weather.".to_string(),
        View::Loading => "Loading...".to_string(),
        View::Found(data) => weather_panel(data),
        View::NotFound => "Search city not found.".to_string(),
        View::Error(reason) => format!("Search city not found.\n  ({reason})"),
    }
}

fn weather_panel(data: &RenderData) -> String {
    let mut out = format!(
        "{}  |  {}\n  {} {}  {}  {}\n  Humidity {}   Wind {}",
        data.location,
        data.date,
        glyph(data.icon),
        data.icon,
        data.temperature,
        data.condition,
        data.humidity,
        data.wind_speed
    );

    if !data.forecast.is_empty() {
        out.push('\n');
    }
    for card in &data.forecast {
        out.push_str(&format!(
            "\n  {}  {} {}  {}",
            card.date,
            glyph(card.icon),
            card.icon,
            card.temperature
        ));
    }

    out
}
