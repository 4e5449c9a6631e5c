use std::time::Duration;

use anyhow::Context;
use deck_demo::{default_script, DemoSession};

const DEFAULT_VIEWPORT_WIDTH: f32 = 400.0;
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let viewport_width = match std::env::var("DECK_DEMO_WIDTH") {
        Ok(raw) => raw
            .parse::<f32>()
            .with_context(|| format!("DECK_DEMO_WIDTH must be a number, got {raw:?}"))?,
        Err(_) => DEFAULT_VIEWPORT_WIDTH,
    };

    println!("=== Swipe Deck Demo ===");
    println!("Viewport width {viewport_width}; swipes commit past 25% of it.");
    println!();

    let session = DemoSession::new(viewport_width, FRAME_INTERVAL)?;
    let script = default_script(viewport_width);
    let frames = session.run_script(&script)?;

    for (drag, frame) in script.iter().zip(&frames) {
        println!("after drag ({:.0}, {:.0}):", drag.dx, drag.dy);
        println!("{frame}");
    }
    println!("swipes: {:?}", session.swipes());
    Ok(())
}
