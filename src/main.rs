//! Stunt Show entry point
//!
//! The browser build is a library (`WebGame`) loaded by the page script. The
//! native binary plays one scripted round per mode headlessly and prints the
//! results, which is handy for checking the rules without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stunt_show::sim::{Difficulty, Mode, RoundEngine, RoundStatus};
    use stunt_show::settings::Cosmetic;
    use stunt_show::{Profile, format_secs};

    env_logger::init();
    log::info!("Stunt Show (native) starting...");
    log::info!("Run with `trunk serve` for the web version");

    let mut engine = RoundEngine::new(Profile::load(), 2024);

    for mode in Mode::ALL {
        engine.start(mode, Difficulty::Amateur);
        let outcome = autoplay(&mut engine, 450);
        let round = engine.round().map(|r| (r.status, r.elapsed_secs(), r.next_expected));
        if let Some((status, elapsed, next)) = round {
            println!(
                "{:<13} {:<8} {:>6} s  next tile {}",
                mode.as_str(),
                format!("{:?}", status),
                format_secs(elapsed),
                next
            );
        }
        if outcome == RoundStatus::Running {
            engine.abandon();
        }
    }

    let mut profile = engine.into_sink();
    println!("\ncoins: {}", profile.coins);
    for (mode, best) in &profile.personal_bests {
        println!("best {:<13} {} s", mode.as_str(), format_secs(*best));
    }

    let ranking = profile.leaderboard.ranking(None);
    for (rank, entry) in ranking.times.iter().enumerate() {
        println!(
            "#{:<2} {:<13} {} s  +{} coins",
            rank + 1,
            entry.mode.as_str(),
            format_secs(entry.time),
            entry.coins
        );
    }
    if let Some(top) = profile.leaderboard.top_time() {
        println!("fastest run: {} s", format_secs(top));
    }

    match profile.unlock(Cosmetic::Skin, "white") {
        Ok(()) => println!("unlocked skin white, {} coins left", profile.coins),
        Err(e) => println!("store: {}", e),
    }
    profile.save();
}

/// Click the next tile every `click_every_ms`, with one deliberate miss.
/// Gives up after 40 s of round time (Sumamos never ends on its own).
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(
    engine: &mut stunt_show::sim::RoundEngine<stunt_show::Profile>,
    click_every_ms: u64,
) -> stunt_show::sim::RoundStatus {
    use stunt_show::sim::RoundStatus;

    let mut missed = false;
    let mut waited = 0;
    while engine.status() == RoundStatus::Running && waited < 40_000 {
        engine.advance(click_every_ms);
        waited += click_every_ms;

        let Some(round) = engine.round() else { break };
        if !round.accepts_input() {
            continue;
        }
        let target = if !missed && round.next_expected == 10 {
            missed = true;
            round.board.position_of(round.next_expected + 1)
        } else {
            round.board.position_of(round.next_expected)
        };
        if let Some(position) = target {
            engine.click(position);
        }
    }
    engine.status()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `WebGame::new`, this is just to satisfy the compiler
}
