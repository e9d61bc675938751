//! Lane Hopper entry point
//!
//! Runs a headless, auto-piloted session and logs how far it got. A windowed
//! front end drives `Session` the same way, feeding real key presses instead.
//!
//! Usage: `lane-hopper [settings.json] [seed]`

use lane_hopper::sim::{Bounds, Contact, GamePhase, Player, Session, Step, TickInput, World};
use lane_hopper::{FRAME_DT, Settings};

/// Two minutes at 60 Hz
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();
    log::info!("Lane Hopper (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let mut session = match args.next().and_then(|arg| parse_seed(&arg)) {
        Some(seed) => Session::with_seed(settings, seed),
        None => Session::new(settings),
    };

    let mut frames = 0;
    while frames < MAX_FRAMES && session.phase() != GamePhase::GameOver {
        let input = TickInput {
            step: choose_step(session.world(), session.player()),
            ..Default::default()
        };
        session.tick(&input, FRAME_DT);
        for event in session.drain_events() {
            log::debug!("frame {frames}: {event:?}");
        }
        frames += 1;
    }

    let player = session.player();
    log::info!("{}", session.speed_readout());
    match session.death() {
        Some(cause) => println!(
            "Run ended after {:.1}s at row {}: score {} ({cause:?})",
            frames as f32 * FRAME_DT,
            player.row,
            player.score
        ),
        None => println!(
            "Survived {:.1}s: score {}, {} lanes generated",
            frames as f32 * FRAME_DT,
            player.score,
            session.world().lane_count()
        ),
    }
}

/// Seed argument, or None (with a warning) when it is not a `u64`
fn parse_seed(arg: &str) -> Option<u64> {
    match arg.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(err) => {
            log::warn!("Ignoring seed {arg:?} ({err}); seeding from entropy");
            None
        }
    }
}

/// Hop forward when the lane ahead looks survivable, otherwise wait
fn choose_step(world: &World, player: &Player) -> Option<Step> {
    let settings = world.settings();
    let tile = settings.tile_size;
    let row = player.row + 1;
    let ahead = world.lane(row)?;
    let target = Bounds::cell(player.column, row, tile);

    match ahead.kind().contact() {
        Contact::Inert => {
            if !ahead.blocks(player.column) {
                return Some(Step::Up);
            }
            // sidestep toward the nearer open column
            let open = (0..settings.cols as i32)
                .filter(|c| !ahead.blocks(*c))
                .min_by_key(|c| (c - player.column).abs())?;
            Some(if open < player.column { Step::Left } else { Step::Right })
        }
        Contact::Lethal => {
            let buffer = Bounds::new(target.left() - 2.0 * tile, target.min.y, 5.0 * tile, tile);
            let clear = ahead
                .hazards()
                .iter()
                .all(|h| !h.bounds(tile).overlaps(&buffer));
            clear.then_some(Step::Up)
        }
        Contact::Ride => {
            let landing = ahead.hazards().iter().any(|h| {
                let b = h.bounds(tile);
                b.left() <= target.left() && b.right() >= target.right()
            });
            landing.then_some(Step::Up)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("2024"), Some(2024));
        assert_eq!(parse_seed("abc"), None);
        assert_eq!(parse_seed("-1"), None);
    }
}
