use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use match3_core::{BoardEvent, ClickOutcome, Coord, Coord2, GameConfig, MoveEngine, ScoreBoard};

mod driver;
mod render;

use driver::PacedDriver;

/// Plays a match-3 board headlessly, either from scripted clicks or by following hints.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    /// Seed for board generation and refills
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE)]
    size: Coord,

    #[arg(long, default_value_t = GameConfig::DEFAULT_MATCH_COUNT)]
    match_count: u8,

    /// Number of ordinary tile kinds
    #[arg(long, default_value_t = GameConfig::DEFAULT_TILE_KINDS)]
    kinds: u8,

    /// Cascade iterations allowed per swap
    #[arg(long, default_value_t = 64)]
    max_cascades: u16,

    /// Clicks to play as ROW,COL, instead of autoplay
    #[arg(long = "click", value_parser = parse_coords)]
    clicks: Vec<Coord2>,

    /// Swaps to autoplay when no clicks are given
    #[arg(long, default_value_t = 10)]
    moves: u32,

    /// Playback speed, 0 resolves instantly
    #[arg(long, default_value_t = 0.0)]
    speed: f32,

    /// Print every board event as a JSON line
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<GameConfig> {
        let config = GameConfig::new(self.size, self.match_count, self.kinds)
            .map(|config| config.with_max_cascades(self.max_cascades))
            .and_then(|config| config.validate().map(|()| config))
            .context("invalid board configuration")?;
        Ok(config)
    }
}

fn parse_coords(value: &str) -> Result<Coord2, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {value:?}"))?;
    let row = row.trim().parse().map_err(|err| format!("bad row: {err}"))?;
    let col = col.trim().parse().map_err(|err| format!("bad column: {err}"))?;
    Ok((row, col))
}

struct Session<W: Write> {
    engine: MoveEngine,
    driver: PacedDriver,
    score: ScoreBoard,
    json: bool,
    out: W,
}

impl<W: Write> Session<W> {
    fn click(&mut self, coords: Coord2) -> anyhow::Result<ClickOutcome> {
        let outcome = self
            .engine
            .click(coords)
            .with_context(|| format!("click at {coords:?}"))?;
        log::debug!("click {:?}: {:?}", coords, outcome);

        if outcome == ClickOutcome::SwapStarted {
            self.engine.run_until_stable(&mut self.driver);
        }
        self.flush_events()?;
        Ok(outcome)
    }

    fn flush_events(&mut self) -> anyhow::Result<()> {
        for event in self.engine.drain_events() {
            self.score.apply(&event);
            if self.json {
                serde_json::to_writer(&mut self.out, &event)?;
                writeln!(self.out)?;
            }
            if let BoardEvent::BoardStable { removed, cascades } = event {
                if removed == 0 {
                    log::info!("Swap rolled back");
                } else {
                    log::info!(
                        "Removed {} tiles in {} cascades, score {}",
                        removed,
                        cascades,
                        self.score.score()
                    );
                }
            }
        }
        Ok(())
    }

    fn autoplay(&mut self, moves: u32) -> anyhow::Result<()> {
        for _ in 0..moves {
            let Some((from, to)) = self.engine.hint() else {
                log::warn!("No moves left on the board");
                break;
            };
            self.click(from)?;
            self.click(to)?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let config = cli.config()?;
    let engine = MoveEngine::new(config, cli.seed)?;
    log::info!(
        "Playing {}x{} board, seed {}",
        config.size,
        config.size,
        cli.seed
    );

    let mut session = Session {
        engine,
        driver: PacedDriver::new(cli.speed),
        score: ScoreBoard::new(),
        json: cli.json,
        out: io::stdout().lock(),
    };

    if cli.clicks.is_empty() {
        session.autoplay(cli.moves)?;
    } else {
        for &coords in &cli.clicks {
            session.click(coords)?;
        }
    }

    if !session.json {
        let board = render::render(session.engine.board(), session.engine.selected());
        write!(session.out, "{board}")?;
        writeln!(
            session.out,
            "score {}, {} tiles removed",
            session.score.score(),
            session.score.removed()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64) -> Session<Vec<u8>> {
        Session {
            engine: MoveEngine::new(GameConfig::default(), seed).unwrap(),
            driver: PacedDriver::new(0.0),
            score: ScoreBoard::new(),
            json: true,
            out: Vec::new(),
        }
    }

    #[test]
    fn parses_click_coordinates() {
        assert_eq!(parse_coords("3,4"), Ok((3, 4)));
        assert_eq!(parse_coords(" 0 , 7 "), Ok((0, 7)));
        assert!(parse_coords("3").is_err());
        assert!(parse_coords("3,x").is_err());
        assert!(parse_coords("300,1").is_err());
    }

    #[test]
    fn cli_flags_map_onto_config() {
        let cli = Cli::parse_from(["match3", "--size", "6", "--kinds", "4", "--max-cascades", "8"]);
        let config = cli.config().unwrap();
        assert_eq!(config.size, 6);
        assert_eq!(config.tile_kinds, 4);
        assert_eq!(config.max_cascades, 8);

        let cli = Cli::parse_from(["match3", "--kinds", "2"]);
        assert!(cli.config().is_err());

        let cli = Cli::parse_from(["match3", "--max-cascades", "0"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn scripted_clicks_are_parsed_in_order() {
        let cli = Cli::parse_from(["match3", "--click", "1,1", "--click", "1,2"]);
        assert_eq!(cli.clicks, [(1, 1), (1, 2)]);
    }

    #[test]
    fn autoplay_writes_one_stable_event_per_swap() {
        let mut session = session(5);
        session.autoplay(3).unwrap();

        let text = String::from_utf8(session.out).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let count = |name: &str| events.iter().filter(|value| value.get(name).is_some()).count();

        assert_eq!(count("BoardStable"), 3);
        assert!(count("ScoreChanged") >= 3);
        assert_eq!(session.score.score() as usize, count("ScoreChanged") * 10);
    }

    #[test]
    fn out_of_bounds_click_is_reported() {
        let mut session = session(0);
        assert!(session.click((8, 8)).is_err());
    }
}
