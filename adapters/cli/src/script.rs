//! Line-oriented session scripts replayed by the `play` command.
//!
//! Each non-empty line holds one step; `#` starts a comment.
//!
//! ```text
//! select 1        # pick turret kind 1
//! place 2 3       # place it on column 2, row 3
//! upgrade 2 3
//! tick 0.5        # advance half a second
//! earn 40
//! remove 2 3
//! show
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use turret_defence_core::{CellCoord, TurretKind};
use turret_defence_system_builder::BuilderInput;

/// Single instruction of a session script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Step {
    /// Frame input routed through the builder system.
    Input(BuilderInput),
    /// Advances the simulation clock.
    Tick(Duration),
    /// Credits the player's purse.
    Earn(u32),
    /// Prints the board.
    Show,
}

/// Parses a complete script, reporting the first malformed line.
pub(crate) fn parse(contents: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_step(line).with_context(|| format!("script line {}: `{line}`", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_step(line: &str) -> Result<Step> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let arguments: Vec<&str> = words.collect();

    let step = match (verb, arguments.as_slice()) {
        ("select", [kind]) => Step::Input(BuilderInput::select(TurretKind::new(number(kind)?))),
        ("place", [column, row]) => Step::Input(BuilderInput::place_at(cell(column, row)?)),
        ("remove", [column, row]) => Step::Input(BuilderInput::remove_at(cell(column, row)?)),
        ("upgrade", [column, row]) => Step::Input(BuilderInput::upgrade_at(cell(column, row)?)),
        ("tick", [seconds]) => Step::Tick(duration(seconds)?),
        ("earn", [amount]) => Step::Earn(number(amount)?),
        ("show", []) => Step::Show,
        _ => bail!("unrecognised instruction"),
    };
    Ok(step)
}

fn number(text: &str) -> Result<u32> {
    text.parse::<u32>()
        .with_context(|| format!("`{text}` is not a non-negative integer"))
}

fn cell(column: &str, row: &str) -> Result<CellCoord> {
    Ok(CellCoord::new(number(column)?, number(row)?))
}

fn duration(text: &str) -> Result<Duration> {
    let seconds = text
        .parse::<f32>()
        .with_context(|| format!("`{text}` is not a number of seconds"))?;
    Duration::try_from_secs_f32(seconds)
        .with_context(|| format!("`{text}` is not a valid duration"))
}
