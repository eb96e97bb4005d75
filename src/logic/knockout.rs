//! Knockout bracket builder: placeholder fixtures from a first round down to the Final.

use crate::config::SchedulerConfig;
use crate::models::{
    match_id_for, Competition, Fixture, Participant, Stage, TournamentError,
};

/// Matches per round for the stages a bracket can start at.
fn matches_in(stage: &Stage) -> Option<usize> {
    match stage {
        Stage::RoundOf16 => Some(8),
        Stage::QuarterFinal => Some(4),
        Stage::SemiFinal => Some(2),
        Stage::Final => Some(1),
        _ => None,
    }
}

fn next_round(stage: &Stage) -> Option<Stage> {
    match stage {
        Stage::RoundOf16 => Some(Stage::QuarterFinal),
        Stage::QuarterFinal => Some(Stage::SemiFinal),
        Stage::SemiFinal => Some(Stage::Final),
        _ => None,
    }
}

fn placeholder(text: String) -> Participant {
    Participant::Placeholder(text)
}

/// First-round slots, seeded from group placings when the group count fits the round.
///
/// One group per match: "1st Group A" vs "2nd Group B" (runner-up of the next group).
/// Two groups per match: "1st Group A" vs "1st Group B". Otherwise every slot is `TBD`.
fn first_round_slots(competition: &Competition, matches: usize) -> Vec<(Participant, Participant)> {
    let names: Vec<&str> = competition.groups.iter().map(|g| g.name.as_str()).collect();
    let g = names.len();
    (0..matches)
        .map(|k| {
            if g >= 2 && g == matches {
                (
                    placeholder(format!("1st {}", names[k])),
                    placeholder(format!("2nd {}", names[(k + 1) % g])),
                )
            } else if g == matches * 2 {
                (
                    placeholder(format!("1st {}", names[2 * k])),
                    placeholder(format!("1st {}", names[2 * k + 1])),
                )
            } else {
                (Participant::tbd(), Participant::tbd())
            }
        })
        .collect()
}

/// Build the bracket starting at `first_stage`.
///
/// Later rounds reference earlier ones ("Winner QF1"); a 3rd Place Playoff between the
/// semi-final losers precedes the Final whenever the bracket has semi-finals. Each fixture
/// carries the `matchId` of the list position it takes once applied with
/// [`Competition::replace_bracket`].
pub fn build_knockout(
    competition: &Competition,
    first_stage: Stage,
    config: &SchedulerConfig,
) -> Result<Vec<Fixture>, TournamentError> {
    let first_matches = matches_in(&first_stage)
        .ok_or_else(|| TournamentError::InvalidStage(first_stage.label().to_string()))?;

    let mut bracket: Vec<Fixture> = Vec::new();
    let mut stage = first_stage;
    let mut slots = first_round_slots(competition, first_matches);
    loop {
        let count = slots.len();
        for (k, (home, away)) in slots.into_iter().enumerate() {
            let mut f = Fixture::new(competition.id, home, away, stage.clone(), config.default_duration);
            f.description = Some(if count == 1 {
                stage.label().to_string()
            } else {
                format!("{} {}", stage.label(), k + 1)
            });
            bracket.push(f);
        }

        let Some(next) = next_round(&stage) else {
            break;
        };
        let code = stage.short_code().to_string();
        if stage == Stage::SemiFinal {
            let mut third = Fixture::new(
                competition.id,
                placeholder(format!("Loser {}1", code)),
                placeholder(format!("Loser {}2", code)),
                Stage::ThirdPlacePlayoff,
                config.default_duration,
            );
            third.description = Some(Stage::ThirdPlacePlayoff.label().to_string());
            bracket.push(third);
        }
        slots = (0..count / 2)
            .map(|k| {
                (
                    placeholder(format!("Winner {}{}", code, 2 * k + 1)),
                    placeholder(format!("Winner {}{}", code, 2 * k + 2)),
                )
            })
            .collect();
        stage = next;
    }

    let offset = competition
        .fixtures
        .iter()
        .filter(|f| !f.stage.is_bracket())
        .count();
    for (i, f) in bracket.iter_mut().enumerate() {
        f.match_id = Some(match_id_for(&competition.code, offset + i));
    }
    Ok(bracket)
}
