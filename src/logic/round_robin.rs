//! Group stage: round-robin fixture generation (circle method).

use crate::config::SchedulerConfig;
use crate::models::{
    Competition, CompetitionId, Fixture, Group, GroupId, Stage, Team, TeamId, TournamentError,
};

/// Where generated fixtures belong: a competition, and optionally one of its groups.
#[derive(Clone, Copy, Debug)]
pub struct GroupContext<'a> {
    pub competition_id: CompetitionId,
    /// `None` in "all teams" mode (competition without groups).
    pub group: Option<&'a Group>,
    /// Duration used when the group has no default of its own.
    pub default_duration: u32,
}

/// Pairings per round for a full single round robin.
///
/// 1. Odd counts get a ghost entry; whoever meets it has a bye that round.
/// 2. The first entry stays fixed; after each round the last entry moves to the front of the rest.
/// 3. Entry `i` meets entry `n - 1 - i`.
///
/// Returns `n - 1` rounds for even `n`, `n` rounds for odd `n`, and nothing below two teams.
pub fn round_robin_pairings(team_ids: &[TeamId]) -> Vec<Vec<(TeamId, TeamId)>> {
    if team_ids.len() < 2 {
        return Vec::new();
    }
    let mut entries: Vec<Option<TeamId>> = team_ids.iter().copied().map(Some).collect();
    if entries.len() % 2 == 1 {
        entries.push(None);
    }
    let n = entries.len();

    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (entries[i], entries[n - 1 - i]) {
                // Alternate the fixed entry's side so it is not always at home.
                if i == 0 && round % 2 == 1 {
                    pairs.push((b, a));
                } else {
                    pairs.push((a, b));
                }
            }
        }
        rounds.push(pairs);
        entries[1..].rotate_right(1);
    }
    rounds
}

/// Build group-stage fixtures for one scheduling unit, in round order.
pub fn generate(teams: &[Team], context: &GroupContext<'_>) -> Vec<Fixture> {
    let ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    let duration = context
        .group
        .and_then(|g| g.default_duration)
        .unwrap_or(context.default_duration);

    round_robin_pairings(&ids)
        .into_iter()
        .enumerate()
        .flat_map(|(round, pairs)| {
            pairs.into_iter().map(move |(home, away)| (round, home, away))
        })
        .map(|(round, home, away)| {
            let mut f = Fixture::new(context.competition_id, home, away, Stage::Group, duration);
            f.group_id = context.group.map(|g| g.id);
            f.description = Some(match context.group {
                Some(g) => format!("Round {} - {}", round + 1, g.name),
                None => format!("Round {}", round + 1),
            });
            f
        })
        .collect()
}

/// (Re)generate group-stage fixtures for a competition.
///
/// With `group_id`, only that group's previous group-stage fixtures are replaced; other groups'
/// fixtures and every knockout fixture are kept. Without it, all group-stage fixtures are rebuilt
/// (per group, or across all teams when the competition has no groups).
///
/// Resulting order: kept group-stage fixtures, new fixtures, knockout fixtures. Returns how many
/// fixtures were generated.
pub fn generate_competition_fixtures(
    competition: &mut Competition,
    group_id: Option<GroupId>,
    config: &SchedulerConfig,
) -> Result<usize, TournamentError> {
    let base = GroupContext {
        competition_id: competition.id,
        group: None,
        default_duration: config.default_duration,
    };

    let generated: Vec<Fixture> = match group_id {
        Some(gid) => {
            let group = competition
                .group(gid)
                .ok_or(TournamentError::GroupNotFound(gid))?;
            let teams = competition.teams_in_group(gid);
            generate(&teams, &GroupContext { group: Some(group), ..base })
        }
        None if competition.groups.is_empty() => generate(&competition.teams, &base),
        None => competition
            .groups
            .iter()
            .flat_map(|g| {
                let teams = competition.teams_in_group(g.id);
                generate(&teams, &GroupContext { group: Some(g), ..base })
            })
            .collect(),
    };
    let count = generated.len();

    let (group_stage, knockout): (Vec<Fixture>, Vec<Fixture>) =
        std::mem::take(&mut competition.fixtures)
            .into_iter()
            .partition(Fixture::is_group_stage);
    let kept: Vec<Fixture> = match group_id {
        Some(gid) => group_stage
            .into_iter()
            .filter(|f| f.group_id != Some(gid))
            .collect(),
        None => Vec::new(),
    };

    competition.fixtures = kept
        .into_iter()
        .chain(generated)
        .chain(knockout)
        .collect();
    competition.regenerate_match_ids();

    log::info!(
        "Generated {} group-stage fixture(s) for competition {}",
        count,
        competition.code
    );
    Ok(count)
}
