//! Plain-text rendering of events, rounds and results.

use kaartmiddag::scoring::{participant_grand_total, table_total};
use kaartmiddag::{CardEvent, GameType, Results, Round, Standing, Standings};
use std::fmt::Write;

/// Short form of an id, enough to reference it on the command line
pub fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(8).collect()
}

pub fn render_events(events: &[CardEvent]) -> String {
    if events.is_empty() {
        return "No events yet. Create one with 'km create <title>'.\n".to_string();
    }

    let mut out = String::new();
    for event in events {
        let _ = writeln!(
            out,
            "{}  {:<24} {:<10} {:<12} {} players",
            short_id(&event.id),
            event.title,
            event.date,
            event.status.to_string(),
            event.participants.len()
        );
    }
    out
}

pub fn render_event(event: &CardEvent) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - {} [{}]",
        event.title,
        event.date,
        event.status,
        short_id(&event.id)
    );

    for game in GameType::ALL {
        let names: Vec<&str> = event.participants_of(game).map(|p| p.name.as_str()).collect();
        let _ = writeln!(out, "\n{game} ({}):", names.len());
        if names.is_empty() {
            let _ = writeln!(out, "  -");
        } else {
            for name in names {
                let _ = writeln!(out, "  {name}");
            }
        }
    }

    for round in &event.rounds {
        out.push('\n');
        out.push_str(&render_round(event, round));
    }
    if !event.rounds.is_empty() {
        out.push_str("\nTotals:\n");
        out.push_str(&render_totals(event));
    }
    out
}

pub fn render_round(event: &CardEvent, round: &Round) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Round {}:", round.number);
    if round.tables.is_empty() {
        let _ = writeln!(
            out,
            "  No tables yet. Use 'km seat' or 'km move' to seat players."
        );
    }

    for game in GameType::ALL {
        for (idx, table) in round.tables_for(game).enumerate() {
            let _ = writeln!(
                out,
                "  {game} table {} (total {}):",
                idx + 1,
                table_total(table, round)
            );
            for pid in &table.participant_ids {
                let name = event
                    .participant(pid)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                let score = round
                    .score_of(pid)
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                let _ = writeln!(out, "    {name:<28} {score:>6}");
            }
        }
    }

    let unseated: Vec<&str> = event
        .participants
        .iter()
        .filter(|p| !round.is_seated(&p.id))
        .map(|p| p.name.as_str())
        .collect();
    if !round.tables.is_empty() && !unseated.is_empty() {
        let _ = writeln!(out, "  Not seated: {}", unseated.join(", "));
    }
    out
}

fn prize_markers(standing: &Standing) -> String {
    let mut markers = String::new();
    if standing.has_positive_prize {
        markers.push_str(" (PRIJS)");
    }
    if standing.is_bottom_prize {
        markers.push_str(" (POEDELPRIJS)");
    }
    markers
}

fn render_standings(out: &mut String, standings: &Standings) {
    let _ = writeln!(out, "\n{}:", standings.game);
    if standings.is_empty() {
        let _ = writeln!(out, "  No participants");
        return;
    }

    for standing in &standings.entries {
        let podium = if standing.is_podium() { "*" } else { " " };
        let _ = writeln!(
            out,
            " {podium}{:>2}. {:<28} {:>6}{}",
            standing.position,
            standing.name,
            standing.total,
            prize_markers(standing)
        );
    }
}

/// Results per game; unfinished events are marked as provisional
pub fn render_results(results: &Results, finished: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "Results {}", results.title);
    if !finished {
        out.push_str(" (provisional)");
    }
    out.push('\n');

    for standings in &results.standings {
        render_standings(&mut out, standings);
    }
    out
}

/// Per-participant grand totals, in registration order
pub fn render_totals(event: &CardEvent) -> String {
    let mut out = String::new();
    for participant in &event.participants {
        let _ = writeln!(
            out,
            "{:<28} {:<8} {:>6}",
            participant.name,
            participant.game.to_string(),
            participant_grand_total(&participant.id, &event.rounds)
        );
    }
    out
}

pub fn render_names(names: &[String]) -> String {
    if names.is_empty() {
        return "No matching names\n".to_string();
    }
    let mut out = names.join("\n");
    out.push('\n');
    out
}
