use crate::store::state::ProjectState;

pub const STATUS_ICON: &str = "✏";

/// The one-line projection a statusline renders. Pending characters count
/// toward the displayed total so the number moves as the user types, not
/// thirty seconds later.
pub fn status_line(state: &ProjectState) -> String {
    if state.goal == 0 {
        return format!("{STATUS_ICON} No active challenge");
    }
    let display = state.display_count();
    let percentage = display * 100 / state.goal;
    let mut line = format!("{STATUS_ICON} {display}/{} ({percentage}%)", state.goal);
    if state.tracking_paused {
        line.push_str(" (Paused)");
    }
    line
}

/// The block `show-stats` renders: project, challenge, lifetime total,
/// today's count, then the full day-by-day history.
pub fn stats_lines(project_name: &str, state: &ProjectState) -> Vec<String> {
    let mut lines = vec![format!("Project: {project_name}")];

    if state.goal == 0 {
        lines.push("Challenge: none".to_string());
    } else {
        lines.push(format!(
            "Challenge: {} ({} chars/day)",
            state.challenge_name, state.goal
        ));
    }

    lines.push(format!("Lifetime total: {} chars", state.lifetime_total()));

    let pending = state.pending_sum();
    if pending > 0 {
        lines.push(format!(
            "Today: {} chars (+{pending} pending)",
            state.daily_count
        ));
    } else {
        lines.push(format!("Today: {} chars", state.daily_count));
    }

    if state.tracking_paused {
        lines.push("Tracking is paused.".to_string());
    }

    lines.push(String::new());
    if state.history.is_empty() {
        lines.push("No finished days yet.".to_string());
    } else {
        lines.push("History:".to_string());
        for record in &state.history {
            lines.push(format!(
                "  {}  {} chars",
                record.date.format("%Y-%m-%d"),
                record.count
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::store::state::{DayRecord, PendingEntry, ProjectState};

    use super::{stats_lines, status_line};

    const TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2024, 3, 4) {
        Some(v) => v,
        None => panic!(),
    };

    fn with_pending(mut state: ProjectState, count: u64) -> ProjectState {
        state.pending_chars.push(PendingEntry {
            count,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        });
        state
    }

    #[test]
    fn status_includes_pending_and_floored_percentage() {
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 500;
        state.daily_count = 400;
        let state = with_pending(state, 50);

        assert_eq!(status_line(&state), "✏ 450/500 (90%)");
    }

    #[test]
    fn status_percentage_floors() {
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 3000;
        state.daily_count = 1000;

        assert_eq!(status_line(&state), "✏ 1000/3000 (33%)");
    }

    #[test]
    fn status_can_exceed_hundred_percent() {
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 500;
        state.daily_count = 600;

        assert_eq!(status_line(&state), "✏ 600/500 (120%)");
    }

    #[test]
    fn status_marks_paused_tracking() {
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 500;
        state.daily_count = 100;
        state.tracking_paused = true;

        assert_eq!(status_line(&state), "✏ 100/500 (20%) (Paused)");
    }

    #[test]
    fn status_without_challenge_is_the_sentinel() {
        let state = ProjectState::fresh(TODAY);
        assert_eq!(status_line(&state), "✏ No active challenge");
    }

    #[test]
    fn stats_block_lists_history_in_order() {
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 1000;
        state.challenge_name = "Daily habit".into();
        state.daily_count = 150;
        state.history = vec![
            DayRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                count: 1100,
            },
            DayRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                count: 900,
            },
        ];
        let state = with_pending(state, 25);

        let lines = stats_lines("thesis", &state);

        assert_eq!(lines[0], "Project: thesis");
        assert_eq!(lines[1], "Challenge: Daily habit (1000 chars/day)");
        assert_eq!(lines[2], "Lifetime total: 2150 chars");
        assert_eq!(lines[3], "Today: 150 chars (+25 pending)");
        assert_eq!(lines[5], "History:");
        assert_eq!(lines[6], "  2024-03-02  1100 chars");
        assert_eq!(lines[7], "  2024-03-03  900 chars");
    }

    #[test]
    fn stats_block_handles_an_empty_project() {
        let lines = stats_lines("empty", &ProjectState::fresh(TODAY));

        assert_eq!(lines[1], "Challenge: none");
        assert_eq!(lines[2], "Lifetime total: 0 chars");
        assert_eq!(lines[3], "Today: 0 chars");
        assert!(lines.contains(&"No finished days yet.".to_string()));
    }
}
