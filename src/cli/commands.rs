//! Handlers behind every subcommand except `track`. Mutating handlers share
//! one shape: load (folding in a day rollover), mutate through the challenge
//! policy, save, tell the user. A dismissed prompt exits without touching
//! anything.

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::{
    editor::{EditorUi, NoticeLevel},
    store::{progress_store::ProgressStore, state::ProjectState},
    tracker::{
        challenge::{self, Bonus, BonusOutcome, CUSTOM_CHOICE, PRESETS},
        status::{stats_lines, status_line},
    },
};

/// Loads the state for a mutating command. A pending day rollover is archived,
/// persisted right away so it survives even if the command is cancelled, and
/// announced to the user once.
async fn load_for_update(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<ProjectState> {
    let mut state = store.load(today).await;
    if state.rollover(today) {
        info!("Rolled over into {today}");
        store.save(&state).await?;
        ui.notify(NoticeLevel::Info, "A new writing day started");
    }
    Ok(state)
}

pub async fn start_challenge(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;

    let mut options: Vec<String> = PRESETS
        .iter()
        .map(|preset| format!("{} ({} characters a day)", preset.name, preset.goal))
        .collect();
    options.push(CUSTOM_CHOICE.into());

    let Some(choice) = ui.select("Pick a daily challenge", &options)? else {
        return Ok(());
    };

    // Every slot before the last is a preset; the last one asks for a number.
    let (name, goal) = match PRESETS.get(choice) {
        Some(preset) => (preset.name.to_string(), preset.goal),
        None => {
            let Some(reply) = ui.input("Daily character goal")? else {
                return Ok(());
            };
            match challenge::parse_positive_count(&reply) {
                Ok(goal) => ("Custom".to_string(), goal),
                Err(e) => {
                    ui.notify(NoticeLevel::Error, &e.to_string());
                    return Ok(());
                }
            }
        }
    };

    challenge::set_challenge(&mut state, &name, goal);
    store.save(&state).await?;
    ui.notify(
        NoticeLevel::Info,
        &format!("Challenge \"{name}\" started: {goal} characters a day"),
    );
    Ok(())
}

pub async fn show_stats(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    project_name: &str,
    today: NaiveDate,
) -> Result<()> {
    let state = store.load(today).await;
    ui.show_lines(&stats_lines(project_name, &state));
    Ok(())
}

/// Prints the bare status line, for status bars that shell out to penpace.
/// Deliberately read-only, so polling it never moves the day over.
pub async fn print_status(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<()> {
    let state = store.load(today).await;
    ui.show_status(&status_line(&state));
    Ok(())
}

pub async fn reset_today(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;
    if !ui.confirm("Reset today's count to zero?")? {
        return Ok(());
    }
    challenge::reset_today(&mut state);
    store.save(&state).await?;
    ui.notify(NoticeLevel::Info, "Today's count is back to zero");
    Ok(())
}

pub async fn reset_all(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;
    if !ui.confirm("Discard the challenge, today's count and the whole history?")? {
        return Ok(());
    }
    challenge::reset_all(&mut state, today);
    store.save(&state).await?;
    ui.notify(NoticeLevel::Info, "Project progress wiped");
    Ok(())
}

pub async fn set_paused(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
    paused: bool,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;
    state.tracking_paused = paused;
    store.save(&state).await?;
    let message = if paused {
        "Tracking paused"
    } else {
        "Tracking resumed"
    };
    ui.notify(NoticeLevel::Info, message);
    Ok(())
}

pub async fn correct_count(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;
    let Some(reply) = ui.input("How many characters shouldn't have counted?")? else {
        return Ok(());
    };
    let amount = match challenge::parse_positive_count(&reply) {
        Ok(amount) => amount,
        Err(e) => {
            ui.notify(NoticeLevel::Error, &e.to_string());
            return Ok(());
        }
    };
    challenge::apply_correction(&mut state, amount);
    store.save(&state).await?;
    ui.notify(
        NoticeLevel::Info,
        &format!("Today's count is now {}", state.daily_count),
    );
    Ok(())
}

pub async fn add_bonus(
    store: &impl ProgressStore,
    ui: &mut impl EditorUi,
    today: NaiveDate,
    bonus: Bonus,
) -> Result<()> {
    let mut state = load_for_update(store, ui, today).await?;
    match challenge::grant_bonus(&mut state, bonus) {
        BonusOutcome::GoalTooLow { required } => {
            ui.notify(
                NoticeLevel::Warn,
                &format!(
                    "A daily goal of at least {required} is needed to credit {}",
                    bonus.label()
                ),
            );
        }
        BonusOutcome::Granted { goal_reached } => {
            store.save(&state).await?;
            ui.notify(
                NoticeLevel::Info,
                &format!("Added {} characters for {}", bonus.amount(), bonus.label()),
            );
            if goal_reached {
                ui.notify(
                    NoticeLevel::Info,
                    &format!("Daily goal reached: {} characters!", state.goal),
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        editor::{MockEditorUi, NoticeLevel},
        store::{
            progress_store::{JsonProgressStore, ProgressStore},
            state::ProjectState,
        },
        tracker::challenge::{Bonus, PRESETS},
    };

    use super::{
        add_bonus, correct_count, reset_all, reset_today, set_paused, start_challenge,
    };

    const TODAY: NaiveDate = match NaiveDate::from_ymd_opt(2024, 3, 4) {
        Some(v) => v,
        None => panic!(),
    };

    fn quiet_ui() -> MockEditorUi {
        let mut ui = MockEditorUi::new();
        ui.expect_notify().returning(|_, _| ());
        ui
    }

    #[tokio::test]
    async fn picking_a_preset_sets_goal_and_name() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());

        let mut ui = quiet_ui();
        ui.expect_select().returning(|_, _| Ok(Some(1)));

        start_challenge(&store, &mut ui, TODAY).await?;

        let state = store.load(TODAY).await;
        assert_eq!(&*state.challenge_name, PRESETS[1].name);
        assert_eq!(state.goal, PRESETS[1].goal);
        Ok(())
    }

    #[tokio::test]
    async fn the_last_slot_asks_for_a_custom_goal() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());

        let mut ui = quiet_ui();
        ui.expect_select()
            .returning(|_, options| Ok(Some(options.len() - 1)));
        ui.expect_input().returning(|_| Ok(Some(" 1250 ".into())));

        start_challenge(&store, &mut ui, TODAY).await?;

        let state = store.load(TODAY).await;
        assert_eq!(&*state.challenge_name, "Custom");
        assert_eq!(state.goal, 1250);
        Ok(())
    }

    #[tokio::test]
    async fn a_bad_custom_goal_changes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());

        let mut ui = MockEditorUi::new();
        ui.expect_select()
            .returning(|_, options| Ok(Some(options.len() - 1)));
        ui.expect_input().returning(|_| Ok(Some("a lot".into())));
        ui.expect_notify()
            .withf(|level, _| *level == NoticeLevel::Error)
            .times(1)
            .returning(|_, _| ());

        start_challenge(&store, &mut ui, TODAY).await?;

        assert_eq!(store.load(TODAY).await, ProjectState::fresh(TODAY));
        Ok(())
    }

    #[tokio::test]
    async fn a_dismissed_selection_is_a_noop() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());

        let mut ui = MockEditorUi::new();
        ui.expect_select().returning(|_, _| Ok(None));

        start_challenge(&store, &mut ui, TODAY).await?;

        assert_eq!(store.load(TODAY).await, ProjectState::fresh(TODAY));
        Ok(())
    }

    #[tokio::test]
    async fn reset_today_asks_first() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY);
        state.daily_count = 400;
        store.save(&state).await?;

        let mut ui = MockEditorUi::new();
        ui.expect_confirm().returning(|_| Ok(false));
        reset_today(&store, &mut ui, TODAY).await?;
        assert_eq!(store.load(TODAY).await.daily_count, 400);

        let mut ui = quiet_ui();
        ui.expect_confirm().returning(|_| Ok(true));
        reset_today(&store, &mut ui, TODAY).await?;
        assert_eq!(store.load(TODAY).await.daily_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn reset_all_discards_the_history_too() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY.pred_opt().unwrap());
        state.goal = 1000;
        state.daily_count = 999;
        store.save(&state).await?;

        let mut ui = quiet_ui();
        ui.expect_confirm().returning(|_| Ok(true));
        reset_all(&store, &mut ui, TODAY).await?;

        assert_eq!(store.load(TODAY).await, ProjectState::fresh(TODAY));
        Ok(())
    }

    #[tokio::test]
    async fn corrections_go_through_the_prompt() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY);
        state.daily_count = 50;
        store.save(&state).await?;

        let mut ui = MockEditorUi::new();
        ui.expect_input().returning(|_| Ok(Some("80".into())));
        ui.expect_notify()
            .withf(|level, message| {
                *level == NoticeLevel::Info && message == "Today's count is now 0"
            })
            .times(1)
            .returning(|_, _| ());

        correct_count(&store, &mut ui, TODAY).await?;

        assert_eq!(store.load(TODAY).await.daily_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn a_bonus_below_the_goal_threshold_warns_and_saves_nothing() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 1000;
        store.save(&state).await?;

        let mut ui = MockEditorUi::new();
        ui.expect_notify()
            .withf(|level, message| *level == NoticeLevel::Warn && message.contains("3000"))
            .times(1)
            .returning(|_, _| ());

        add_bonus(&store, &mut ui, TODAY, Bonus::RevisionTime).await?;

        assert_eq!(store.load(TODAY).await.daily_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn a_granted_bonus_can_complete_the_challenge() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY);
        state.goal = 3000;
        state.daily_count = 2500;
        store.save(&state).await?;

        let mut ui = MockEditorUi::new();
        ui.expect_notify()
            .withf(|_, message| message.contains("revision time"))
            .times(1)
            .returning(|_, _| ());
        ui.expect_notify()
            .withf(|_, message| message.contains("Daily goal reached"))
            .times(1)
            .returning(|_, _| ());

        add_bonus(&store, &mut ui, TODAY, Bonus::RevisionTime).await?;

        assert_eq!(store.load(TODAY).await.daily_count, 3500);
        Ok(())
    }

    #[tokio::test]
    async fn mutations_fold_in_the_day_rollover() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let yesterday = TODAY.pred_opt().unwrap();
        let mut state = ProjectState::fresh(yesterday);
        state.daily_count = 300;
        store.save(&state).await?;

        let mut ui = quiet_ui();
        set_paused(&store, &mut ui, TODAY, true).await?;

        let state = store.load(TODAY).await;
        assert!(state.tracking_paused);
        assert_eq!(state.daily_count, 0);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].count, 300);
        assert_eq!(state.last_update_date, TODAY);
        Ok(())
    }

    #[tokio::test]
    async fn a_folded_rollover_announces_the_new_day_once() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProgressStore::new(dir.path());
        let mut state = ProjectState::fresh(TODAY.pred_opt().unwrap());
        state.daily_count = 300;
        store.save(&state).await?;

        let mut ui = MockEditorUi::new();
        ui.expect_notify()
            .withf(|level, message| {
                *level == NoticeLevel::Info && message.contains("new writing day")
            })
            .times(1)
            .returning(|_, _| ());
        ui.expect_notify()
            .withf(|_, message| message == "Tracking paused")
            .times(2)
            .returning(|_, _| ());

        set_paused(&store, &mut ui, TODAY, true).await?;
        // The second command the same day finds nothing left to archive.
        set_paused(&store, &mut ui, TODAY, true).await?;

        assert_eq!(store.load(TODAY).await.history.len(), 1);
        Ok(())
    }
}
