//! Line-oriented terminal frontend.
//!
//! Reads one command per line and prints the current screen whenever the
//! store publishes a new snapshot. Sounds are shown as text cues.

use anyhow::{Context, Result};
use async_trait::async_trait;
use client_core::{Frontend, GameStore};
use game_core::{
    FrontendState, GameSettings, GameStatus, GameVariant, InputMethod, SessionState, SoundEvent,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// What a line of input asks the store to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Start(GameVariant),
    OpenSettings,
    EditSettings(SettingsEdit),
    SaveSettings,
    Answer(String),
    MoveSelection(i32),
    SubmitSelection,
    Continue,
    Menu,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettingsEdit {
    FeedbackSeconds(u64),
    ShowTarget(bool),
    Input(InputMethod),
    StartLevel(u32),
}

impl SettingsEdit {
    fn apply(&self, settings: &mut GameSettings) {
        match self {
            SettingsEdit::FeedbackSeconds(seconds) => settings.feedback_duration_seconds = *seconds,
            SettingsEdit::ShowTarget(show) => settings.show_target_visual = *show,
            SettingsEdit::Input(method) => settings.input_method = *method,
            SettingsEdit::StartLevel(level) => settings.start_level = *level,
        }
    }
}

/// Interprets `line` for the screen described by `status`.
///
/// `:q` and `:menu` work everywhere; everything else depends on the screen
/// and, while playing, on the input method.
pub fn parse_input(status: &GameStatus, input_method: InputMethod, line: &str) -> Option<Intent> {
    let line = line.trim();

    match line {
        ":q" | ":quit" => return Some(Intent::Quit),
        ":menu" => return Some(Intent::Menu),
        _ => {}
    }

    match status {
        GameStatus::Menu => match line.to_ascii_lowercase().as_str() {
            "1" | "numbers" => Some(Intent::Start(GameVariant::Numbers)),
            "2" | "letters" => Some(Intent::Start(GameVariant::Letters)),
            "s" | "settings" => Some(Intent::OpenSettings),
            "q" | "quit" => Some(Intent::Quit),
            _ => None,
        },
        GameStatus::Settings { .. } => parse_settings_line(line),
        GameStatus::Playing => parse_answer_line(input_method, line),
        GameStatus::Feedback { .. } => None,
        GameStatus::LevelComplete { .. } => Some(Intent::Continue),
        GameStatus::SessionComplete { .. } => Some(Intent::Menu),
    }
}

/// `<` and `>` move the cursor and an empty line picks the highlighted
/// option, unless the player types answers only.
fn parse_answer_line(input_method: InputMethod, line: &str) -> Option<Intent> {
    let arrows = input_method != InputMethod::DirectKeyboard;
    let typing = input_method != InputMethod::ArrowSelection;

    match line {
        "<" if arrows => Some(Intent::MoveSelection(-1)),
        ">" if arrows => Some(Intent::MoveSelection(1)),
        "" if arrows => Some(Intent::SubmitSelection),
        "" => None,
        answer if typing => Some(Intent::Answer(answer.to_string())),
        _ => None,
    }
}

fn parse_settings_line(line: &str) -> Option<Intent> {
    let mut words = line.split_whitespace();
    let keyword = words.next()?.to_ascii_lowercase();
    let value = words.next().map(str::to_ascii_lowercase);

    let edit = match (keyword.as_str(), value.as_deref()) {
        ("save", None) => return Some(Intent::SaveSettings),
        ("back", None) => return Some(Intent::Menu),
        ("feedback", Some(v)) => SettingsEdit::FeedbackSeconds(v.parse().ok()?),
        ("level", Some(v)) => SettingsEdit::StartLevel(v.parse().ok()?),
        ("target", Some("on")) => SettingsEdit::ShowTarget(true),
        ("target", Some("off")) => SettingsEdit::ShowTarget(false),
        ("input", Some("direct")) => SettingsEdit::Input(InputMethod::DirectKeyboard),
        ("input", Some("arrows")) => SettingsEdit::Input(InputMethod::ArrowSelection),
        ("input", Some("hybrid")) => SettingsEdit::Input(InputMethod::Hybrid),
        _ => return None,
    };
    Some(Intent::EditSettings(edit))
}

/// Text for one screen.
pub fn render(state: &FrontendState, settings: &GameSettings) -> String {
    match (&state.status, &state.session) {
        (GameStatus::Menu, _) => {
            "== LetterLanders ==\n  1) Numbers\n  2) Letters\n  s) Settings\n  q) Quit".to_string()
        }
        (GameStatus::Settings { message }, _) => {
            let mut out = render_settings(settings);
            if let Some(message) = message {
                out.push_str(&format!("\n  {message}"));
            }
            out
        }
        (GameStatus::Playing, Some(session)) => render_question(session, settings),
        (GameStatus::Feedback { message, .. }, _) => format!(">> {message}"),
        (
            GameStatus::LevelComplete {
                level,
                score,
                passed,
            },
            session,
        ) => {
            let total = session.as_ref().map_or(0, |s| s.total_questions);
            let verdict = if *passed {
                "Level passed! Press Enter for the next level."
            } else {
                "Not quite. Press Enter to try again."
            };
            format!("== Level {level} complete: {score}/{total} ==\n{verdict}")
        }
        (GameStatus::SessionComplete { score }, _) => {
            format!("== You beat the boss! Total score: {score} ==\nPress Enter for the menu.")
        }
        (GameStatus::Playing, None) => String::new(),
    }
}

fn render_settings(settings: &GameSettings) -> String {
    let input = match settings.input_method {
        InputMethod::DirectKeyboard => "direct",
        InputMethod::ArrowSelection => "arrows",
        InputMethod::Hybrid => "hybrid",
    };
    format!(
        "== Settings ==\n  feedback {}\n  target {}\n  input {}\n  level {}\n(edit a line, then `save` or `back`)",
        settings.feedback_duration_seconds,
        if settings.show_target_visual { "on" } else { "off" },
        input,
        settings.start_level,
    )
}

fn render_question(session: &SessionState, settings: &GameSettings) -> String {
    let mut out = format!(
        "Level {} - question {}/{}  (score {})\n",
        session.current_level,
        session.current_question_index + 1,
        session.total_questions,
        session.score
    );

    if settings.show_target_visual {
        out.push_str(&format!("Find: {}\n", session.target));
    }
    if let Some(remaining) = session.remaining_time() {
        out.push_str(&format!("Time left: {remaining:.1}s\n"));
    }
    out.push_str("Options: ");
    if settings.input_method == InputMethod::DirectKeyboard {
        out.push_str(&session.options.join("  "));
        return out;
    }

    let options: Vec<String> = session
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            if index == session.selected_index {
                format!("[{option}]")
            } else {
                option.clone()
            }
        })
        .collect();
    out.push_str(&options.join("  "));
    out.push_str("\n(< and > move, Enter picks)");
    out
}

fn describe_sound(sound: &SoundEvent) -> Option<String> {
    let text = match sound {
        SoundEvent::None => return None,
        SoundEvent::PlaySuccess => "(ding!)".to_string(),
        SoundEvent::PlayFailure => "(buzz)".to_string(),
        SoundEvent::SayPrompt(target) => format!("(voice) Find {target}!"),
        SoundEvent::GameStart => "(fanfare)".to_string(),
        SoundEvent::LevelComplete => "(cheer)".to_string(),
    };
    Some(text)
}

/// Frontend reading commands from `input` and writing screens to `output`.
pub struct LineFrontend<R, W> {
    input: R,
    output: W,
}

impl<R, W> LineFrontend<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[async_trait]
impl<R, W> Frontend for LineFrontend<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn run(&mut self, store: GameStore) -> Result<()> {
        let Self { input, output } = self;
        let mut lines = BufReader::new(input).lines();
        let mut states = store.subscribe_state();
        let mut sounds = store.subscribe_sound();
        let mut draft: Option<GameSettings> = None;

        let initial = render(&states.borrow_and_update(), &store.settings());
        write_line(output, &initial).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    let status = store.state().status;
                    let input_method = store.settings().input_method;
                    let Some(intent) = parse_input(&status, input_method, &line) else {
                        continue;
                    };
                    if !handle_intent(output, &mut draft, &store, intent).await? {
                        break;
                    }
                }
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let screen = render(&states.borrow_and_update(), &store.settings());
                    write_line(output, &screen).await?;
                }
                changed = sounds.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let cue = sounds.borrow_and_update().as_ref().and_then(describe_sound);
                    if let Some(cue) = cue {
                        write_line(output, &cue).await?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Returns `false` when the user asked to quit.
async fn handle_intent<W: AsyncWrite + Unpin>(
    output: &mut W,
    draft: &mut Option<GameSettings>,
    store: &GameStore,
    intent: Intent,
) -> Result<bool> {
    debug!(?intent, "Input");

    match intent {
        Intent::Quit => return Ok(false),
        Intent::Start(variant) => store.start_game(variant).await,
        Intent::OpenSettings => {
            *draft = Some(store.settings());
            store.go_to_settings().await;
        }
        Intent::EditSettings(edit) => {
            let settings = draft.get_or_insert_with(|| store.settings());
            edit.apply(settings);
            let screen = render_settings(settings);
            write_line(output, &screen).await?;
        }
        Intent::SaveSettings => {
            let settings = draft.take().unwrap_or_else(|| store.settings());
            store.save_settings(settings).await;
        }
        Intent::Answer(answer) => store.submit_answer(&answer).await,
        Intent::MoveSelection(delta) => store.move_selection(delta).await,
        Intent::SubmitSelection => store.submit_selection().await,
        Intent::Continue => store.next_level().await,
        Intent::Menu => {
            *draft = None;
            store.reset().await;
        }
    }
    Ok(true)
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    output
        .write_all(format!("{text}\n").as_bytes())
        .await
        .context("Failed to write to output")?;
    output.flush().await.context("Failed to flush output")
}
